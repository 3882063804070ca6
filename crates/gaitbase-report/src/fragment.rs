//! Template fragments and the conditional-formatting rule.
//!
//! A fragment is literal text with `{field}` placeholders; `{{` and `}}`
//! stand for literal braces. A fragment that refers to fields is dropped
//! when every one of those fields is still at its default.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::ReportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Field(String),
}

/// Placement of a malformed placeholder, as a byte offset into the fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub offset: usize,
    pub message: &'static str,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    source: String,
    segments: Vec<Segment>,
}

impl Fragment {
    pub fn parse(text: &str) -> Result<Self, SyntaxError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = text.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if chars.next_if(|&(_, n)| n == '{').is_some() => literal.push('{'),
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, '{')) => {
                                return Err(SyntaxError {
                                    offset: pos,
                                    message: "unexpected '{' inside placeholder",
                                });
                            }
                            Some((_, ch)) => name.push(ch),
                            None => {
                                return Err(SyntaxError {
                                    offset: pos,
                                    message: "unclosed '{'",
                                });
                            }
                        }
                    }
                    if name.is_empty() {
                        return Err(SyntaxError {
                            offset: pos,
                            message: "empty placeholder",
                        });
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(name));
                }
                '}' if chars.next_if(|&(_, n)| n == '}').is_some() => literal.push('}'),
                '}' => {
                    return Err(SyntaxError {
                        offset: pos,
                        message: "single '}' encountered",
                    });
                }
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: text.to_string(),
            segments,
        })
    }

    /// The fragment text as written in the template.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Referenced field names, in order of appearance (with repeats).
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Replace the placeholders named in `literals` by their text. The
    /// inserted text is literal: braces in it are not placeholders.
    pub fn with_literals(&self, literals: &BTreeMap<String, String>) -> Self {
        let mut segments: Vec<Segment> = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            let text = match segment {
                Segment::Field(name) => match literals.get(name) {
                    Some(text) => text.as_str(),
                    None => {
                        segments.push(segment.clone());
                        continue;
                    }
                },
                Segment::Literal(text) => text.as_str(),
            };
            match segments.last_mut() {
                Some(Segment::Literal(prev)) => prev.push_str(text),
                _ => segments.push(Segment::Literal(text.to_string())),
            }
        }

        Self {
            source: self.source.clone(),
            segments,
        }
    }

    fn substitute(&self, values: &BTreeMap<String, String>) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => {
                    if let Some(value) = values.get(name) {
                        out.push_str(value);
                    }
                }
            }
        }
        out
    }
}

/// Names referenced by `fragment` that `values` does not have, without
/// repeats.
pub fn unknown_fields(fragment: &Fragment, values: &BTreeMap<String, String>) -> Vec<String> {
    let mut unknown: Vec<String> = Vec::new();
    for name in fragment.fields() {
        if !values.contains_key(name) && !unknown.iter().any(|u| u == name) {
            unknown.push(name.to_string());
        }
    }
    unknown
}

/// Render `fragment`, or return an empty string when it refers to fields
/// and all of them are in `defaults`.
///
/// A fragment without placeholders is always kept. Referring to a name that
/// `values` lacks is an error, whether or not the fragment would be kept.
pub fn conditional_format(
    fragment: &Fragment,
    values: &BTreeMap<String, String>,
    defaults: &BTreeSet<String>,
) -> Result<String, ReportError> {
    let unknown = unknown_fields(fragment, values);
    if !unknown.is_empty() {
        return Err(ReportError::UnknownFields { names: unknown });
    }

    let mut fields = fragment.fields().peekable();
    if fields.peek().is_some() && fields.all(|name| defaults.contains(name)) {
        return Ok(String::new());
    }
    Ok(fragment.substitute(values))
}
