//! Text report templates.
//!
//! A template is a TOML document holding an ordered `[[block]]` array and
//! optional `[[computed]]` sub-fields:
//!
//! ```toml
//! [[computed]]
//! name = "klonus_oik"
//! field = "NilkkaGastroKlonusOik"
//! equals = "Kyllä"
//! text = " (klonus)"
//!
//! [[block]]
//! text = "Gastrocnemius catch {NilkkaGastroCatchOik}{klonus_oik}, "
//!
//! [[block]]
//! end_line = true
//! ```
//!
//! Computed sub-fields are filled in before conditional formatting, so they
//! never decide whether a block is kept.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::ReportError;
use crate::fragment::Fragment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(Fragment),
    /// Smart line break: ends the current line with a period unless the
    /// line is already empty.
    EndLine,
}

/// A plain equality test on one field value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Condition {
    pub field: String,
    pub equals: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComputedRule {
    /// `text` when the condition holds, else empty.
    When(Condition),
    /// Texts of all matching items joined by `separator`, after `prefix`;
    /// empty when nothing matches.
    AnyOf {
        prefix: String,
        separator: String,
        items: Vec<Condition>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedField {
    pub name: String,
    pub rule: ComputedRule,
}

impl ComputedField {
    fn conditions(&self) -> &[Condition] {
        match &self.rule {
            ComputedRule::When(condition) => std::slice::from_ref(condition),
            ComputedRule::AnyOf { items, .. } => items,
        }
    }

    fn evaluate(&self, values: &BTreeMap<String, String>) -> String {
        let holds = |c: &Condition| values.get(&c.field).is_some_and(|v| *v == c.equals);
        match &self.rule {
            ComputedRule::When(condition) if holds(condition) => condition.text.clone(),
            ComputedRule::When(_) => String::new(),
            ComputedRule::AnyOf {
                prefix,
                separator,
                items,
            } => {
                let matching: Vec<&str> = items
                    .iter()
                    .filter(|c| holds(*c))
                    .map(|c| c.text.as_str())
                    .collect();
                if matching.is_empty() {
                    String::new()
                } else {
                    format!("{prefix}{}", matching.join(separator))
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateDoc {
    #[serde(default)]
    computed: Vec<ComputedDef>,
    #[serde(default)]
    block: Vec<BlockDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BlockDef {
    text: Option<String>,
    #[serde(default)]
    end_line: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ComputedDef {
    name: String,
    field: Option<String>,
    equals: Option<String>,
    text: Option<String>,
    prefix: Option<String>,
    separator: Option<String>,
    #[serde(default)]
    items: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTemplate {
    computed: Vec<ComputedField>,
    blocks: Vec<Block>,
}

impl TextTemplate {
    pub fn new(computed: Vec<ComputedField>, blocks: Vec<Block>) -> Self {
        Self { computed, blocks }
    }

    /// Read and parse the template at `path`. Nothing is cached: every call
    /// sees the file as it is now.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let source = std::fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        Self::parse(&source, &path.display().to_string())
    }

    /// Parse template source. `location` names the source in errors.
    pub fn parse(source: &str, location: &str) -> Result<Self, ReportError> {
        let doc: TemplateDoc = toml::from_str(source).map_err(|e| ReportError::TemplateSyntax {
            location: location.to_string(),
            message: e.to_string(),
        })?;

        let mut computed = Vec::with_capacity(doc.computed.len());
        for (i, def) in doc.computed.into_iter().enumerate() {
            let field = computed_field(def, &format!("{location}, computed #{}", i + 1))?;
            if computed.iter().any(|c: &ComputedField| c.name == field.name) {
                return Err(ReportError::TemplateSyntax {
                    location: location.to_string(),
                    message: format!("computed field '{}' is defined twice", field.name),
                });
            }
            computed.push(field);
        }

        let mut blocks = Vec::with_capacity(doc.block.len());
        for (i, def) in doc.block.into_iter().enumerate() {
            let block_location = format!("{location}, block #{}", i + 1);
            let block = match def {
                BlockDef {
                    text: Some(text),
                    end_line: false,
                } => Block::Text(
                    Fragment::parse(&text).map_err(|e| ReportError::syntax(&block_location, e))?,
                ),
                BlockDef {
                    text: None,
                    end_line: true,
                } => Block::EndLine,
                _ => {
                    return Err(ReportError::TemplateSyntax {
                        location: block_location,
                        message: "a block takes either `text` or `end_line = true`".to_string(),
                    });
                }
            };
            blocks.push(block);
        }

        tracing::debug!(
            location,
            blocks = blocks.len(),
            computed = computed.len(),
            "text template parsed"
        );
        Ok(Self { computed, blocks })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn computed(&self) -> &[ComputedField] {
        &self.computed
    }

    /// Record field names the template depends on: placeholders other than
    /// computed sub-fields, plus the inputs of computed sub-fields.
    pub fn referenced_fields(&self) -> BTreeSet<String> {
        let computed: BTreeSet<&str> = self.computed.iter().map(|c| c.name.as_str()).collect();
        let mut names = BTreeSet::new();
        for block in &self.blocks {
            if let Block::Text(fragment) = block {
                names.extend(
                    fragment
                        .fields()
                        .filter(|name| !computed.contains(name))
                        .map(str::to_string),
                );
            }
        }
        for field in &self.computed {
            names.extend(field.conditions().iter().map(|c| c.field.clone()));
        }
        names
    }

    /// Evaluate the computed sub-fields against `values` and fill them into
    /// the blocks.
    pub fn resolve_blocks(
        &self,
        values: &BTreeMap<String, String>,
    ) -> Result<Vec<Block>, ReportError> {
        if self.computed.is_empty() {
            return Ok(self.blocks.clone());
        }

        let mut unknown: Vec<String> = Vec::new();
        let mut literals = BTreeMap::new();
        for field in &self.computed {
            if values.contains_key(&field.name) {
                return Err(ReportError::TemplateSyntax {
                    location: format!("computed field '{}'", field.name),
                    message: "name is already a record field".to_string(),
                });
            }
            for condition in field.conditions() {
                if !values.contains_key(&condition.field) && !unknown.contains(&condition.field) {
                    unknown.push(condition.field.clone());
                }
            }
            literals.insert(field.name.clone(), field.evaluate(values));
        }
        if !unknown.is_empty() {
            return Err(ReportError::UnknownFields { names: unknown });
        }

        Ok(self
            .blocks
            .iter()
            .map(|block| match block {
                Block::Text(fragment) => Block::Text(fragment.with_literals(&literals)),
                Block::EndLine => Block::EndLine,
            })
            .collect())
    }
}

fn computed_field(def: ComputedDef, location: &str) -> Result<ComputedField, ReportError> {
    let invalid = |message: &str| ReportError::TemplateSyntax {
        location: location.to_string(),
        message: message.to_string(),
    };

    if def.name.is_empty() || def.name.contains(['{', '}']) {
        return Err(invalid("computed field needs a name without braces"));
    }

    let ComputedDef {
        name,
        field,
        equals,
        text,
        prefix,
        separator,
        items,
    } = def;

    let rule = match (field, equals, text) {
        (Some(field), Some(equals), Some(text))
            if items.is_empty() && prefix.is_none() && separator.is_none() =>
        {
            ComputedRule::When(Condition {
                field,
                equals,
                text,
            })
        }
        (None, None, None) if !items.is_empty() => ComputedRule::AnyOf {
            prefix: prefix.unwrap_or_default(),
            separator: separator.unwrap_or_else(|| ", ".to_string()),
            items,
        },
        _ => {
            return Err(invalid(
                "computed field takes either `field`/`equals`/`text` or a non-empty `items` list",
            ));
        }
    };

    Ok(ComputedField { name, rule })
}
