//! Text report rendering.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::ReportError;
use crate::fragment::conditional_format;
use crate::tables::RewriteTable;
use crate::template::{Block, TextTemplate};

#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    /// Value rewrites applied before substitution.
    pub rewrite: RewriteTable,
}

/// Render a text report from `template`.
///
/// Computed sub-fields see the values as given; substitution sees them after
/// `options.rewrite`.
pub fn render_text(
    template: &TextTemplate,
    values: &BTreeMap<String, String>,
    defaults: &BTreeSet<String>,
    options: &TextOptions,
) -> Result<String, ReportError> {
    let blocks = template.resolve_blocks(values)?;
    let rewritten = options.rewrite.apply(values);
    render_blocks(&blocks, &rewritten, defaults)
}

/// Load the template at `path` and render it.
pub fn render_text_file(
    path: &Path,
    values: &BTreeMap<String, String>,
    defaults: &BTreeSet<String>,
    options: &TextOptions,
) -> Result<String, ReportError> {
    let template = TextTemplate::load(path)?;
    render_text(&template, values, defaults, options)
}

/// Concatenate `blocks` in order, conditionally formatting each text block
/// and applying smart line breaks.
pub fn render_blocks(
    blocks: &[Block],
    values: &BTreeMap<String, String>,
    defaults: &BTreeSet<String>,
) -> Result<String, ReportError> {
    let mut report = String::new();
    let mut kept = 0usize;

    for block in blocks {
        match block {
            Block::Text(fragment) => {
                let text = conditional_format(fragment, values, defaults)?;
                if !text.is_empty() {
                    kept += 1;
                }
                append_text(&mut report, &text);
            }
            Block::EndLine => end_line(&mut report),
        }
    }

    tracing::debug!(blocks = blocks.len(), kept, chars = report.len(), "text report rendered");
    Ok(report)
}

/// Append `text`, upper-casing its first character when it starts a line.
fn append_text(report: &mut String, text: &str) {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return;
    };
    if report.ends_with('\n') {
        report.extend(first.to_uppercase());
        report.push_str(chars.as_str());
    } else {
        report.push_str(text);
    }
}

/// Drop a dangling separator and close the line with a period. A line that
/// is already closed (or a report not yet started) is left alone.
fn end_line(report: &mut String) {
    let trimmed = report.trim_end_matches([' ', '\t', ',']).len();
    report.truncate(trimmed);
    if !report.is_empty() && !report.ends_with('\n') {
        report.push_str(".\n");
    }
}
