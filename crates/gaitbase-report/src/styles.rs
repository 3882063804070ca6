use serde::{Deserialize, Serialize};

/// Styling for DOCX exports of the text report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStyles {
    /// Font for body text and headings (e.g. "Calibri").
    pub font: String,

    /// Body text size in points.
    pub body_size: usize,

    /// Size of report titles (all upper-case lines) in points.
    pub title_size: usize,

    /// Size of section headings (lines ending in ':') in points.
    pub section_size: usize,
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            font: "Calibri".to_string(),
            body_size: 11,
            title_size: 14,
            section_size: 12,
        }
    }
}
