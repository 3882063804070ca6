//! Spreadsheet reports.
//!
//! The template is a workbook whose first sheet holds `{field}` placeholders
//! in its cells. Every non-empty cell is conditionally formatted as a whole;
//! cells whose text changes get the new text written with their original
//! style.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use umya_spreadsheet::{Spreadsheet, Worksheet};

use crate::error::ReportError;
use crate::fragment::{Fragment, conditional_format};
use crate::tables::CleanupTable;

/// Cell access needed for substitution. Rows and columns are zero-based.
pub trait CellSheet {
    /// `(rows, columns)` spanned by the used cells.
    fn dimensions(&self) -> (u32, u32);

    /// Text of a cell. `None` for missing cells and formula cells.
    fn cell_text(&self, row: u32, col: u32) -> Option<String>;

    /// Write `text` into a cell, keeping the style the cell had.
    fn replace_text(&mut self, row: u32, col: u32, text: &str);
}

/// A1-style reference for zero-based coordinates.
pub fn cell_ref(row: u32, col: u32) -> String {
    let mut letters = Vec::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect::<String>() + &(row + 1).to_string()
}

/// Substitute fields into every non-empty cell of `sheet`, row by row.
///
/// `cleanup` is applied only to cells whose text changed. The first failing
/// cell aborts the whole substitution. Returns the number of cells written.
pub fn substitute_cells<S: CellSheet + ?Sized>(
    sheet: &mut S,
    values: &BTreeMap<String, String>,
    defaults: &BTreeSet<String>,
    cleanup: &CleanupTable,
) -> Result<usize, ReportError> {
    let (rows, cols) = sheet.dimensions();
    let mut written = 0usize;

    for row in 0..rows {
        for col in 0..cols {
            let Some(text) = sheet.cell_text(row, col) else {
                continue;
            };
            if text.is_empty() {
                continue;
            }

            let fragment = Fragment::parse(&text)
                .map_err(|e| ReportError::syntax(format!("cell {}", cell_ref(row, col)), e))?;
            let formatted = conditional_format(&fragment, values, defaults)?;
            if formatted != text {
                sheet.replace_text(row, col, &cleanup.apply(&formatted));
                written += 1;
            }
        }
    }

    tracing::debug!(rows, cols, written, "spreadsheet cells substituted");
    Ok(written)
}

impl CellSheet for Worksheet {
    fn dimensions(&self) -> (u32, u32) {
        let (cols, rows) = self.get_highest_column_and_row();
        (rows, cols)
    }

    fn cell_text(&self, row: u32, col: u32) -> Option<String> {
        let cell = self.get_cell((col + 1, row + 1))?;
        if cell.is_formula() {
            return None;
        }
        Some(cell.get_value().into_owned())
    }

    fn replace_text(&mut self, row: u32, col: u32, text: &str) {
        let cell = self.get_cell_mut((col + 1, row + 1));
        let style = cell.get_style().clone();
        cell.set_value_string(text);
        cell.set_style(style);
    }
}

/// Read the workbook at `template` and substitute fields into its first
/// sheet. Only OOXML workbooks are accepted; the file is never modified.
pub fn render_spreadsheet(
    template: &Path,
    values: &BTreeMap<String, String>,
    defaults: &BTreeSet<String>,
    cleanup: &CleanupTable,
) -> Result<Spreadsheet, ReportError> {
    std::fs::metadata(template).map_err(|e| ReportError::io(template, e))?;
    let mut book = umya_spreadsheet::reader::xlsx::read(template).map_err(|e| {
        ReportError::SpreadsheetFormat {
            path: template.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    let sheet = book
        .get_sheet_mut(&0)
        .ok_or_else(|| ReportError::SpreadsheetFormat {
            path: template.to_path_buf(),
            message: "workbook has no sheets".to_string(),
        })?;
    substitute_cells(sheet, values, defaults, cleanup)?;
    Ok(book)
}

/// Write `book` to `path` through a temporary file, so a failed write
/// leaves no partial report behind.
pub fn save_spreadsheet(book: &Spreadsheet, path: &Path) -> Result<(), ReportError> {
    let tmp_path = path.with_extension("xlsx.tmp");
    if let Err(e) = umya_spreadsheet::writer::xlsx::write(book, &tmp_path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(ReportError::SpreadsheetWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        });
    }
    std::fs::rename(&tmp_path, path).map_err(|e| ReportError::io(path, e))?;

    tracing::info!(path = %path.display(), "spreadsheet report written");
    Ok(())
}
