use std::collections::{BTreeMap, BTreeSet};

use pretty_assertions::assert_eq;

use gaitbase_report::error::ReportError;
use gaitbase_report::sheet::{
    CellSheet, cell_ref, render_spreadsheet, save_spreadsheet, substitute_cells,
};
use gaitbase_report::tables::CleanupTable;

/// Grid of cells; `None` marks a formula or a missing cell.
struct MemSheet {
    cells: Vec<Vec<Option<String>>>,
    writes: Vec<(u32, u32)>,
}

impl MemSheet {
    fn new(rows: &[&[Option<&str>]]) -> Self {
        Self {
            cells: rows
                .iter()
                .map(|row| row.iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
            writes: Vec::new(),
        }
    }

    fn text(&self, row: usize, col: usize) -> Option<&str> {
        self.cells[row][col].as_deref()
    }
}

impl CellSheet for MemSheet {
    fn dimensions(&self) -> (u32, u32) {
        let cols = self.cells.iter().map(Vec::len).max().unwrap_or(0);
        (self.cells.len() as u32, cols as u32)
    }

    fn cell_text(&self, row: u32, col: u32) -> Option<String> {
        self.cells
            .get(row as usize)?
            .get(col as usize)?
            .clone()
    }

    fn replace_text(&mut self, row: u32, col: u32, text: &str) {
        self.cells[row as usize][col as usize] = Some(text.to_string());
        self.writes.push((row, col));
    }
}

fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn defaults(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn cleanup() -> CleanupTable {
    CleanupTable::new([("(EI)", ""), ("(Kyllä)", "(kl.)")])
}

#[test]
fn cells_are_substituted_in_row_order() {
    let mut sheet = MemSheet::new(&[
        &[Some("Nimi"), Some("{TiedotNimi}")],
        &[Some("{A}/{B}"), None, Some("")],
        &[Some("{C}"), Some("x")],
    ]);
    let v = values(&[
        ("TiedotNimi", "Matti Meikäläinen"),
        ("A", "10°"),
        ("B", "12°"),
        ("C", "Ei mitattu"),
    ]);

    let written = substitute_cells(&mut sheet, &v, &defaults(&["C"]), &cleanup()).unwrap();

    assert_eq!(written, 3);
    assert_eq!(sheet.writes, [(0, 1), (1, 0), (2, 0)]);
    assert_eq!(sheet.text(0, 0), Some("Nimi"));
    assert_eq!(sheet.text(0, 1), Some("Matti Meikäläinen"));
    assert_eq!(sheet.text(1, 0), Some("10°/12°"));
    assert_eq!(sheet.text(1, 1), None);
    assert_eq!(sheet.text(2, 0), Some(""));
}

#[test]
fn cleanup_only_touches_changed_cells() {
    let mut sheet = MemSheet::new(&[&[Some("Klonus (EI)"), Some("{K}(EI)/{L}(Kyllä)")]]);
    let v = values(&[("K", "10°"), ("L", "12°")]);

    substitute_cells(&mut sheet, &v, &defaults(&[]), &cleanup()).unwrap();

    assert_eq!(sheet.text(0, 0), Some("Klonus (EI)"));
    assert_eq!(sheet.text(0, 1), Some("10°/12°(kl.)"));
}

#[test]
fn unmeasured_cell_becomes_empty() {
    let mut sheet = MemSheet::new(&[&[Some("{Paino} kg")]]);
    let v = values(&[("Paino", "Ei mitattu")]);

    substitute_cells(&mut sheet, &v, &defaults(&["Paino"]), &cleanup()).unwrap();

    assert_eq!(sheet.text(0, 0), Some(""));
}

#[test]
fn unknown_field_in_cell_fails() {
    let mut sheet = MemSheet::new(&[&[Some("{A}")], &[Some("{Zorblex}")]]);
    let err = substitute_cells(&mut sheet, &values(&[("A", "1")]), &defaults(&[]), &cleanup())
        .unwrap_err();
    assert!(matches!(err, ReportError::UnknownFields { names } if names == ["Zorblex"]));
}

#[test]
fn bad_cell_syntax_names_the_cell() {
    let mut sheet = MemSheet::new(&[&[None, None], &[None, Some("{open")]]);
    let err = substitute_cells(&mut sheet, &values(&[]), &defaults(&[]), &cleanup()).unwrap_err();
    match err {
        ReportError::TemplateSyntax { location, .. } => assert_eq!(location, "cell B2"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn cell_refs() {
    assert_eq!(cell_ref(0, 0), "A1");
    assert_eq!(cell_ref(9, 25), "Z10");
    assert_eq!(cell_ref(0, 26), "AA1");
    assert_eq!(cell_ref(2, 701), "ZZ3");
    assert_eq!(cell_ref(0, 702), "AAA1");
}

#[test]
fn worksheet_keeps_cell_style() {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();
    sheet.get_cell_mut("A1").set_value_string("{X}");
    sheet
        .get_cell_mut("A1")
        .get_style_mut()
        .get_font_mut()
        .set_bold(true);
    sheet.get_cell_mut("B2").set_value_string("fixed");

    let v = values(&[("X", "5°")]);
    let written = substitute_cells(sheet, &v, &defaults(&[]), &cleanup()).unwrap();

    assert_eq!(written, 1);
    let cell = sheet.get_cell("A1").unwrap();
    assert_eq!(cell.get_value(), "5°");
    assert_eq!(cell.get_style().get_font().map(|f| *f.get_bold()), Some(true));
    assert_eq!(sheet.get_cell("B2").unwrap().get_value(), "fixed");
}

#[test]
fn renders_and_saves_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("template.xlsx");
    let output = dir.path().join("report.xlsx");

    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();
    sheet.get_cell_mut("A1").set_value_string("Paino");
    sheet.get_cell_mut("B1").set_value_string("{AntropPaino} kg");
    sheet.get_cell_mut("B2").set_value_string("{Klonus}(Kyllä)");
    umya_spreadsheet::writer::xlsx::write(&book, &template).unwrap();

    let v = values(&[("AntropPaino", "70"), ("Klonus", "Kyllä")]);
    let rendered = render_spreadsheet(&template, &v, &defaults(&[]), &cleanup()).unwrap();
    save_spreadsheet(&rendered, &output).unwrap();

    assert!(!dir.path().join("report.xlsx.tmp").exists());
    let saved = umya_spreadsheet::reader::xlsx::read(&output).unwrap();
    let sheet = saved.get_sheet(&0).unwrap();
    assert_eq!(sheet.get_value("A1"), "Paino");
    assert_eq!(sheet.get_value("B1"), "70 kg");
    assert_eq!(sheet.get_value("B2"), "Kyllä(kl.)");

    let original = umya_spreadsheet::reader::xlsx::read(&template).unwrap();
    assert_eq!(original.get_sheet(&0).unwrap().get_value("B1"), "{AntropPaino} kg");
}

#[test]
fn missing_template_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = render_spreadsheet(
        &dir.path().join("missing.xlsx"),
        &values(&[]),
        &defaults(&[]),
        &cleanup(),
    )
    .unwrap_err();
    assert!(matches!(err, ReportError::Io { .. }));
}

#[test]
fn non_workbook_template_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("template.xls");
    std::fs::write(&template, b"\xd0\xcf\x11\xe0 not really a workbook").unwrap();

    let err = render_spreadsheet(&template, &values(&[]), &defaults(&[]), &cleanup()).unwrap_err();
    assert!(matches!(err, ReportError::SpreadsheetFormat { .. }));
}
