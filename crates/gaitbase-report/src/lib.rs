//! gaitbase-report
//!
//! Conditional report templating for ROM records: text reports assembled
//! from template blocks, and spreadsheet reports filled in cell by cell.
//! Template text that only refers to unmeasured fields is left out.

pub mod check;
pub mod docx;
pub mod error;
pub mod fragment;
pub mod sheet;
pub mod styles;
pub mod tables;
pub mod template;
pub mod text;
