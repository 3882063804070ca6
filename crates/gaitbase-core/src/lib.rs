//! gaitbase-core
//!
//! Pure domain types for range-of-motion and muscle-strength records: field
//! kinds and values, the field schema, patient/measurement records, and the
//! field resolver that turns a record into the flat mapping the report
//! renderers consume. No file formats beyond JSON, no rendering.

pub mod error;
pub mod field;
pub mod labels;
pub mod models;
pub mod resolve;
pub mod schema;
