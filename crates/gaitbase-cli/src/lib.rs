//! gaitbase-cli library root.
//!
//! Exposes configuration handling and the report commands so integration
//! tests can drive them without going through argument parsing.

pub mod commands;
pub mod config;
