//! Field resolver: flattens a record into report fields.
//!
//! The output is what the report renderers consume: every field name mapped
//! to its report text, the set of fields still at their default, and the unit
//! suffix of every field.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::CoreError;
use crate::field::{FieldSpec, FieldValue};
use crate::models::record::Record;
use crate::schema::FieldSchema;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedFields {
    pub values: BTreeMap<String, String>,
    pub defaults: BTreeSet<String>,
    pub units: BTreeMap<String, String>,
}

impl ResolvedFields {
    /// Values with their unit suffix appended (e.g. "15°").
    pub fn with_units(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|(name, value)| {
                let unit = self.units.get(name).map(String::as_str).unwrap_or_default();
                (name.clone(), format!("{value}{unit}"))
            })
            .collect()
    }

    pub fn is_default(&self, name: &str) -> bool {
        self.defaults.contains(name)
    }
}

/// Resolve `record` against `schema`.
///
/// Stored values are validated against their field spec; absent values take
/// the field default. Keys the schema does not know are skipped.
pub fn resolve_fields(schema: &FieldSchema, record: &Record) -> Result<ResolvedFields, CoreError> {
    for name in record.measurement.values.keys() {
        if !schema.contains(name) {
            tracing::warn!(field = %name, "ignoring stored value for unknown field");
        }
    }

    let mut raw: BTreeMap<&str, FieldValue> = BTreeMap::new();
    for spec in schema.iter().filter(|s| s.derived.is_none()) {
        let value = match record.measurement.get(&spec.name) {
            Some(value) => {
                spec.validate(value)?;
                value.clone()
            }
            None => spec.default_value(),
        };
        raw.insert(spec.name.as_str(), value);
    }

    for spec in schema.iter() {
        if let Some(derived) = &spec.derived {
            let value = derive_value(
                spec,
                raw.get(derived.numerator.as_str()),
                raw.get(derived.denominator.as_str()),
            );
            raw.insert(spec.name.as_str(), value);
        }
    }

    let mut resolved = ResolvedFields::default();
    for spec in schema.iter() {
        let Some(value) = raw.get(spec.name.as_str()) else {
            continue;
        };
        if spec.is_default(value) {
            resolved.defaults.insert(spec.name.clone());
        }
        resolved.units.insert(spec.name.clone(), spec.unit_for(value).to_string());
        resolved.values.insert(spec.name.clone(), spec.format(value));
    }

    for (name, value) in record.patient.identity_fields() {
        resolved.units.insert(name.to_string(), String::new());
        resolved.values.insert(name.to_string(), value);
    }

    tracing::debug!(
        fields = resolved.values.len(),
        at_default = resolved.defaults.len(),
        "record resolved"
    );
    Ok(resolved)
}

/// Ratio of two readings; unmeasured when either input is, or when the
/// denominator is zero.
fn derive_value(
    spec: &FieldSpec,
    numerator: Option<&FieldValue>,
    denominator: Option<&FieldValue>,
) -> FieldValue {
    let numerator = numerator.and_then(FieldValue::as_number);
    let denominator = denominator.and_then(FieldValue::as_number);
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => FieldValue::Number(n / d),
        _ => spec.default_value(),
    }
}
