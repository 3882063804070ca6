use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::field::{FieldKind, FieldSpec};

/// Names of the read-only patient identity fields. They come from the
/// patients table and are always eligible for substitution in reports.
pub mod identity {
    pub const PATIENT_CODE: &str = "TiedotID";
    pub const NAME: &str = "TiedotNimi";
    pub const SSN: &str = "TiedotHetu";
    pub const DIAGNOSIS: &str = "TiedotDiag";

    pub const ALL: [&str; 4] = [PATIENT_CODE, NAME, SSN, DIAGNOSIS];
}

/// Ordered set of measurement fields (the columns of the ROM table).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldSpec>", into = "Vec<FieldSpec>")]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
}

impl FieldSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, CoreError> {
        let mut index = HashMap::with_capacity(fields.len());
        for (i, spec) in fields.iter().enumerate() {
            spec.check()?;
            if identity::ALL.contains(&spec.name.as_str()) {
                return Err(CoreError::InvalidSpec {
                    field: spec.name.clone(),
                    reason: "name is reserved for patient identity".to_string(),
                });
            }
            if index.insert(spec.name.clone(), i).is_some() {
                return Err(CoreError::DuplicateField(spec.name.clone()));
            }
        }

        let schema = Self { fields, index };
        schema.check_derived()?;
        Ok(schema)
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let schema = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), fields = schema.len(), "field schema loaded");
        Ok(schema)
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names as they may appear in report templates: every schema
    /// field plus the identity fields.
    pub fn report_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.iter().map(|f| f.name.as_str()).collect();
        for name in identity::ALL {
            names.push(name);
        }
        names
    }

    /// Derived inputs must exist, be numeric and not be derived themselves.
    fn check_derived(&self) -> Result<(), CoreError> {
        for spec in &self.fields {
            let Some(derived) = &spec.derived else {
                continue;
            };
            for input in [&derived.numerator, &derived.denominator] {
                let ok = self
                    .get(input)
                    .is_some_and(|f| f.kind == FieldKind::Numeric && f.derived.is_none());
                if !ok {
                    return Err(CoreError::InvalidSpec {
                        field: spec.name.clone(),
                        reason: format!("'{input}' is not a plain numeric field"),
                    });
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<FieldSpec>> for FieldSchema {
    type Error = CoreError;

    fn try_from(fields: Vec<FieldSpec>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<FieldSchema> for Vec<FieldSpec> {
    fn from(schema: FieldSchema) -> Self {
        schema.fields
    }
}
