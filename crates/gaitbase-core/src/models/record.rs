use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::measurement::Measurement;
use crate::models::patient::Patient;

/// A measurement together with the patient it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub patient: Patient,
    pub measurement: Measurement,
}

impl Record {
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}
