use serde::{Deserialize, Serialize};

use crate::schema::identity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub patient_code: String,
    pub firstname: String,
    pub lastname: String,
    pub ssn: String,
    #[serde(default)]
    pub diagnosis: String,
}

impl Patient {
    /// The identity fields a report may reference, keyed by their
    /// report names.
    pub fn identity_fields(&self) -> [(&'static str, String); 4] {
        [
            (identity::PATIENT_CODE, self.patient_code.clone()),
            (identity::NAME, format!("{} {}", self.firstname, self.lastname)),
            (identity::SSN, self.ssn.clone()),
            (identity::DIAGNOSIS, self.diagnosis.clone()),
        ]
    }
}
