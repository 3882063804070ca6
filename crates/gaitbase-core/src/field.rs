use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::labels;

/// How a field is entered, and therefore what its "nothing entered" value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Spin box reading. Unmeasured readings hold [`labels::NOT_MEASURED`].
    Numeric,
    /// Line or comment editor. Default is the empty string.
    FreeText,
    /// Checkbox or combo box. Default is the neutral choice.
    Choice,
}

/// A stored field value, as found in a measurement row.
///
/// Numeric fields hold either a `Number` or the not-measured sentinel text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(t) => f.write_str(t),
        }
    }
}

/// A field computed from two numeric inputs, e.g. a torque normalized by
/// body weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derived {
    pub numerator: String,
    pub denominator: String,
}

/// Schema entry for one field (one column of the measurement table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,

    /// Unit suffix shown after genuine numeric readings (e.g. "°", "kg").
    #[serde(default)]
    pub unit: String,

    /// Decimals shown for numeric readings. Zero prints integral values
    /// without a fractional part.
    #[serde(default)]
    pub decimals: u8,

    /// Allowed labels for choice fields.
    #[serde(default)]
    pub choices: Vec<String>,

    /// The unset choice. Falls back to [`labels::NO`] for yes/no checkboxes
    /// and to the first choice otherwise.
    #[serde(default)]
    pub neutral: Option<String>,

    #[serde(default)]
    pub derived: Option<Derived>,
}

impl FieldSpec {
    pub fn numeric(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Numeric,
            unit: unit.into(),
            decimals: 0,
            choices: Vec::new(),
            neutral: None,
            derived: None,
        }
    }

    pub fn free_text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::FreeText,
            unit: String::new(),
            decimals: 0,
            choices: Vec::new(),
            neutral: None,
            derived: None,
        }
    }

    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::choice(name, [labels::YES, labels::NO])
    }

    pub fn choice<I, S>(name: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: FieldKind::Choice,
            unit: String::new(),
            decimals: 0,
            choices: choices.into_iter().map(Into::into).collect(),
            neutral: None,
            derived: None,
        }
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_neutral(mut self, neutral: impl Into<String>) -> Self {
        self.neutral = Some(neutral.into());
        self
    }

    pub fn derived_from(
        mut self,
        numerator: impl Into<String>,
        denominator: impl Into<String>,
    ) -> Self {
        self.derived = Some(Derived {
            numerator: numerator.into(),
            denominator: denominator.into(),
        });
        self
    }

    fn neutral_choice(&self) -> &str {
        if let Some(neutral) = &self.neutral {
            return neutral;
        }
        if self.choices.iter().any(|c| c == labels::NO) {
            return labels::NO;
        }
        self.choices.first().map(String::as_str).unwrap_or_default()
    }

    /// The value meaning "nothing was entered".
    pub fn default_value(&self) -> FieldValue {
        match self.kind {
            FieldKind::Numeric => FieldValue::text(labels::NOT_MEASURED),
            FieldKind::FreeText => FieldValue::text(""),
            FieldKind::Choice => FieldValue::text(self.neutral_choice()),
        }
    }

    pub fn is_default(&self, value: &FieldValue) -> bool {
        *value == self.default_value()
    }

    /// Unit suffix for `value`: non-empty only for a genuine numeric reading.
    pub fn unit_for(&self, value: &FieldValue) -> &str {
        match (self.kind, value) {
            (FieldKind::Numeric, FieldValue::Number(_)) => &self.unit,
            _ => "",
        }
    }

    /// Report text for `value`, without unit.
    pub fn format(&self, value: &FieldValue) -> String {
        match value {
            FieldValue::Number(n) if self.decimals > 0 => {
                format!("{:.*}", usize::from(self.decimals), n)
            }
            other => other.to_string(),
        }
    }

    /// Check that `value` is something this field can hold.
    pub fn validate(&self, value: &FieldValue) -> Result<(), CoreError> {
        let invalid = |reason: String| CoreError::InvalidValue {
            field: self.name.clone(),
            reason,
        };

        match (self.kind, value) {
            (FieldKind::Numeric, FieldValue::Number(n)) if n.is_finite() => Ok(()),
            (FieldKind::Numeric, FieldValue::Number(n)) => {
                Err(invalid(format!("{n} is not a finite reading")))
            }
            (FieldKind::Numeric, FieldValue::Text(t)) if t == labels::NOT_MEASURED => Ok(()),
            (FieldKind::Numeric, FieldValue::Text(t)) => Err(invalid(format!(
                "expected a number or '{}', got '{t}'",
                labels::NOT_MEASURED
            ))),
            (FieldKind::FreeText, FieldValue::Text(_)) => Ok(()),
            (FieldKind::FreeText, FieldValue::Number(n)) => {
                Err(invalid(format!("expected text, got number {n}")))
            }
            (FieldKind::Choice, FieldValue::Text(t)) if self.choices.contains(t) => Ok(()),
            (FieldKind::Choice, other) => Err(invalid(format!(
                "'{other}' is not one of [{}]",
                self.choices.join(", ")
            ))),
        }
    }

    /// Check the entry itself (called once when a schema is loaded).
    pub(crate) fn check(&self) -> Result<(), CoreError> {
        let invalid = |reason: &str| CoreError::InvalidSpec {
            field: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.is_empty() {
            return Err(invalid("empty field name"));
        }
        if self.name.contains(['{', '}']) {
            return Err(invalid("field names cannot contain braces"));
        }
        match self.kind {
            FieldKind::Choice => {
                if self.choices.is_empty() {
                    return Err(invalid("choice field without choices"));
                }
                if !self.choices.iter().any(|c| c == self.neutral_choice()) {
                    return Err(invalid("neutral value is not one of the choices"));
                }
            }
            FieldKind::Numeric | FieldKind::FreeText => {
                if !self.choices.is_empty() {
                    return Err(invalid("only choice fields take choices"));
                }
            }
        }
        if self.derived.is_some() && self.kind != FieldKind::Numeric {
            return Err(invalid("only numeric fields can be derived"));
        }
        Ok(())
    }
}
