//! Replacement tables applied around substitution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Whole-value rewrites for the text report, applied before substitution
/// (e.g. "Ei mitattu" → "-").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewriteTable(pub BTreeMap<String, String>);

impl RewriteTable {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// A rewritten copy of `values`. Only exact matches are replaced.
    pub fn apply(&self, values: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        values
            .iter()
            .map(|(name, value)| {
                let value = self.0.get(value).unwrap_or(value);
                (name.clone(), value.clone())
            })
            .collect()
    }
}

/// Substring replacements for spreadsheet cells whose text changed during
/// substitution (e.g. "(EI)" → "").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CleanupTable(pub BTreeMap<String, String>);

impl CleanupTable {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (old, new) in &self.0 {
            if !old.is_empty() && out.contains(old.as_str()) {
                out = out.replace(old.as_str(), new);
            }
        }
        out
    }
}
