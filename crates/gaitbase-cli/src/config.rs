use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use gaitbase_core::labels;
use gaitbase_report::styles::DocumentStyles;
use gaitbase_report::tables::{CleanupTable, RewriteTable};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaitbaseConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    pub config_version: u32,
    /// Field schema (JSON list of field specs).
    pub schema_path: Option<PathBuf>,
    pub text_template: Option<PathBuf>,
    pub sheet_template: Option<PathBuf>,
    /// Append units to values in the text report.
    pub include_units: bool,
    pub text_replace: RewriteTable,
    pub sheet_replace: CleanupTable,
    pub docx: DocumentStyles,
}

impl Default for GaitbaseConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            schema_path: None,
            text_template: None,
            sheet_template: None,
            include_units: true,
            text_replace: RewriteTable::new([(labels::NOT_MEASURED, "-"), (labels::NO, "Ei")]),
            sheet_replace: CleanupTable::new([
                (format!("({})", labels::NO), String::new()),
                (format!("({})", labels::YES), "(kl.)".to_string()),
            ]),
            docx: DocumentStyles::default(),
        }
    }
}

pub fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("gaitbase"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

pub fn load_config() -> eyre::Result<GaitbaseConfig> {
    load_config_from(&config_path()?)
}

/// Load the config at `path`, or the built-in defaults when there is no
/// file.
pub fn load_config_from(path: &Path) -> eyre::Result<GaitbaseConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(GaitbaseConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: GaitbaseConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update gaitbase."
        ));
    }

    // v0 → v1: report settings were keyed after the old report module
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        for (old, new) in [
            ("replace_data", "text_replace"),
            ("xls_replace_strings", "sheet_replace"),
            ("xls_template", "sheet_template"),
        ] {
            if let Some(value) = obj.remove(old) {
                obj.entry(new).or_insert(value);
            }
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (renamed report keys)");
    }

    Ok(json)
}

pub fn save_config(config: &GaitbaseConfig) -> eyre::Result<PathBuf> {
    let path = config_path()?;
    save_config_to(config, &path)?;
    Ok(path)
}

pub fn save_config_to(config: &GaitbaseConfig, path: &Path) -> eyre::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
