use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

/// Default cap on conditional-evaluation passes before a cycle is reported.
pub const DEFAULT_MAX_CONDITION_PASSES: usize = 10;

/// How `calculate_score` treats a missing or non-numeric source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingScoreSource {
    /// Count it as zero everywhere, including an average's denominator.
    #[default]
    Zero,
    /// Count it as zero for sums, but leave it out of an average's
    /// denominator.
    Exclude,
}

/// Tunables shared by the runtime and the authoring store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default = "default_max_condition_passes")]
    pub max_condition_passes: usize,
    #[serde(default)]
    pub missing_score_source: MissingScoreSource,
    /// Oldest authoring snapshots are dropped past this many. `None` keeps
    /// the whole session.
    #[serde(default)]
    pub history_limit: Option<usize>,
}

fn default_max_condition_passes() -> usize {
    DEFAULT_MAX_CONDITION_PASSES
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            max_condition_passes: DEFAULT_MAX_CONDITION_PASSES,
            missing_score_source: MissingScoreSource::Zero,
            history_limit: None,
        }
    }
}

pub fn load_config(path: &Path) -> Result<EngineConfig, CoreError> {
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse a config document, migrating older versions first.
pub fn parse_config(contents: &str) -> Result<EngineConfig, CoreError> {
    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: EngineConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> Result<serde_json::Value, CoreError> {
    if from_version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedConfigVersion {
            found: from_version,
            supported: CURRENT_VERSION,
        });
    }

    // v0 → v1: `max_iterations` renamed to `max_condition_passes`
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| CoreError::InvalidConfig("config is not a JSON object".into()))?;
        if let Some(passes) = obj.remove("max_iterations") {
            obj.entry("max_condition_passes").or_insert(passes);
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated engine config v0 → v1 (renamed max_iterations)");
    }

    Ok(json)
}

pub fn save_config(path: &Path, config: &EngineConfig) -> Result<(), CoreError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "engine config saved");
    Ok(())
}
