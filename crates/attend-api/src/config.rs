use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use attend_core::models::session::SessionLimits;
use attend_instruments::risk::RiskRules;
use attend_models::dataset::FallbackPolicy;
use attend_models::pipeline::TrainingConfig;
use attend_models::synthetic;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 2;

pub const CONFIG_ENV: &str = "ATTEND_CONFIG";
pub const BIND_ENV: &str = "ATTEND_BIND";
pub const DATASET_ENV: &str = "ATTEND_DATASET";

const DEFAULT_BIND: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    pub config_version: u32,
    pub bind: String,
    /// CSV dataset; `None` serves synthetic data.
    pub dataset_path: Option<PathBuf>,
    pub fallback: FallbackPolicy,
    pub training: TrainingConfig,
    /// Replaces the built-in risk table when set.
    pub risk_rules: Option<RiskRules>,
    pub sessions: SessionLimits,
}

impl Default for AttendConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            bind: DEFAULT_BIND.to_string(),
            dataset_path: None,
            fallback: FallbackPolicy::Synthetic {
                samples: synthetic::DEFAULT_SAMPLES,
                seed: synthetic::DEFAULT_SEED,
            },
            training: TrainingConfig::default(),
            risk_rules: None,
            sessions: SessionLimits::default(),
        }
    }
}

impl AttendConfig {
    pub fn bind_addr(&self) -> eyre::Result<SocketAddr> {
        self.bind
            .parse()
            .map_err(|e| eyre::eyre!("invalid bind address '{}': {e}", self.bind))
    }

    pub fn rules(&self) -> RiskRules {
        self.risk_rules.clone().unwrap_or_default()
    }

    pub fn validate(&self) -> eyre::Result<()> {
        self.bind_addr()?;
        self.training.validate()?;
        self.sessions.validate()?;
        if let Some(rules) = &self.risk_rules {
            rules.validate()?;
        }
        Ok(())
    }

    /// Environment values win over the file.
    pub fn apply_overrides(&mut self, bind: Option<String>, dataset: Option<PathBuf>) {
        if let Some(bind) = bind {
            self.bind = bind;
        }
        if let Some(dataset) = dataset {
            self.dataset_path = Some(dataset);
        }
    }
}

pub fn config_path() -> eyre::Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("attend").join("config.json"))
}

/// Load the config file (defaults when absent), then apply env overrides.
pub fn load() -> eyre::Result<AttendConfig> {
    let path = config_path()?;
    let mut config = if path.exists() {
        load_from(&path)?
    } else {
        tracing::info!(path = %path.display(), "no config file, using defaults");
        AttendConfig::default()
    };

    config.apply_overrides(
        std::env::var(BIND_ENV).ok(),
        std::env::var_os(DATASET_ENV).map(PathBuf::from),
    );
    config.validate()?;
    Ok(config)
}

pub fn load_from(path: &Path) -> eyre::Result<AttendConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: AttendConfig = serde_json::from_value(migrated)?;
    tracing::info!(path = %path.display(), version = config.config_version, "config loaded");
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        ));
    }

    let obj = json
        .as_object_mut()
        .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;

    // v0 -> v1: `dataset` renamed to `dataset_path`
    if from_version < 1 {
        if let Some(dataset) = obj.remove("dataset") {
            obj.entry("dataset_path").or_insert(dataset);
        }
        tracing::info!("migrated config v0 -> v1 (dataset -> dataset_path)");
    }

    // v1 -> v2: flat synthetic_* keys folded into the `fallback` policy
    if from_version < 2 {
        let enabled = obj
            .remove("synthetic_fallback")
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        let samples = obj
            .remove("synthetic_samples")
            .and_then(|v| v.as_u64())
            .unwrap_or(synthetic::DEFAULT_SAMPLES as u64);
        let seed = obj
            .remove("synthetic_seed")
            .and_then(|v| v.as_u64())
            .unwrap_or(synthetic::DEFAULT_SEED);

        if !obj.contains_key("fallback") {
            let fallback = if enabled {
                serde_json::json!({ "type": "synthetic", "samples": samples, "seed": seed })
            } else {
                serde_json::json!({ "type": "strict" })
            };
            obj.insert("fallback".to_string(), fallback);
        }
        tracing::info!("migrated config v1 -> v2 (added fallback policy)");
    }

    obj.insert(
        "config_version".to_string(),
        serde_json::Value::Number(CURRENT_VERSION.into()),
    );
    Ok(json)
}
