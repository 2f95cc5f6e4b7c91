//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{ConfigError, Tuning};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Oracle (text generation / NLU evaluation) endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Whether to call the external oracle at all; when false, the
    /// deterministic fallbacks are used for everything
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Chat endpoint (Ollama-style)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name/ID
    #[serde(default = "default_model")]
    pub model: String,

    /// API key for hosted backends
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-call timeout in seconds; on expiry the fallback path is used
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}
fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}
fn default_model() -> String {
    "qwen2.5:7b-instruct-q4_K_M".to_string()
}
fn default_timeout_secs() -> u64 {
    3
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Runtime environment
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Oracle configuration
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Gameplay tuning constants
    #[serde(default)]
    pub tuning: Tuning,

    /// Maximum concurrently active mode runs
    #[serde(default = "default_max_active_runs")]
    pub max_active_runs: usize,

    /// Seconds of inactivity after which a run is evicted
    #[serde(default = "default_run_timeout_secs")]
    pub run_timeout_secs: u64,
}

fn default_max_active_runs() -> usize {
    1000
}
fn default_run_timeout_secs() -> u64 {
    3600
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: RuntimeEnvironment::default(),
            oracle: OracleConfig::default(),
            tuning: Tuning::default(),
            max_active_runs: default_max_active_runs(),
            run_timeout_secs: default_run_timeout_secs(),
        }
    }
}

impl Settings {
    /// Validate settings against the runtime environment
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.oracle.enabled && self.oracle.endpoint.is_empty() {
            if self.environment.is_production() {
                return Err(ConfigError::InvalidValue {
                    field: "oracle.endpoint".to_string(),
                    message: "oracle enabled with empty endpoint".to_string(),
                });
            }
            tracing::warn!("oracle enabled with empty endpoint; fallbacks will be used");
        }
        if self.max_active_runs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_active_runs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Load settings from an optional file plus `CALLTRAINER_` environment
/// variables (e.g. `CALLTRAINER_ORACLE__ENDPOINT`).
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(false));
    }

    builder = builder.add_source(Environment::with_prefix("CALLTRAINER").separator("__"));

    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}
