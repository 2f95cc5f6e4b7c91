//! Configuration for the cold-call trainer
//!
//! Supports loading configuration from:
//! - YAML/TOML files
//! - Environment variables (CALLTRAINER_ prefix)
//!
//! Static rule tables (rubrics, canned lines, quiz bank, module catalog)
//! ship with built-in defaults and can be overridden from YAML. Every
//! product-tuning number lives in `Tuning` as a named, overridable field.

pub mod lines;
pub mod modules;
pub mod quiz_bank;
pub mod rubrics;
pub mod settings;
pub mod tuning;

pub use lines::{CannedLines, GreetingTone};
pub use modules::{find_module, module_catalog, ModuleSpec, PassCondition, Prerequisite};
pub use quiz_bank::{Difficulty, QuizBank, QuizCategory, QuizQuestion};
pub use rubrics::{CriterionCheck, CriterionSpec, RubricSet, RubricSpec};
pub use settings::{load_settings, OracleConfig, RuntimeEnvironment, Settings};
pub use tuning::{HangupStepTable, Tuning};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
