//! Error types shared across the workspace

use thiserror::Error;

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Top-level error taxonomy for the trainer core
///
/// Only `NotFound`, `InvalidState` and `Validation` are ever surfaced to a
/// caller. Oracle failures are recovered via deterministic fallbacks and
/// persistence failures are logged and swallowed (the computed run outcome
/// is still returned).
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("module locked: {0}")]
    Locked(String),

    #[error("external service failure: {0}")]
    ExternalService(#[from] OracleError),

    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl CoreError {
    /// Convenience constructor for unknown run/session ids
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_state(what: impl Into<String>) -> Self {
        Self::InvalidState(what.into())
    }

    pub fn validation(what: impl Into<String>) -> Self {
        Self::Validation(what.into())
    }
}

/// Errors from the external text-generation / evaluation oracles
///
/// These never escape the roleplay layer: any oracle error triggers the
/// deterministic fallback path.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("request timed out")]
    Timeout,

    #[error("configuration error: {0}")]
    Configuration(String),
}
