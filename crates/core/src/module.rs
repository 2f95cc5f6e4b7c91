//! Module and training-mode identifiers

use serde::{Deserialize, Serialize};

/// Identifier of a training module (e.g. "1.2")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(pub String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The five training modes
///
/// A closed set: orchestration dispatches with exhaustive matches, never
/// with string comparison on module ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    /// Single scripted practice call
    Practice,
    /// 10-call endurance run, 6 passes required
    Marathon,
    /// 25-question rapid-fire warm-up
    Quiz,
    /// Extended single call against a persona archetype
    Simulation,
    /// 10 escalating calls with an energy model
    PowerHour,
}

impl ModeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeKind::Practice => "practice",
            ModeKind::Marathon => "marathon",
            ModeKind::Quiz => "quiz",
            ModeKind::Simulation => "simulation",
            ModeKind::PowerHour => "power_hour",
        }
    }

    /// Whether this mode drives full call sessions (Quiz is Q&A only)
    pub fn is_call_based(&self) -> bool {
        !matches!(self, ModeKind::Quiz)
    }
}

impl std::fmt::Display for ModeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
