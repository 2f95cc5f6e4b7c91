//! User input variants for `process_input`
//!
//! Silence detection happens in the caller (the telephony/HTTP layer owns
//! the timers). It is delivered here as a distinct variant rather than a
//! sentinel string in the speech channel, so "no speech detected" can never
//! be confused with transcript content.

use serde::{Deserialize, Serialize};

/// Which silence threshold elapsed on the caller's side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SilenceKind {
    /// Short silence: the prospect gets impatient but stays on the line
    Impatience,
    /// Long silence: the prospect hangs up
    Hangup,
}

/// One turn of user input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserInput {
    /// The trainee said something
    Spoke { text: String },
    /// The trainee said nothing for long enough to trip a silence timer
    Silence { kind: SilenceKind },
}

impl UserInput {
    pub fn spoke(text: impl Into<String>) -> Self {
        Self::Spoke { text: text.into() }
    }

    pub fn silence(kind: SilenceKind) -> Self {
        Self::Silence { kind }
    }

    /// The spoken text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            UserInput::Spoke { text } => Some(text),
            UserInput::Silence { .. } => None,
        }
    }

    /// True for a `Spoke` variant whose text is empty or whitespace
    pub fn is_blank(&self) -> bool {
        matches!(self, UserInput::Spoke { text } if text.trim().is_empty())
    }
}
