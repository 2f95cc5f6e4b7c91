//! Shared run types for mode controllers

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use calltrainer_config::Tuning;
use calltrainer_core::{ModeKind, RngSource, RubricResult};
use calltrainer_roleplay::{DialogueResponder, RubricEvaluator};

/// Shared machinery a mode run needs. The responder is per-run on
/// purpose: its no-repeat objection bookkeeping spans every call of the
/// run.
#[derive(Clone)]
pub struct ModeDeps {
    pub evaluator: Arc<RubricEvaluator>,
    pub responder: Arc<DialogueResponder>,
    pub rng: Arc<dyn RngSource>,
    pub tuning: Arc<Tuning>,
}

/// What one processed input produced
#[derive(Debug, Clone)]
pub struct ProcessReply {
    /// The prospect's line, or quiz feedback plus the next prompt
    pub text: String,
    /// Rubric evaluation of the input, when one happened
    pub evaluation: Option<RubricResult>,
    /// Opening line of the next call in multi-call modes
    pub next_call_greeting: Option<String>,
    /// Short status line ("Call 3 of 10, 2 passed")
    pub progress_note: Option<String>,
    /// The current call (or question run) ended with this input
    pub call_ended: bool,
    /// The whole run is finished; a `RunOutcome` is available
    pub run_complete: bool,
}

impl ProcessReply {
    pub(crate) fn simple(text: String, evaluation: Option<RubricResult>) -> Self {
        Self {
            text,
            evaluation,
            next_call_greeting: None,
            progress_note: None,
            call_ended: false,
            run_complete: false,
        }
    }
}

/// Final result of one mode run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub mode: ModeKind,
    /// Run-level score, 0-100
    pub score: u32,
    pub passed: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Mode-specific extras, folded into the progress ledger
    pub details: serde_json::Value,
}
