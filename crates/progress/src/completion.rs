//! Completion records
//!
//! One record per finished run. Records are append-only: nothing in the
//! system ever mutates or deletes one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use calltrainer_core::{ModeKind, ModuleId};

/// Immutable record of one finished mode run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub id: Uuid,
    pub user_id: String,
    pub module_id: ModuleId,
    pub mode: ModeKind,
    /// Run-level score, 0-100
    pub score: u32,
    pub passed: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Mode-specific extras (calls passed, best streak, persona, ...)
    pub details: serde_json::Value,
}

impl CompletionRecord {
    pub fn duration_minutes(&self) -> i64 {
        (self.completed_at - self.started_at).num_minutes()
    }

    /// Numeric detail field, 0 when absent or not a number
    pub fn detail_u64(&self, key: &str) -> u64 {
        self.details.get(key).and_then(|v| v.as_u64()).unwrap_or(0)
    }

    /// Boolean detail field, false when absent
    pub fn detail_bool(&self, key: &str) -> bool {
        self.details
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}
