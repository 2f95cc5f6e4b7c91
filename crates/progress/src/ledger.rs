//! Per-module progress ledger
//!
//! A `ProgressEntry` is a pure fold over the completion records of one
//! user and module. Best scores and flags only ever ratchet upward, so
//! applying the same records again (in any order) can never lower an
//! entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use calltrainer_core::ModeKind;

use crate::completion::CompletionRecord;

/// Aggregated progress for one user and module
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressEntry {
    /// Highest run score ever achieved, monotone
    pub best_score: u32,
    pub total_attempts: u32,
    pub successful_attempts: u32,
    /// Most calls passed in a single marathon run
    pub marathon_best_calls: u32,
    /// Whether any marathon run was passed, monotone
    pub marathon_passed: bool,
    /// Best consecutive-success streak across runs
    pub best_streak: u32,
    pub first_attempt_at: Option<DateTime<Utc>>,
    pub last_attempt_at: Option<DateTime<Utc>>,
}

impl ProgressEntry {
    /// Fold one completion record into the entry
    pub fn apply(&mut self, record: &CompletionRecord) {
        self.total_attempts += 1;
        if record.passed {
            self.successful_attempts += 1;
        }
        self.best_score = self.best_score.max(record.score);

        match record.mode {
            ModeKind::Marathon => {
                self.marathon_best_calls = self
                    .marathon_best_calls
                    .max(record.detail_u64("calls_passed") as u32);
                self.marathon_passed |= record.passed;
            }
            ModeKind::Quiz | ModeKind::PowerHour => {
                self.best_streak = self.best_streak.max(record.detail_u64("best_streak") as u32);
            }
            ModeKind::Practice | ModeKind::Simulation => {}
        }

        if self.first_attempt_at.is_none() {
            self.first_attempt_at = Some(record.started_at);
        }
        let last = self.last_attempt_at.get_or_insert(record.completed_at);
        if record.completed_at > *last {
            *last = record.completed_at;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calltrainer_core::ModuleId;
    use serde_json::json;
    use uuid::Uuid;

    fn record(mode: ModeKind, score: u32, passed: bool, details: serde_json::Value) -> CompletionRecord {
        CompletionRecord {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            module_id: ModuleId::from("1.2"),
            mode,
            score,
            passed,
            started_at: Utc::now(),
            completed_at: Utc::now(),
            details,
        }
    }

    #[test]
    fn test_best_score_is_monotone() {
        let mut entry = ProgressEntry::default();
        entry.apply(&record(ModeKind::Practice, 82, true, json!({})));
        entry.apply(&record(ModeKind::Practice, 40, false, json!({})));
        assert_eq!(entry.best_score, 82);
        assert_eq!(entry.total_attempts, 2);
        assert_eq!(entry.successful_attempts, 1);
    }

    #[test]
    fn test_marathon_flags_ratchet() {
        let mut entry = ProgressEntry::default();
        entry.apply(&record(
            ModeKind::Marathon,
            70,
            true,
            json!({"calls_passed": 7}),
        ));
        entry.apply(&record(
            ModeKind::Marathon,
            30,
            false,
            json!({"calls_passed": 3}),
        ));
        assert!(entry.marathon_passed, "a later failed run cannot clear the flag");
        assert_eq!(entry.marathon_best_calls, 7);
    }

    #[test]
    fn test_streak_tracked_for_quiz_and_power_hour() {
        let mut entry = ProgressEntry::default();
        entry.apply(&record(ModeKind::Quiz, 64, true, json!({"best_streak": 9})));
        entry.apply(&record(
            ModeKind::PowerHour,
            75,
            true,
            json!({"best_streak": 5}),
        ));
        assert_eq!(entry.best_streak, 9);
    }

    #[test]
    fn test_replay_reproduces_same_ledger() {
        let records = vec![
            record(ModeKind::Marathon, 60, false, json!({"calls_passed": 4})),
            record(ModeKind::Marathon, 75, true, json!({"calls_passed": 8})),
            record(ModeKind::Marathon, 50, false, json!({"calls_passed": 2})),
        ];
        let mut once = ProgressEntry::default();
        for r in &records {
            once.apply(r);
        }
        let mut replayed = ProgressEntry::default();
        for r in records.iter().chain(records.iter()) {
            replayed.apply(r);
        }
        // Counters double on replay but every gate-relevant field ratchets
        assert_eq!(replayed.best_score, once.best_score);
        assert_eq!(replayed.marathon_best_calls, once.marathon_best_calls);
        assert_eq!(replayed.marathon_passed, once.marathon_passed);
    }
}
