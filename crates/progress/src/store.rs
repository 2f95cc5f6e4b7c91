//! Progress persistence
//!
//! The store keeps the raw completion records and the folded per-module
//! ledger. The in-memory implementation backs tests and single-process
//! deployments; the trait seam lets a database-backed store slot in
//! without touching the engine.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use calltrainer_core::{CoreError, ModuleId};

use crate::completion::CompletionRecord;
use crate::ledger::ProgressEntry;

/// Storage seam for completions and the progress ledger
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Append one completion record and fold it into the ledger
    async fn record_completion(&self, record: &CompletionRecord) -> Result<Uuid, CoreError>;

    /// Ledger snapshot for one user, keyed by module
    async fn ledger(&self, user_id: &str) -> Result<HashMap<ModuleId, ProgressEntry>, CoreError>;

    /// Completion history for one user, oldest first
    async fn completions(&self, user_id: &str) -> Result<Vec<CompletionRecord>, CoreError>;
}

#[derive(Default)]
struct Inner {
    completions: Vec<CompletionRecord>,
    ledger: HashMap<(String, ModuleId), ProgressEntry>,
}

/// Process-local store
#[derive(Default)]
pub struct InMemoryProgressStore {
    inner: RwLock<Inner>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn record_completion(&self, record: &CompletionRecord) -> Result<Uuid, CoreError> {
        let mut inner = self.inner.write();
        let key = (record.user_id.clone(), record.module_id.clone());
        inner.ledger.entry(key).or_default().apply(record);
        inner.completions.push(record.clone());
        tracing::debug!(
            user = %record.user_id,
            module = %record.module_id,
            score = record.score,
            passed = record.passed,
            "completion recorded"
        );
        Ok(record.id)
    }

    async fn ledger(&self, user_id: &str) -> Result<HashMap<ModuleId, ProgressEntry>, CoreError> {
        let inner = self.inner.read();
        Ok(inner
            .ledger
            .iter()
            .filter(|((user, _), _)| user == user_id)
            .map(|((_, module), entry)| (module.clone(), entry.clone()))
            .collect())
    }

    async fn completions(&self, user_id: &str) -> Result<Vec<CompletionRecord>, CoreError> {
        let inner = self.inner.read();
        Ok(inner
            .completions
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calltrainer_core::ModeKind;
    use chrono::Utc;
    use serde_json::json;

    fn record(user: &str, module: &str, score: u32, passed: bool) -> CompletionRecord {
        CompletionRecord {
            id: Uuid::new_v4(),
            user_id: user.to_string(),
            module_id: ModuleId::from(module),
            mode: ModeKind::Practice,
            score,
            passed,
            started_at: Utc::now(),
            completed_at: Utc::now(),
            details: json!({}),
        }
    }

    #[tokio::test]
    async fn test_record_then_ledger() {
        let store = InMemoryProgressStore::new();
        store.record_completion(&record("u1", "1.1", 80, true)).await.unwrap();
        store.record_completion(&record("u1", "1.1", 55, false)).await.unwrap();

        let ledger = store.ledger("u1").await.unwrap();
        let entry = ledger.get(&ModuleId::from("1.1")).unwrap();
        assert_eq!(entry.best_score, 80);
        assert_eq!(entry.total_attempts, 2);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let store = InMemoryProgressStore::new();
        store.record_completion(&record("u1", "1.1", 80, true)).await.unwrap();
        store.record_completion(&record("u2", "1.1", 90, true)).await.unwrap();

        assert_eq!(store.completions("u1").await.unwrap().len(), 1);
        let ledger = store.ledger("u2").await.unwrap();
        assert_eq!(ledger.get(&ModuleId::from("1.1")).unwrap().best_score, 90);
        assert!(store.ledger("u3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_keeps_order() {
        let store = InMemoryProgressStore::new();
        for score in [10, 20, 30] {
            store.record_completion(&record("u1", "1.1", score, false)).await.unwrap();
        }
        let scores: Vec<u32> = store
            .completions("u1")
            .await
            .unwrap()
            .iter()
            .map(|r| r.score)
            .collect();
        assert_eq!(scores, vec![10, 20, 30]);
    }
}
