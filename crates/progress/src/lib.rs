//! Progress tracking and module unlocking
//!
//! Completion records are immutable facts; the per-module ledger is a pure
//! fold over them, so replaying history always reproduces the same ledger.
//! Unlock decisions are a pure function of the ledger snapshot and the
//! static module catalog.

pub mod completion;
pub mod ledger;
pub mod store;
pub mod unlock;

pub use completion::CompletionRecord;
pub use ledger::ProgressEntry;
pub use store::{InMemoryProgressStore, ProgressStore};
pub use unlock::{ModuleStatus, UnlockDecision, UnlockRuleEngine};
