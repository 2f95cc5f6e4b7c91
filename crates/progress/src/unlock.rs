//! Unlock rule engine
//!
//! Pure decisions over the static module catalog and a ledger snapshot.
//! A module with no ledger row is treated as never attempted, which locks
//! anything gated on it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use calltrainer_config::{find_module, module_catalog, ModuleSpec, PassCondition};
use calltrainer_core::{CoreError, ModeKind, ModuleId};

use crate::ledger::ProgressEntry;

/// Outcome of an unlock check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockDecision {
    pub unlocked: bool,
    /// Human-readable reason when locked
    pub reason: Option<String>,
}

impl UnlockDecision {
    fn unlocked() -> Self {
        Self {
            unlocked: true,
            reason: None,
        }
    }

    fn locked(reason: String) -> Self {
        Self {
            unlocked: false,
            reason: Some(reason),
        }
    }
}

/// One row of the module overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleStatus {
    pub id: ModuleId,
    pub title: String,
    pub kind: ModeKind,
    pub unlocked: bool,
    pub locked_reason: Option<String>,
    pub best_score: u32,
    pub total_attempts: u32,
}

/// Stateless unlock rules over the static catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlockRuleEngine;

impl UnlockRuleEngine {
    pub fn new() -> Self {
        Self
    }

    /// Decide whether one module is unlocked for a ledger snapshot
    pub fn check(
        &self,
        module_id: &ModuleId,
        snapshot: &HashMap<ModuleId, ProgressEntry>,
    ) -> Result<UnlockDecision, CoreError> {
        let spec = find_module(module_id)
            .ok_or_else(|| CoreError::not_found(format!("module {}", module_id)))?;
        Ok(self.check_spec(spec, snapshot))
    }

    fn check_spec(
        &self,
        spec: &ModuleSpec,
        snapshot: &HashMap<ModuleId, ProgressEntry>,
    ) -> UnlockDecision {
        let Some(prereq) = &spec.prerequisite else {
            return UnlockDecision::unlocked();
        };

        let entry = snapshot.get(&prereq.module);
        let prereq_title = find_module(&prereq.module)
            .map(|m| m.title.as_str())
            .unwrap_or(prereq.module.as_str());

        match prereq.condition {
            PassCondition::BestScoreAtLeast { score } => {
                let best = entry.map(|e| e.best_score).unwrap_or(0);
                if best >= score {
                    UnlockDecision::unlocked()
                } else {
                    UnlockDecision::locked(format!(
                        "requires a best score of {} or higher in {} ({}), currently {}",
                        score, prereq_title, prereq.module, best
                    ))
                }
            }
            PassCondition::MarathonPassed => {
                if entry.map(|e| e.marathon_passed).unwrap_or(false) {
                    UnlockDecision::unlocked()
                } else {
                    UnlockDecision::locked(format!(
                        "requires a passed marathon run in {} ({})",
                        prereq_title, prereq.module
                    ))
                }
            }
        }
    }

    /// Unlock status of every catalog module for one snapshot
    pub fn overview(&self, snapshot: &HashMap<ModuleId, ProgressEntry>) -> Vec<ModuleStatus> {
        module_catalog()
            .iter()
            .map(|spec| {
                let decision = self.check_spec(spec, snapshot);
                let entry = snapshot.get(&spec.id);
                ModuleStatus {
                    id: spec.id.clone(),
                    title: spec.title.clone(),
                    kind: spec.kind,
                    unlocked: decision.unlocked,
                    locked_reason: decision.reason,
                    best_score: entry.map(|e| e.best_score).unwrap_or(0),
                    total_attempts: entry.map(|e| e.total_attempts).unwrap_or(0),
                }
            })
            .collect()
    }
}
