//! Run registry and orchestration
//!
//! Runs live in a concurrent map keyed by run id; each run's controller
//! sits behind its own async mutex so concurrent inputs to one run are
//! serialized while different runs proceed in parallel. Persistence is
//! best-effort: a failed write is logged and the computed outcome is
//! still returned to the caller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use calltrainer_config::{CannedLines, RubricSet, Settings, Tuning};
use calltrainer_core::{
    CoreError, ModeKind, ModuleId, RngSource, TextGenerator, UserInput, UtteranceEvaluator,
};
use calltrainer_llm::{OllamaBackend, OracleEvaluator};
use calltrainer_modes::{ModeController, ModeDeps, ProcessReply, RunOutcome};
use calltrainer_progress::{CompletionRecord, ModuleStatus, ProgressStore, UnlockRuleEngine};
use calltrainer_roleplay::{DialogueResponder, RubricEvaluator};

/// Response to a successful run creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunCreated {
    pub run_id: Uuid,
    pub module_id: ModuleId,
    pub kind: ModeKind,
    /// The prospect's greeting, or the quiz intro
    pub opening: String,
}

struct RunEntry {
    user_id: String,
    module_id: ModuleId,
    kind: ModeKind,
    controller: Mutex<ModeController>,
    last_activity: parking_lot::Mutex<Instant>,
}

impl RunEntry {
    fn touch(&self) {
        *self.last_activity.lock() = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_activity.lock().elapsed()
    }
}

/// The trainer's orchestration core
pub struct TrainerEngine {
    settings: Arc<Settings>,
    tuning: Arc<Tuning>,
    rubrics: Arc<RubricSet>,
    lines: Arc<CannedLines>,
    generator: Option<Arc<dyn TextGenerator>>,
    store: Arc<dyn ProgressStore>,
    rng: Arc<dyn RngSource>,
    unlock: UnlockRuleEngine,
    runs: DashMap<Uuid, Arc<RunEntry>>,
}

impl TrainerEngine {
    /// Build the engine from settings, constructing the oracle backend
    /// when one is enabled.
    pub fn new(
        settings: Settings,
        store: Arc<dyn ProgressStore>,
        rng: Arc<dyn RngSource>,
    ) -> Result<Self, CoreError> {
        let generator: Option<Arc<dyn TextGenerator>> = if settings.oracle.enabled {
            Some(Arc::new(OllamaBackend::new(settings.oracle.clone())?))
        } else {
            None
        };
        Ok(Self::with_generator(settings, store, rng, generator))
    }

    /// Build with an explicit (or absent) text generator
    pub fn with_generator(
        settings: Settings,
        store: Arc<dyn ProgressStore>,
        rng: Arc<dyn RngSource>,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        let tuning = Arc::new(settings.tuning.clone());
        Self {
            settings: Arc::new(settings),
            tuning,
            rubrics: Arc::new(RubricSet::builtin()),
            lines: Arc::new(CannedLines::builtin()),
            generator,
            store,
            rng,
            unlock: UnlockRuleEngine::new(),
            runs: DashMap::new(),
        }
    }

    /// Number of live runs
    pub fn active_runs(&self) -> usize {
        self.runs.len()
    }

    /// Unlock status and progress for every catalog module
    pub async fn module_overview(&self, user_id: &str) -> Result<Vec<ModuleStatus>, CoreError> {
        let ledger = self.store.ledger(user_id).await?;
        Ok(self.unlock.overview(&ledger))
    }

    /// Start a run of the module's mode for a user
    pub async fn create_run(
        &self,
        user_id: &str,
        module_id: &ModuleId,
    ) -> Result<RunCreated, CoreError> {
        let spec = calltrainer_config::find_module(module_id)
            .ok_or_else(|| CoreError::not_found(format!("module {}", module_id)))?;

        let ledger = self.store.ledger(user_id).await?;
        let decision = self.unlock.check(module_id, &ledger)?;
        if !decision.unlocked {
            return Err(CoreError::Locked(
                decision.reason.unwrap_or_else(|| "module locked".to_string()),
            ));
        }

        self.evict_stale().await;
        if self.runs.len() >= self.settings.max_active_runs {
            return Err(CoreError::validation("active run capacity reached"));
        }

        let (controller, opening) = ModeController::create(spec.kind, self.build_deps());
        let run_id = Uuid::new_v4();
        self.runs.insert(
            run_id,
            Arc::new(RunEntry {
                user_id: user_id.to_string(),
                module_id: module_id.clone(),
                kind: spec.kind,
                controller: Mutex::new(controller),
                last_activity: parking_lot::Mutex::new(Instant::now()),
            }),
        );

        tracing::info!(%run_id, user = user_id, module = %module_id, kind = %spec.kind, "run created");
        Ok(RunCreated {
            run_id,
            module_id: module_id.clone(),
            kind: spec.kind,
            opening,
        })
    }

    /// Feed one user input to a live run
    pub async fn process_input(
        &self,
        run_id: Uuid,
        input: &UserInput,
    ) -> Result<ProcessReply, CoreError> {
        let entry = self
            .runs
            .get(&run_id)
            .map(|e| e.value().clone())
            .ok_or_else(|| CoreError::not_found(format!("run {}", run_id)))?;

        let mut controller = entry.controller.lock().await;
        if controller.is_complete() {
            return Err(CoreError::invalid_state("run already finished"));
        }

        let reply = controller.process_input(input).await?;
        entry.touch();

        if reply.run_complete {
            let outcome = controller
                .outcome()
                .cloned()
                .ok_or_else(|| CoreError::invalid_state("completed run without outcome"))?;
            drop(controller);
            self.persist_outcome(&entry, &outcome).await;
        }
        Ok(reply)
    }

    /// Force-finish a run and return its outcome. The run is removed from
    /// the registry either way.
    pub async fn end_run(&self, run_id: Uuid) -> Result<RunOutcome, CoreError> {
        let (_, entry) = self
            .runs
            .remove(&run_id)
            .ok_or_else(|| CoreError::not_found(format!("run {}", run_id)))?;

        let mut controller = entry.controller.lock().await;
        let already_complete = controller.is_complete();
        let outcome = controller.end();
        drop(controller);

        // A run that completed through process_input was persisted there
        if !already_complete {
            self.persist_outcome(&entry, &outcome).await;
        }
        tracing::info!(%run_id, score = outcome.score, passed = outcome.passed, "run ended");
        Ok(outcome)
    }

    /// Per-run machinery. The responder is fresh per run so objection
    /// bookkeeping stays scoped to it.
    fn build_deps(&self) -> ModeDeps {
        let timeout = Duration::from_secs(self.settings.oracle.timeout_secs);
        let oracle: Option<Arc<dyn UtteranceEvaluator>> = self.generator.as_ref().map(|g| {
            Arc::new(OracleEvaluator::new(
                g.clone(),
                self.rubrics.clone(),
                self.tuning.clone(),
            )) as Arc<dyn UtteranceEvaluator>
        });

        ModeDeps {
            evaluator: Arc::new(RubricEvaluator::new(
                oracle,
                self.rubrics.clone(),
                self.tuning.clone(),
                timeout,
            )),
            responder: Arc::new(DialogueResponder::new(
                self.generator.clone(),
                self.lines.clone(),
                self.rng.clone(),
                timeout,
            )),
            rng: self.rng.clone(),
            tuning: self.tuning.clone(),
        }
    }

    /// Drop runs idle past the configured timeout, scoring what they had
    async fn evict_stale(&self) {
        let timeout = Duration::from_secs(self.settings.run_timeout_secs);
        let stale: Vec<Uuid> = self
            .runs
            .iter()
            .filter(|e| e.value().idle_for() >= timeout)
            .map(|e| *e.key())
            .collect();

        for run_id in stale {
            let Some((_, entry)) = self.runs.remove(&run_id) else {
                continue;
            };
            // An idle run's controller lock is free; skip it if not
            let Ok(mut controller) = entry.controller.try_lock() else {
                continue;
            };
            let already_complete = controller.is_complete();
            let outcome = controller.end();
            drop(controller);
            if !already_complete {
                self.persist_outcome(&entry, &outcome).await;
            }
            tracing::info!(%run_id, "stale run evicted");
        }
    }

    /// Best-effort persistence: a failed write never fails the caller
    async fn persist_outcome(&self, entry: &RunEntry, outcome: &RunOutcome) {
        let record = CompletionRecord {
            id: Uuid::new_v4(),
            user_id: entry.user_id.clone(),
            module_id: entry.module_id.clone(),
            mode: entry.kind,
            score: outcome.score,
            passed: outcome.passed,
            started_at: outcome.started_at,
            completed_at: outcome.completed_at,
            details: outcome.details.clone(),
        };
        if let Err(e) = self.store.record_completion(&record).await {
            tracing::warn!(
                user = %entry.user_id,
                module = %entry.module_id,
                error = %e,
                "failed to persist completion; outcome still returned"
            );
        }
    }
}
