//! Practice mode: one forgiving call
//!
//! A single call with the lenient hang-up model and the full stage flow.
//! Success asks for a real conversation, not a perfect one: reach the
//! pitch, hold the line for a few turns, and show either decent average
//! quality or broad stage coverage.

use chrono::{DateTime, Utc};
use serde_json::json;

use calltrainer_core::{CoreError, ModeKind, UserInput};
use calltrainer_roleplay::{CallSession, CallStage, Persona, SessionPolicy};

use crate::run::{ModeDeps, ProcessReply, RunOutcome};

pub struct PracticeController {
    deps: ModeDeps,
    session: CallSession,
    persona: Persona,
    started_at: DateTime<Utc>,
    outcome: Option<RunOutcome>,
}

impl PracticeController {
    /// Create the run and return the prospect's greeting
    pub fn new(deps: ModeDeps) -> (Self, String) {
        let mut session = CallSession::new(
            SessionPolicy::practice(&deps.tuning),
            deps.tuning.clone(),
        );
        let greeting = session.open(&deps.responder);
        (
            Self {
                deps,
                session,
                persona: Persona::neutral(),
                started_at: Utc::now(),
                outcome: None,
            },
            greeting,
        )
    }

    pub async fn process_input(&mut self, input: &UserInput) -> Result<ProcessReply, CoreError> {
        if self.outcome.is_some() {
            return Err(CoreError::invalid_state("practice run already finished"));
        }

        let out = self
            .session
            .advance(
                input,
                &self.deps.evaluator,
                &self.deps.responder,
                self.deps.rng.as_ref(),
                &self.persona,
            )
            .await?;

        let mut reply = ProcessReply::simple(out.reply, out.evaluation);
        reply.call_ended = out.call_over;
        if out.call_over {
            self.finalize();
            reply.run_complete = true;
        }
        Ok(reply)
    }

    pub fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    /// Force-finish, scoring whatever happened so far
    pub fn end(&mut self) -> RunOutcome {
        if self.outcome.is_none() {
            self.finalize();
        }
        self.outcome.clone().expect("finalize sets the outcome")
    }

    fn finalize(&mut self) {
        let summary = self.session.summary();
        let t = &self.deps.tuning;

        let reached_pitch = summary.furthest_stage >= CallStage::MiniPitch;
        let enough_turns = summary.turns >= t.practice_min_turns;
        let quality = summary.avg_score >= t.practice_avg_quality
            || summary.stages_completed >= t.practice_min_stages;
        let passed = reached_pitch && enough_turns && quality;

        tracing::info!(
            score = summary.avg_score,
            passed,
            turns = summary.turns,
            furthest = %summary.furthest_stage,
            "practice run finished"
        );

        self.outcome = Some(RunOutcome {
            mode: ModeKind::Practice,
            score: summary.avg_score,
            passed,
            started_at: self.started_at,
            completed_at: Utc::now(),
            details: json!({
                "turns": summary.turns,
                "stages_completed": summary.stages_completed,
                "furthest_stage": summary.furthest_stage.as_str(),
                "hang_up": summary.hang_up,
                "discovery_passed": summary.discovery_passed,
            }),
        });
    }
}
