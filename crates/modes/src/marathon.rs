//! Marathon mode: the ten-call gauntlet
//!
//! Ten back-to-back calls under the strict hang-up model, plus a one-shot
//! random hang-up per call after a passed opener. A call succeeds when it
//! gets discovery done; six successes pass the run.

use chrono::{DateTime, Utc};
use serde_json::json;

use calltrainer_core::{CoreError, ModeKind, UserInput};
use calltrainer_roleplay::{CallSession, CallSummary, Persona, SessionPolicy};

use crate::run::{ModeDeps, ProcessReply, RunOutcome};

pub struct MarathonController {
    deps: ModeDeps,
    current: CallSession,
    persona: Persona,
    summaries: Vec<CallSummary>,
    started_at: DateTime<Utc>,
    outcome: Option<RunOutcome>,
}

impl MarathonController {
    pub fn new(deps: ModeDeps) -> (Self, String) {
        let mut current = CallSession::new(
            SessionPolicy::marathon(&deps.tuning),
            deps.tuning.clone(),
        );
        let greeting = current.open(&deps.responder);
        (
            Self {
                deps,
                current,
                persona: Persona::neutral(),
                summaries: Vec::new(),
                started_at: Utc::now(),
                outcome: None,
            },
            greeting,
        )
    }

    fn calls_passed(&self) -> usize {
        self.summaries.iter().filter(|s| s.succeeded()).count()
    }

    pub async fn process_input(&mut self, input: &UserInput) -> Result<ProcessReply, CoreError> {
        if self.outcome.is_some() {
            return Err(CoreError::invalid_state("marathon run already finished"));
        }

        let out = self
            .current
            .advance(
                input,
                &self.deps.evaluator,
                &self.deps.responder,
                self.deps.rng.as_ref(),
                &self.persona,
            )
            .await?;

        let mut reply = ProcessReply::simple(out.reply, out.evaluation);
        if !out.call_over {
            return Ok(reply);
        }
        reply.call_ended = true;

        let summary = self.current.summary();
        tracing::debug!(
            call = self.summaries.len() + 1,
            succeeded = summary.succeeded(),
            hang_up = summary.hang_up,
            "marathon call finished"
        );
        self.summaries.push(summary);

        let total = self.deps.tuning.marathon_total_calls;
        if self.summaries.len() >= total {
            self.finalize();
            reply.run_complete = true;
            return Ok(reply);
        }

        // Straight into the next dial
        let mut next = CallSession::new(
            SessionPolicy::marathon(&self.deps.tuning),
            self.deps.tuning.clone(),
        );
        reply.next_call_greeting = Some(next.open(&self.deps.responder));
        reply.progress_note = Some(format!(
            "Call {} of {}, {} passed so far",
            self.summaries.len() + 1,
            total,
            self.calls_passed()
        ));
        self.current = next;
        Ok(reply)
    }

    pub fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    /// Force-finish; the call in progress is discarded, completed calls
    /// are scored as they stand.
    pub fn end(&mut self) -> RunOutcome {
        if self.outcome.is_none() {
            self.finalize();
        }
        self.outcome.clone().expect("finalize sets the outcome")
    }

    fn finalize(&mut self) {
        let total = self.deps.tuning.marathon_total_calls;
        let calls_passed = self.calls_passed();
        let passed = calls_passed >= self.deps.tuning.marathon_calls_to_pass;
        let score = ((calls_passed as f64 / total as f64) * 100.0).round() as u32;
        let hang_ups = self.summaries.iter().filter(|s| s.hang_up).count();

        tracing::info!(calls_passed, hang_ups, passed, "marathon run finished");

        self.outcome = Some(RunOutcome {
            mode: ModeKind::Marathon,
            score,
            passed,
            started_at: self.started_at,
            completed_at: Utc::now(),
            details: json!({
                "calls_passed": calls_passed,
                "calls_completed": self.summaries.len(),
                "calls_total": total,
                "hang_ups": hang_ups,
            }),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::test_support::{canned_deps, scripted_deps};

    const STRONG_OPENER: &str = "Hey, I know this is out of the blue, but the reason I'm \
         calling is we help ops teams around here. Mind if I take thirty seconds?";
    const OBJECTION_REPLY: &str = "That's fair, I get that completely. Out of curiosity, \
         how do you handle it today?";
    const PITCH: &str = "Fair enough. We help companies like yours save hours every week \
         without extra headcount, and our clients usually see results in a month. \
         Worth a quick look?";
    const DISCOVERY: &str = "How does your team currently handle outreach right now?";

    /// Drive one winning call: opener, two objections, pitch, discovery
    async fn play_winning_call(controller: &mut MarathonController) -> ProcessReply {
        let mut last = None;
        for utterance in [STRONG_OPENER, OBJECTION_REPLY, OBJECTION_REPLY, PITCH, DISCOVERY] {
            last = Some(
                controller
                    .process_input(&UserInput::spoke(utterance))
                    .await
                    .unwrap(),
            );
        }
        last.unwrap()
    }

    #[tokio::test]
    async fn test_ten_winning_calls_pass_the_run() {
        let (mut controller, _) = MarathonController::new(canned_deps(3));

        for call in 0..10 {
            let last = play_winning_call(&mut controller).await;
            assert!(last.call_ended);
            if call < 9 {
                assert!(last.next_call_greeting.is_some());
                assert!(!last.run_complete);
            } else {
                assert!(last.run_complete);
            }
        }

        let outcome = controller.outcome().unwrap();
        assert!(outcome.passed);
        assert_eq!(outcome.score, 100);
        assert_eq!(outcome.details["calls_passed"], 10);
        assert_eq!(outcome.details["hang_ups"], 0);
    }

    #[tokio::test]
    async fn test_random_hangup_counts_call_as_failed() {
        // The passed opener arms the one-shot draw; it fires on turn 2
        // once the performance check (0.99) misses
        let (mut controller, _) = MarathonController::new(scripted_deps(vec![0.99, 0.99, 0.0]));

        let first = controller
            .process_input(&UserInput::spoke(STRONG_OPENER))
            .await
            .unwrap();
        assert!(!first.call_ended, "never a hang-up on the first turn");

        let reply = controller
            .process_input(&UserInput::spoke(OBJECTION_REPLY))
            .await
            .unwrap();
        assert!(reply.call_ended);
        assert!(reply.next_call_greeting.is_some());

        assert_eq!(controller.summaries.len(), 1);
        assert!(controller.summaries[0].hang_up);
        assert!(!controller.summaries[0].succeeded());
    }

    #[tokio::test]
    async fn test_forced_end_scores_completed_calls_only() {
        let (mut controller, _) = MarathonController::new(canned_deps(4));
        play_winning_call(&mut controller).await;
        // Second call in progress
        controller
            .process_input(&UserInput::spoke(STRONG_OPENER))
            .await
            .unwrap();

        let outcome = controller.end();
        assert_eq!(outcome.details["calls_completed"], 1);
        assert_eq!(outcome.details["calls_passed"], 1);
        assert!(!outcome.passed);
    }
}
