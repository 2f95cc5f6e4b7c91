//! Call session state machine
//!
//! One `CallSession` owns one simulated call: the current stage, the
//! transcript, the rubric results and the hang-up state. Each user turn
//! goes through `advance`, which evaluates the utterance, rolls the
//! hang-up dice, moves the stage and produces the prospect's reply.
//!
//! The pickup stage doubles as the first opener attempt: a passing opener
//! skips the retry stage, a weak one that runs out its turn budget gets
//! exactly one retry.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use calltrainer_config::{GreetingTone, Tuning};
use calltrainer_core::{
    CoreError, RngSource, RubricLabel, RubricResult, SilenceKind, Transcript, TranscriptEntry,
    UserInput,
};

use crate::hangup::{hangup_probability, HangupStrictness};
use crate::persona::Persona;
use crate::responder::{DialogueResponder, ProspectCue};
use crate::rubric::RubricEvaluator;
use crate::stage::{CallStage, StageFlow};

/// Per-mode knobs for one call
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    pub strictness: HangupStrictness,
    pub flow: StageFlow,
    /// Hard cap on user turns
    pub max_turns: usize,
    /// Advance a stage after this many turns even without a pass
    pub stage_turn_budget: usize,
    /// Average score needed at soft discovery to enter the extended stage;
    /// `None` means the flow's own shape decides
    pub extended_gate: Option<u32>,
    /// Extra score bar a pass must clear (PowerHour difficulty)
    pub min_pass_score: Option<u32>,
    /// One-shot random hang-up chance, armed by the first passed opener
    /// and drawn no earlier than the second turn
    pub random_hangup: Option<f64>,
    pub greeting_tone: GreetingTone,
}

impl SessionPolicy {
    pub fn practice(tuning: &Tuning) -> Self {
        Self {
            strictness: HangupStrictness::Lenient,
            flow: StageFlow::standard(),
            max_turns: tuning.max_call_turns,
            stage_turn_budget: tuning.stage_turn_budget,
            extended_gate: Some(tuning.practice_extended_quality),
            min_pass_score: None,
            random_hangup: None,
            greeting_tone: GreetingTone::Friendly,
        }
    }

    pub fn marathon(tuning: &Tuning) -> Self {
        Self {
            strictness: HangupStrictness::Strict,
            flow: StageFlow::short(),
            max_turns: tuning.max_call_turns,
            stage_turn_budget: tuning.stage_turn_budget,
            extended_gate: None,
            min_pass_score: None,
            random_hangup: Some(tuning.marathon_random_hangup),
            greeting_tone: GreetingTone::Neutral,
        }
    }

    pub fn simulation(tuning: &Tuning) -> Self {
        Self {
            strictness: HangupStrictness::Lenient,
            flow: StageFlow::standard(),
            max_turns: tuning.simulation_max_turns,
            stage_turn_budget: tuning.stage_turn_budget,
            extended_gate: None,
            min_pass_score: None,
            random_hangup: None,
            greeting_tone: GreetingTone::Neutral,
        }
    }

    /// PowerHour call `call_index` (0-based). Later calls demand higher
    /// scores and open with a worse-tempered prospect.
    pub fn power_hour(tuning: &Tuning, call_index: usize) -> Self {
        let min_pass = 50 + tuning.power_hour_difficulty_step * call_index as u32;
        let tone = match call_index {
            0..=2 => GreetingTone::Friendly,
            3..=6 => GreetingTone::Neutral,
            _ => GreetingTone::Gruff,
        };
        Self {
            strictness: HangupStrictness::Strict,
            flow: StageFlow::short(),
            max_turns: tuning.max_call_turns,
            stage_turn_budget: tuning.stage_turn_budget,
            extended_gate: None,
            min_pass_score: Some(min_pass.min(100)),
            random_hangup: None,
            greeting_tone: tone,
        }
    }
}

/// What one `advance` produced
#[derive(Debug, Clone)]
pub struct AdvanceOutcome {
    /// The prospect's next line
    pub reply: String,
    /// Evaluation of the user's utterance, absent on silence turns
    pub evaluation: Option<RubricResult>,
    /// Stage after this turn
    pub stage: CallStage,
    /// Whether the stage moved this turn
    pub stage_advanced: bool,
    /// Whether the prospect hung up this turn
    pub hang_up: bool,
    /// Whether the call is over (hang-up, terminal stage or turn cap)
    pub call_over: bool,
}

/// Condensed result of a finished call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSummary {
    pub call_id: Uuid,
    pub turns: usize,
    /// Mean rubric score, 0-100
    pub avg_score: u32,
    pub stages_completed: usize,
    /// Furthest stage the call entered
    pub furthest_stage: CallStage,
    pub hang_up: bool,
    /// Discovery rubric passed at least once
    pub discovery_passed: bool,
}

impl CallSummary {
    /// A call counts as a success when it got real discovery done
    pub fn succeeded(&self) -> bool {
        self.discovery_passed
    }
}

/// One simulated cold call
pub struct CallSession {
    id: Uuid,
    policy: SessionPolicy,
    tuning: Arc<Tuning>,
    stage: CallStage,
    turn_count: usize,
    stage_turn_count: usize,
    transcript: Transcript,
    results: Vec<RubricResult>,
    hang_up: bool,
    random_hangup_armed: bool,
    random_hangup_drawn: bool,
    stages_completed: usize,
    furthest_stage: CallStage,
    discovery_passed: bool,
    started_at: DateTime<Utc>,
}

impl CallSession {
    pub fn new(policy: SessionPolicy, tuning: Arc<Tuning>) -> Self {
        let stage = policy.flow.first();
        Self {
            id: Uuid::new_v4(),
            policy,
            tuning,
            stage,
            turn_count: 0,
            stage_turn_count: 0,
            transcript: Transcript::new(),
            results: Vec::new(),
            hang_up: false,
            random_hangup_armed: false,
            random_hangup_drawn: false,
            stages_completed: 0,
            furthest_stage: stage,
            discovery_passed: false,
            started_at: Utc::now(),
        }
    }

    /// The prospect picks up. Called once before the first `advance`.
    pub fn open(&mut self, responder: &DialogueResponder) -> String {
        let greeting = responder.greeting(self.policy.greeting_tone);
        self.transcript
            .append(TranscriptEntry::prospect(greeting.clone(), self.stage.as_str()));
        greeting
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stage(&self) -> CallStage {
        self.stage
    }

    pub fn turns(&self) -> usize {
        self.turn_count
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn results(&self) -> &[RubricResult] {
        &self.results
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn is_over(&self) -> bool {
        self.stage.is_terminal() || self.hang_up || self.turn_count >= self.policy.max_turns
    }

    /// Mean rubric score so far, 0-100
    pub fn avg_score(&self) -> u32 {
        if self.results.is_empty() {
            return 0;
        }
        let sum: u32 = self.results.iter().map(|r| r.score).sum();
        ((sum as f64 / self.results.len() as f64).round()) as u32
    }

    pub fn summary(&self) -> CallSummary {
        CallSummary {
            call_id: self.id,
            turns: self.turn_count,
            avg_score: self.avg_score(),
            stages_completed: self.stages_completed,
            furthest_stage: self.furthest_stage,
            hang_up: self.hang_up,
            discovery_passed: self.discovery_passed,
        }
    }

    /// Process one user turn
    pub async fn advance(
        &mut self,
        input: &UserInput,
        evaluator: &RubricEvaluator,
        responder: &DialogueResponder,
        rng: &dyn RngSource,
        persona: &Persona,
    ) -> Result<AdvanceOutcome, CoreError> {
        if self.is_over() {
            return Err(CoreError::invalid_state("call already ended"));
        }
        if input.is_blank() {
            return Err(CoreError::validation("utterance is empty"));
        }

        match input {
            UserInput::Silence { kind } => Ok(self.advance_silence(*kind, responder, persona).await),
            UserInput::Spoke { text } => {
                self.advance_spoken(text, evaluator, responder, rng, persona)
                    .await
            }
        }
    }

    async fn advance_silence(
        &mut self,
        kind: SilenceKind,
        responder: &DialogueResponder,
        persona: &Persona,
    ) -> AdvanceOutcome {
        self.turn_count += 1;
        let cue = match kind {
            SilenceKind::Impatience => ProspectCue::Impatience,
            SilenceKind::Hangup => ProspectCue::SilenceHangup,
        };
        let reply = responder
            .respond(&cue, persona, None, self.transcript.entries())
            .await;
        self.transcript
            .append(TranscriptEntry::prospect(reply.clone(), self.stage.as_str()));

        if kind == SilenceKind::Hangup {
            self.hang_up = true;
            self.stage = CallStage::CallEnded;
        } else if self.turn_count >= self.policy.max_turns {
            self.stage = CallStage::CallEnded;
        }

        AdvanceOutcome {
            reply,
            evaluation: None,
            stage: self.stage,
            stage_advanced: false,
            hang_up: self.hang_up,
            call_over: self.is_over(),
        }
    }

    async fn advance_spoken(
        &mut self,
        text: &str,
        evaluator: &RubricEvaluator,
        responder: &DialogueResponder,
        rng: &dyn RngSource,
        persona: &Persona,
    ) -> Result<AdvanceOutcome, CoreError> {
        let label = self
            .stage
            .rubric()
            .ok_or_else(|| CoreError::invalid_state("no rubric for terminal stage"))?;

        self.turn_count += 1;
        self.stage_turn_count += 1;
        self.transcript
            .append(TranscriptEntry::user(text, self.stage.as_str()));

        let entries = self.transcript.entries();
        let history = &entries[..entries.len() - 1];
        let result = evaluator.evaluate(label, text, history).await;

        let passed = result.passed
            && self
                .policy
                .min_pass_score
                .map_or(true, |min| result.score >= min);

        if label == RubricLabel::Discovery && passed {
            self.discovery_passed = true;
        }
        let criteria_met = result.criteria_met_count();
        self.results.push(result.clone());

        // Performance-driven hang-up
        let p = hangup_probability(
            &self.tuning,
            self.policy.strictness,
            label,
            criteria_met,
            passed,
            self.turn_count,
            persona.hangup_sensitivity,
        );
        if rng.next_f64() < p {
            let reply = self
                .end_with_farewell(responder, persona, true)
                .await;
            tracing::info!(call = %self.id, stage = %self.stage, "prospect hung up");
            return Ok(AdvanceOutcome {
                reply,
                evaluation: Some(result),
                stage: self.stage,
                stage_advanced: false,
                hang_up: true,
                call_over: true,
            });
        }

        // One-shot random hang-up (Marathon): armed by the first passed
        // opener, drawn on the next turn so it can never end turn 1
        if !self.random_hangup_armed && label == RubricLabel::Opener && passed {
            self.random_hangup_armed = self.policy.random_hangup.is_some();
        }
        if self.random_hangup_armed && !self.random_hangup_drawn && self.turn_count >= 2 {
            self.random_hangup_drawn = true;
            if let Some(chance) = self.policy.random_hangup {
                if rng.next_f64() < chance {
                    let reply = self.end_with_farewell(responder, persona, false).await;
                    tracing::info!(call = %self.id, "random hang-up");
                    return Ok(AdvanceOutcome {
                        reply,
                        evaluation: Some(result),
                        stage: self.stage,
                        stage_advanced: false,
                        hang_up: true,
                        call_over: true,
                    });
                }
            }
        }

        // Stage progression
        let advance_stage = passed || self.stage_turn_count >= self.policy.stage_turn_budget;
        let stage_advanced = if advance_stage {
            let next = self.next_stage(passed);
            self.stages_completed += 1;
            self.stage_turn_count = 0;
            self.stage = next;
            if !next.is_terminal() {
                self.furthest_stage = self.furthest_stage.max(next);
            }
            true
        } else {
            false
        };

        if !self.stage.is_terminal() && self.turn_count >= self.policy.max_turns {
            self.stage = CallStage::CallEnded;
        }

        let cue = if self.stage.is_terminal() {
            ProspectCue::Farewell { annoyed: !passed }
        } else if stage_advanced && self.stage.is_objection() {
            ProspectCue::Objection
        } else {
            ProspectCue::Outcome { label, passed }
        };
        let reply = responder
            .respond(&cue, persona, Some(text), self.transcript.entries())
            .await;
        self.transcript
            .append(TranscriptEntry::prospect(reply.clone(), self.stage.as_str()));

        Ok(AdvanceOutcome {
            reply,
            evaluation: Some(result),
            stage: self.stage,
            stage_advanced,
            hang_up: false,
            call_over: self.is_over(),
        })
    }

    /// Next stage after a pass or an exhausted turn budget. A pass at
    /// pickup skips the opener retry stage; the extended stage is gated on
    /// average quality when the policy says so.
    fn next_stage(&self, passed: bool) -> CallStage {
        let from = if self.stage == CallStage::PhonePickup && passed {
            CallStage::OpenerEvaluation
        } else {
            self.stage
        };
        let next = self.policy.flow.next(from).unwrap_or(CallStage::CallEnded);
        if next == CallStage::ExtendedConversation {
            if let Some(gate) = self.policy.extended_gate {
                if self.avg_score() < gate {
                    return CallStage::CallEnded;
                }
            }
        }
        next
    }

    async fn end_with_farewell(
        &mut self,
        responder: &DialogueResponder,
        persona: &Persona,
        annoyed: bool,
    ) -> String {
        let reply = responder
            .respond(
                &ProspectCue::Farewell { annoyed },
                persona,
                None,
                self.transcript.entries(),
            )
            .await;
        self.transcript
            .append(TranscriptEntry::prospect(reply.clone(), self.stage.as_str()));
        self.hang_up = true;
        self.stage = CallStage::CallEnded;
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calltrainer_config::{CannedLines, RubricSet};
    use calltrainer_core::ScriptedRng;

    const STRONG_OPENER: &str = "Hey, I know this is out of the blue, but the reason I'm calling \
         is we help ops teams around here. Mind if I take thirty seconds?";
    const WEAK_OPENER: &str = "Hello. I am calling to offer you an exciting business opportunity.";

    fn deps() -> (RubricEvaluator, DialogueResponder, Arc<Tuning>) {
        let tuning = Arc::new(Tuning::default());
        let rubrics = Arc::new(RubricSet::builtin());
        let evaluator = RubricEvaluator::fallback_only(rubrics, tuning.clone());
        let responder = DialogueResponder::canned(
            Arc::new(CannedLines::builtin()),
            Arc::new(calltrainer_core::SeededRng::seed_from_u64(11)),
        );
        (evaluator, responder, tuning)
    }

    fn practice_session(tuning: &Arc<Tuning>) -> CallSession {
        CallSession::new(SessionPolicy::practice(tuning), tuning.clone())
    }

    #[tokio::test]
    async fn test_strong_opener_skips_retry_stage() {
        let (evaluator, responder, tuning) = deps();
        let mut session = practice_session(&tuning);
        session.open(&responder);

        let rng = ScriptedRng::new(vec![]);
        let out = session
            .advance(
                &UserInput::spoke(STRONG_OPENER),
                &evaluator,
                &responder,
                &rng,
                &Persona::neutral(),
            )
            .await
            .unwrap();

        assert!(out.evaluation.as_ref().unwrap().passed);
        assert!(out.stage_advanced);
        assert_eq!(out.stage, CallStage::EarlyObjection);
        // Entering an objection stage means the prospect raises one
        assert!(CannedLines::builtin().objection_pool().contains(&out.reply));
    }

    #[tokio::test]
    async fn test_never_hangs_up_on_first_turn() {
        let (evaluator, responder, tuning) = deps();
        let mut session = practice_session(&tuning);
        session.open(&responder);

        // Worst possible draw
        let rng = ScriptedRng::new(vec![0.0, 0.0]);
        let out = session
            .advance(
                &UserInput::spoke(WEAK_OPENER),
                &evaluator,
                &responder,
                &rng,
                &Persona::neutral(),
            )
            .await
            .unwrap();

        assert!(!out.hang_up);
        assert!(!out.call_over);
        assert!(!out.evaluation.unwrap().passed);
    }

    #[tokio::test]
    async fn test_bad_second_turn_can_hang_up() {
        let (evaluator, responder, tuning) = deps();
        let mut session = practice_session(&tuning);
        session.open(&responder);

        let rng = ScriptedRng::new(vec![0.99, 0.0]);
        session
            .advance(
                &UserInput::spoke(WEAK_OPENER),
                &evaluator,
                &responder,
                &rng,
                &Persona::neutral(),
            )
            .await
            .unwrap();
        let out = session
            .advance(
                &UserInput::spoke(WEAK_OPENER),
                &evaluator,
                &responder,
                &rng,
                &Persona::neutral(),
            )
            .await
            .unwrap();

        assert!(out.hang_up);
        assert_eq!(out.stage, CallStage::CallEnded);
        assert!(out.call_over);

        // Ended call rejects further input
        let err = session
            .advance(
                &UserInput::spoke("hello?"),
                &evaluator,
                &responder,
                &rng,
                &Persona::neutral(),
            )
            .await;
        assert!(matches!(err, Err(CoreError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_turn_budget_forces_stage_advance() {
        let (evaluator, responder, tuning) = deps();
        let mut session = practice_session(&tuning);
        session.open(&responder);

        // High draws so nothing hangs up
        let rng = ScriptedRng::new(vec![]);
        let first = session
            .advance(
                &UserInput::spoke(WEAK_OPENER),
                &evaluator,
                &responder,
                &rng,
                &Persona::neutral(),
            )
            .await
            .unwrap();
        assert!(!first.stage_advanced);
        assert_eq!(first.stage, CallStage::PhonePickup);

        let second = session
            .advance(
                &UserInput::spoke(WEAK_OPENER),
                &evaluator,
                &responder,
                &rng,
                &Persona::neutral(),
            )
            .await
            .unwrap();
        assert!(second.stage_advanced);
        assert_eq!(second.stage, CallStage::OpenerEvaluation);
    }

    #[tokio::test]
    async fn test_silence_impatience_skips_evaluation() {
        let (evaluator, responder, tuning) = deps();
        let mut session = practice_session(&tuning);
        session.open(&responder);

        let rng = ScriptedRng::new(vec![]);
        let out = session
            .advance(
                &UserInput::silence(SilenceKind::Impatience),
                &evaluator,
                &responder,
                &rng,
                &Persona::neutral(),
            )
            .await
            .unwrap();

        assert!(out.evaluation.is_none());
        assert!(!out.hang_up);
        assert_eq!(out.stage, CallStage::PhonePickup);
        assert!(CannedLines::builtin().impatience_pool().contains(&out.reply));
    }

    #[tokio::test]
    async fn test_silence_hangup_ends_call() {
        let (evaluator, responder, tuning) = deps();
        let mut session = practice_session(&tuning);
        session.open(&responder);

        let rng = ScriptedRng::new(vec![]);
        let out = session
            .advance(
                &UserInput::silence(SilenceKind::Hangup),
                &evaluator,
                &responder,
                &rng,
                &Persona::neutral(),
            )
            .await
            .unwrap();

        assert!(out.hang_up);
        assert!(out.call_over);
        assert!(out.evaluation.is_none());
        assert!(session.summary().hang_up);
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected() {
        let (evaluator, responder, tuning) = deps();
        let mut session = practice_session(&tuning);
        session.open(&responder);

        let rng = ScriptedRng::new(vec![]);
        let err = session
            .advance(
                &UserInput::spoke("   "),
                &evaluator,
                &responder,
                &rng,
                &Persona::neutral(),
            )
            .await;
        assert!(matches!(err, Err(CoreError::Validation(_))));
        assert_eq!(session.turns(), 0);
    }

    async fn speak(
        session: &mut CallSession,
        text: &str,
        evaluator: &RubricEvaluator,
        responder: &DialogueResponder,
        rng: &dyn RngSource,
    ) -> AdvanceOutcome {
        session
            .advance(
                &UserInput::spoke(text),
                evaluator,
                responder,
                rng,
                &Persona::neutral(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_strong_call_reaches_extended_and_ends() {
        let (evaluator, responder, tuning) = deps();
        let mut session = practice_session(&tuning);
        session.open(&responder);
        let rng = ScriptedRng::new(vec![]);

        let objection_reply = "That's fair, I get that completely. Out of curiosity, \
             how do you handle it today?";
        let pitch = "Fair enough. We help companies like yours save hours every week \
             without extra headcount, and our clients usually see results in a month. \
             Worth a quick look?";
        let discovery = "How does your team currently handle outreach right now?";
        let extended = "You mentioned the process is clunky, so what would better \
             look like for your team?";

        let out = speak(&mut session, STRONG_OPENER, &evaluator, &responder, &rng).await;
        assert_eq!(out.stage, CallStage::EarlyObjection);
        let out = speak(&mut session, objection_reply, &evaluator, &responder, &rng).await;
        assert_eq!(out.stage, CallStage::ObjectionHandling);
        let out = speak(&mut session, objection_reply, &evaluator, &responder, &rng).await;
        assert_eq!(out.stage, CallStage::MiniPitch);
        let out = speak(&mut session, pitch, &evaluator, &responder, &rng).await;
        assert_eq!(out.stage, CallStage::SoftDiscovery);
        let out = speak(&mut session, discovery, &evaluator, &responder, &rng).await;
        assert_eq!(out.stage, CallStage::ExtendedConversation);
        let out = speak(&mut session, extended, &evaluator, &responder, &rng).await;
        assert_eq!(out.stage, CallStage::CallEnded);
        assert!(out.call_over);
        assert!(!out.hang_up);

        let summary = session.summary();
        assert!(summary.discovery_passed);
        assert!(summary.succeeded());
        assert_eq!(summary.furthest_stage, CallStage::ExtendedConversation);
        assert!(summary.avg_score >= 75);
    }

    #[tokio::test]
    async fn test_mediocre_call_skips_extended_stage() {
        let (evaluator, responder, tuning) = deps();
        let mut session = practice_session(&tuning);
        session.open(&responder);
        let rng = ScriptedRng::new(vec![]);

        // Each utterance passes its threshold but not cleanly, keeping the
        // average under the extended gate.
        let opener = "The reason I'm calling is that I'm hoping to chat briefly. Can I?";
        let objection = "I get that, but you're wrong about one thing. What do you use today?";
        let pitch = "We help teams save hours every single week. Fair to take a minute?";
        let discovery = "Do you currently handle this in-house?";

        speak(&mut session, opener, &evaluator, &responder, &rng).await;
        speak(&mut session, objection, &evaluator, &responder, &rng).await;
        speak(&mut session, objection, &evaluator, &responder, &rng).await;
        speak(&mut session, pitch, &evaluator, &responder, &rng).await;
        let out = speak(&mut session, discovery, &evaluator, &responder, &rng).await;

        assert_eq!(out.stage, CallStage::CallEnded);
        let summary = session.summary();
        assert!(summary.avg_score < Tuning::default().practice_extended_quality);
        assert!(summary.discovery_passed);
        assert_eq!(summary.furthest_stage, CallStage::SoftDiscovery);
    }

    #[tokio::test]
    async fn test_power_hour_min_score_blocks_marginal_pass() {
        let (evaluator, responder, tuning) = deps();
        // Final call: requires a 77, a 3-of-4 opener scores 75
        let mut session =
            CallSession::new(SessionPolicy::power_hour(&tuning, 9), tuning.clone());
        session.open(&responder);
        let rng = ScriptedRng::new(vec![]);

        let opener = "The reason I'm calling is that I'm hoping to chat briefly. Can I?";
        let out = speak(&mut session, opener, &evaluator, &responder, &rng).await;

        let eval = out.evaluation.unwrap();
        assert!(eval.passed, "raw rubric pass");
        assert_eq!(eval.score, 75);
        assert!(!out.stage_advanced, "score below the difficulty bar");
        assert_eq!(out.stage, CallStage::PhonePickup);
    }

    #[tokio::test]
    async fn test_marathon_random_hangup_waits_for_second_turn() {
        let (evaluator, responder, tuning) = deps();
        let mut session =
            CallSession::new(SessionPolicy::marathon(&tuning), tuning.clone());
        session.open(&responder);

        // Turn 1 passes the opener and arms the one-shot draw; even a zero
        // draw waiting in the script cannot end the first turn.
        let rng = ScriptedRng::new(vec![0.99, 0.99, 0.0]);
        let first = speak(&mut session, STRONG_OPENER, &evaluator, &responder, &rng).await;
        assert!(first.evaluation.unwrap().passed);
        assert!(!first.hang_up);
        assert!(!first.call_over);
        assert_eq!(session.turns(), 1);

        // Turn 2: performance check misses (0.99), the armed one-shot
        // random hang-up hits (0.0).
        let objection_reply = "That's fair, I get that completely. Out of curiosity, \
             how do you handle it today?";
        let second = speak(&mut session, objection_reply, &evaluator, &responder, &rng).await;
        assert!(second.hang_up);
        assert!(second.call_over);
        assert_eq!(session.turns(), 2);
        // A random hang-up is polite, not a reaction to performance
        assert!(CannedLines::builtin().farewell(false).contains(&second.reply));
    }

    #[tokio::test]
    async fn test_marathon_never_hangs_up_on_first_turn() {
        let (evaluator, responder, tuning) = deps();
        let mut session =
            CallSession::new(SessionPolicy::marathon(&tuning), tuning.clone());
        session.open(&responder);

        // Worst case: the random draw would hit immediately if consulted
        let rng = ScriptedRng::new(vec![0.99, 0.0]);
        let out = speak(&mut session, STRONG_OPENER, &evaluator, &responder, &rng).await;

        assert!(!out.hang_up);
        assert!(!out.call_over);
        assert_eq!(session.turns(), 1);
    }

    #[tokio::test]
    async fn test_bad_opener_hangup_frequency_matches_table() {
        let (evaluator, responder, tuning) = deps();
        let rng = calltrainer_core::SeededRng::seed_from_u64(4242);

        let trials = 200;
        let mut hangups = 0;
        let mut expected = 0.0;
        for _ in 0..trials {
            let mut session = practice_session(&tuning);
            session.open(&responder);
            let first = speak(&mut session, WEAK_OPENER, &evaluator, &responder, &rng).await;
            assert!(!first.hang_up, "no hang-up on the first turn");
            let met = first.evaluation.unwrap().criteria_met_count();
            // Full decay on turn 2, neutral persona: the step table applies
            // unmodified
            expected = tuning.opener_hangup_lenient.probability_for(met);
            let second = speak(&mut session, WEAK_OPENER, &evaluator, &responder, &rng).await;
            if second.hang_up {
                hangups += 1;
            }
        }
        let freq = hangups as f64 / trials as f64;
        assert!(
            (freq - expected).abs() < 0.10,
            "observed {} expected {}",
            freq,
            expected
        );
    }
}
