//! Rubric evaluation with deterministic fallback
//!
//! `RubricEvaluator` is the single entry point the session uses. It tries
//! the NLU oracle under a timeout and, on any failure, silently falls
//! through to `FallbackEvaluator`, which interprets the rubric's
//! `CriterionCheck`s with keyword and shape heuristics. The caller only
//! sees a `RubricResult`; the `source` field records which path produced
//! it.

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use calltrainer_config::{CriterionCheck, RubricSet, Tuning};
use calltrainer_core::{
    EvalSource, RubricLabel, RubricResult, TranscriptEntry, UtteranceEvaluator,
};

static OPEN_QUESTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(how|what|why|when|where|who|tell me|walk me)\b")
        .expect("open question regex must compile")
});

/// Deterministic keyword/shape evaluator
pub struct FallbackEvaluator {
    rubrics: Arc<RubricSet>,
    tuning: Arc<Tuning>,
}

impl FallbackEvaluator {
    pub fn new(rubrics: Arc<RubricSet>, tuning: Arc<Tuning>) -> Self {
        Self { rubrics, tuning }
    }

    /// Score an utterance. Infallible: heuristics always produce a verdict.
    pub fn evaluate(&self, label: RubricLabel, utterance: &str) -> RubricResult {
        let rubric = self.rubrics.rubric(label);
        let lower = utterance.to_lowercase();
        let trimmed = lower.trim_end();
        let words = lower.unicode_words().count();

        let mut criteria_met = Vec::new();
        for criterion in &rubric.criteria {
            if self.check(&criterion.check, &lower, trimmed, words) {
                criteria_met.push(criterion.id.clone());
            }
        }

        let met = criteria_met.len();
        let passed = met >= rubric.threshold;
        tracing::debug!(rubric = %label, criteria_met = met, passed, "fallback evaluation");

        RubricResult::from_criteria(
            label,
            criteria_met,
            rubric.criteria.len(),
            rubric.threshold,
            self.hint_for(label, met, passed),
            EvalSource::Fallback,
        )
    }

    fn check(&self, check: &CriterionCheck, lower: &str, trimmed: &str, words: usize) -> bool {
        match check {
            CriterionCheck::Contractions => self
                .rubrics
                .contractions
                .iter()
                .any(|c| lower.contains(c.as_str())),
            CriterionCheck::PhraseAny { phrases } => {
                phrases.iter().any(|p| lower.contains(p.as_str()))
            }
            CriterionCheck::PhraseAbsent { phrases } => {
                !phrases.iter().any(|p| lower.contains(p.as_str()))
            }
            CriterionCheck::EndsWithQuestion => trimmed.ends_with('?'),
            CriterionCheck::OpenQuestion => {
                lower.contains('?') && OPEN_QUESTION.is_match(lower)
            }
            CriterionCheck::MinWords { count } => words >= *count,
            CriterionCheck::MaxWords { count } => words <= *count,
        }
    }

    fn hint_for(&self, label: RubricLabel, met: usize, passed: bool) -> f64 {
        if label == RubricLabel::Opener {
            self.tuning.opener_hangup_lenient.probability_for(met)
        } else if passed {
            self.tuning.rubric_base_hangup
        } else {
            self.tuning.rubric_base_hangup * self.tuning.rubric_fail_multiplier
        }
    }
}

/// Oracle-first evaluator with transparent fallback
pub struct RubricEvaluator {
    oracle: Option<Arc<dyn UtteranceEvaluator>>,
    fallback: FallbackEvaluator,
    timeout: Duration,
}

impl RubricEvaluator {
    pub fn new(
        oracle: Option<Arc<dyn UtteranceEvaluator>>,
        rubrics: Arc<RubricSet>,
        tuning: Arc<Tuning>,
        timeout: Duration,
    ) -> Self {
        Self {
            oracle,
            fallback: FallbackEvaluator::new(rubrics, tuning),
            timeout,
        }
    }

    /// Fallback-only evaluator (oracle disabled)
    pub fn fallback_only(rubrics: Arc<RubricSet>, tuning: Arc<Tuning>) -> Self {
        Self::new(None, rubrics, tuning, Duration::from_secs(3))
    }

    /// Evaluate one utterance. Never fails: the fallback path always
    /// produces a verdict when the oracle cannot.
    pub async fn evaluate(
        &self,
        label: RubricLabel,
        utterance: &str,
        history: &[TranscriptEntry],
    ) -> RubricResult {
        if let Some(oracle) = &self.oracle {
            match tokio::time::timeout(self.timeout, oracle.evaluate(label, utterance, history))
                .await
            {
                Ok(Ok(result)) => return result,
                Ok(Err(e)) => {
                    tracing::warn!(rubric = %label, error = %e, "oracle evaluation failed, using fallback");
                }
                Err(_) => {
                    tracing::warn!(rubric = %label, "oracle evaluation timed out, using fallback");
                }
            }
        }
        self.fallback.evaluate(label, utterance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use calltrainer_core::OracleError;

    fn fallback() -> FallbackEvaluator {
        FallbackEvaluator::new(Arc::new(RubricSet::builtin()), Arc::new(Tuning::default()))
    }

    #[test]
    fn test_strong_opener_passes() {
        let r = fallback().evaluate(
            RubricLabel::Opener,
            "Hey Sam, I know this is out of the blue. The reason I'm calling is \
             we work with ops teams around here. Can I take thirty seconds to say why?",
        );
        assert!(r.passed, "met: {:?}", r.criteria_met);
        assert_eq!(r.criteria_met_count(), 4);
        assert_eq!(r.source, EvalSource::Fallback);
    }

    #[test]
    fn test_robotic_opener_fails() {
        let r = fallback().evaluate(
            RubricLabel::Opener,
            "Hello. I am calling to offer you an exciting business opportunity.",
        );
        assert!(!r.passed, "met: {:?}", r.criteria_met);
    }

    #[test]
    fn test_objection_acknowledge_and_redirect() {
        let r = fallback().evaluate(
            RubricLabel::Objection,
            "That's fair, most people say that. Out of curiosity, what are you using today?",
        );
        assert!(r.passed);
        assert!(r.criteria_met.contains(&"acknowledge".to_string()));
        assert!(r.criteria_met.contains(&"redirect".to_string()));
    }

    #[test]
    fn test_arguing_fails_no_arguing() {
        let r = fallback().evaluate(
            RubricLabel::Objection,
            "No, you're wrong, you need to listen to me",
        );
        assert!(!r.criteria_met.contains(&"no_arguing".to_string()));
    }

    #[test]
    fn test_pitch_word_cap() {
        let long = "value ".repeat(70) + "right?";
        let r = fallback().evaluate(RubricLabel::MiniPitch, &long);
        assert!(!r.criteria_met.contains(&"concise".to_string()));
    }

    #[test]
    fn test_open_question_needs_interrogative_and_mark() {
        let f = fallback();
        let open = f.evaluate(
            RubricLabel::Discovery,
            "How does your team handle outreach right now?",
        );
        assert!(open.criteria_met.contains(&"open_question".to_string()));

        let closed = f.evaluate(RubricLabel::Discovery, "Do you currently like your vendor?");
        assert!(!closed.criteria_met.contains(&"open_question".to_string()));

        let no_mark = f.evaluate(RubricLabel::Discovery, "Tell me about your process today.");
        assert!(!no_mark.criteria_met.contains(&"open_question".to_string()));
    }

    #[test]
    fn test_hint_uses_lenient_opener_table() {
        let r = fallback().evaluate(RubricLabel::Opener, "Buy my product now");
        assert!((r.hangup_hint - 0.40).abs() < 1e-9);
    }

    struct FailingOracle;

    #[async_trait]
    impl UtteranceEvaluator for FailingOracle {
        async fn evaluate(
            &self,
            _label: RubricLabel,
            _utterance: &str,
            _history: &[TranscriptEntry],
        ) -> Result<RubricResult, OracleError> {
            Err(OracleError::Network("connection refused".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct SlowOracle;

    #[async_trait]
    impl UtteranceEvaluator for SlowOracle {
        async fn evaluate(
            &self,
            _label: RubricLabel,
            _utterance: &str,
            _history: &[TranscriptEntry],
        ) -> Result<RubricResult, OracleError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            unreachable!("timeout fires first")
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_oracle_failure_falls_back() {
        let eval = RubricEvaluator::new(
            Some(Arc::new(FailingOracle)),
            Arc::new(RubricSet::builtin()),
            Arc::new(Tuning::default()),
            Duration::from_secs(1),
        );
        let r = eval
            .evaluate(RubricLabel::Objection, "fair enough, but what do you use?", &[])
            .await;
        assert_eq!(r.source, EvalSource::Fallback);
        assert!(r.passed);
    }

    #[tokio::test]
    async fn test_oracle_timeout_falls_back() {
        let eval = RubricEvaluator::new(
            Some(Arc::new(SlowOracle)),
            Arc::new(RubricSet::builtin()),
            Arc::new(Tuning::default()),
            Duration::from_millis(100),
        );
        let r = eval.evaluate(RubricLabel::Opener, "hello there", &[]).await;
        assert_eq!(r.source, EvalSource::Fallback);
    }
}
