//! LLM-backed rubric evaluator
//!
//! Sends the stage rubric and utterance to the text oracle and parses the
//! JSON verdict into a `RubricResult`. Unknown criterion ids in the reply
//! are discarded so a hallucinated id can never inflate a score.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use calltrainer_config::{RubricSet, Tuning};
use calltrainer_core::{
    EvalSource, OracleError, RubricLabel, RubricResult, TextGenerator, TranscriptEntry,
    UtteranceEvaluator,
};

use crate::prompt::evaluation_request;

/// Evaluator that delegates to the text generation oracle
pub struct OracleEvaluator {
    generator: Arc<dyn TextGenerator>,
    rubrics: Arc<RubricSet>,
    tuning: Arc<Tuning>,
}

#[derive(Debug, Deserialize)]
struct Verdict {
    #[serde(default)]
    criteria_met: Vec<String>,
}

impl OracleEvaluator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        rubrics: Arc<RubricSet>,
        tuning: Arc<Tuning>,
    ) -> Self {
        Self {
            generator,
            rubrics,
            tuning,
        }
    }

    /// Extract the JSON object from a possibly fenced/prefixed reply
    fn extract_json(raw: &str) -> Result<Verdict, OracleError> {
        let start = raw.find('{');
        let end = raw.rfind('}');
        let (start, end) = match (start, end) {
            (Some(s), Some(e)) if e > s => (s, e),
            _ => {
                return Err(OracleError::InvalidResponse(format!(
                    "no JSON object in oracle reply: {:.80}",
                    raw
                )))
            }
        };
        serde_json::from_str(&raw[start..=end])
            .map_err(|e| OracleError::InvalidResponse(e.to_string()))
    }

    /// Informational hang-up hint; the session recomputes the effective
    /// probability with mode strictness and turn decay applied.
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

#[async_trait]
impl UtteranceEvaluator for OracleEvaluator {
    async fn evaluate(
        &self,
        label: RubricLabel,
        utterance: &str,
        history: &[TranscriptEntry],
    ) -> Result<RubricResult, OracleError> {
        let rubric = self.rubrics.rubric(label);
        let request = evaluation_request(rubric, utterance, history);

        let raw = self.generator.generate(&request).await?;
        let verdict = Self::extract_json(&raw)?;

        // Keep only ids the rubric actually defines, deduplicated.
        let mut criteria_met: Vec<String> = Vec::new();
        for criterion in &rubric.criteria {
            if verdict.criteria_met.iter().any(|id| id == &criterion.id) {
                criteria_met.push(criterion.id.clone());
            }
        }

        let met = criteria_met.len();
        let passed = met >= rubric.threshold;
        tracing::debug!(
            rubric = %label,
            criteria_met = met,
            passed,
            "oracle evaluation"
        );

        Ok(RubricResult::from_criteria(
            label,
            criteria_met,
            rubric.criteria.len(),
            rubric.threshold,
            self.hint_for(label, met, passed),
            EvalSource::Oracle,
        ))
    }

    fn name(&self) -> &str {
        self.generator.name()
    }
}
