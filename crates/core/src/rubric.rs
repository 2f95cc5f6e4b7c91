//! Rubric evaluation result types

use serde::{Deserialize, Serialize};

/// Named rubric applied to a user utterance
///
/// Several call stages can share one rubric (e.g. both `phone_pickup` and
/// `opener_evaluation` are scored against `Opener`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RubricLabel {
    /// Opening line: purpose, tone, empathy, soft question
    Opener,
    /// Objection response: acknowledge, don't argue, redirect
    Objection,
    /// Short value pitch
    MiniPitch,
    /// Discovery questioning
    Discovery,
    /// Free-form extended conversation quality
    Extended,
}

impl RubricLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RubricLabel::Opener => "opener",
            RubricLabel::Objection => "objection",
            RubricLabel::MiniPitch => "mini_pitch",
            RubricLabel::Discovery => "discovery",
            RubricLabel::Extended => "extended",
        }
    }
}

impl std::fmt::Display for RubricLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which path produced an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalSource {
    /// External NLU oracle
    Oracle,
    /// Deterministic keyword heuristics
    Fallback,
}

/// Structured result of scoring one utterance against a rubric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricResult {
    /// Rubric that was applied
    pub label: RubricLabel,
    /// 0-100 score derived from criteria coverage
    pub score: u32,
    /// Pass/fail verdict
    pub passed: bool,
    /// Ids of the criteria that were satisfied
    pub criteria_met: Vec<String>,
    /// Total number of criteria in the rubric
    pub criteria_total: usize,
    /// How many criteria must be met to pass
    pub threshold: usize,
    /// Stage-specific hang-up probability hint (0.0 - 1.0)
    pub hangup_hint: f64,
    /// Oracle or fallback
    pub source: EvalSource,
}

impl RubricResult {
    /// Build a result from satisfied criteria.
    ///
    /// The pass verdict is derived, never stored independently, so
    /// `passed ⟺ criteria_met.len() >= threshold` holds by construction.
    pub fn from_criteria(
        label: RubricLabel,
        criteria_met: Vec<String>,
        criteria_total: usize,
        threshold: usize,
        hangup_hint: f64,
        source: EvalSource,
    ) -> Self {
        let met = criteria_met.len();
        let score = if criteria_total == 0 {
            0
        } else {
            ((met as f64 / criteria_total as f64) * 100.0).round() as u32
        };
        Self {
            label,
            score,
            passed: met >= threshold,
            criteria_met,
            criteria_total,
            threshold,
            hangup_hint: hangup_hint.clamp(0.0, 1.0),
            source,
        }
    }

    /// Number of criteria satisfied
    pub fn criteria_met_count(&self) -> usize {
        self.criteria_met.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(met: usize, total: usize, threshold: usize) -> RubricResult {
        let names = (0..met).map(|i| format!("c{}", i)).collect();
        RubricResult::from_criteria(
            RubricLabel::Opener,
            names,
            total,
            threshold,
            0.1,
            EvalSource::Fallback,
        )
    }

    #[test]
    fn test_pass_iff_threshold_met() {
        for total in 1..=4usize {
            for threshold in 1..=total {
                for met in 0..=total {
                    let r = result(met, total, threshold);
                    assert_eq!(
                        r.passed,
                        met >= threshold,
                        "met={} total={} threshold={}",
                        met,
                        total,
                        threshold
                    );
                }
            }
        }
    }

    #[test]
    fn test_score_scaling() {
        assert_eq!(result(3, 4, 3).score, 75);
        assert_eq!(result(4, 4, 3).score, 100);
        assert_eq!(result(0, 4, 3).score, 0);
        assert_eq!(result(2, 3, 2).score, 67);
    }

    #[test]
    fn test_hint_clamped() {
        let r = RubricResult::from_criteria(
            RubricLabel::Objection,
            vec![],
            3,
            2,
            1.7,
            EvalSource::Oracle,
        );
        assert_eq!(r.hangup_hint, 1.0);
    }
}
