//! NLU evaluation oracle seam

use async_trait::async_trait;

use crate::error::OracleError;
use crate::rubric::{RubricLabel, RubricResult};
use crate::transcript::TranscriptEntry;

/// External rubric evaluation oracle
///
/// The caller treats this as a replaceable judge; on any error the
/// deterministic keyword fallback is used instead. Implementations must
/// uphold `passed ⟺ criteria_met.len() >= threshold` in their results
/// (the `RubricResult::from_criteria` constructor guarantees it).
#[async_trait]
pub trait UtteranceEvaluator: Send + Sync {
    /// Score one user utterance against the named rubric
    async fn evaluate(
        &self,
        label: RubricLabel,
        utterance: &str,
        history: &[TranscriptEntry],
    ) -> Result<RubricResult, OracleError>;

    /// Backend identifier for logging
    fn name(&self) -> &str;
}
