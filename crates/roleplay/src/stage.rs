//! Call stages and per-mode stage flows
//!
//! A call moves through a fixed sequence of stages. Two stages can share
//! one rubric: both pickup and opener evaluation are scored as `Opener`,
//! and both objection stages as `Objection`. The enum order is the call
//! order, which makes "reached at least soft discovery" an ordinary
//! comparison.

use serde::{Deserialize, Serialize};

use calltrainer_core::RubricLabel;

/// Stage of a simulated cold call
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStage {
    /// Prospect just answered; the opening line is coming
    PhonePickup,
    /// Retry of a weak opener
    OpenerEvaluation,
    /// First brush-off from the prospect
    EarlyObjection,
    /// A second, firmer objection
    ObjectionHandling,
    /// Short value pitch
    MiniPitch,
    /// Discovery questioning
    SoftDiscovery,
    /// Open-ended continuation for strong calls
    ExtendedConversation,
    /// Terminal
    CallEnded,
}

impl CallStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStage::PhonePickup => "phone_pickup",
            CallStage::OpenerEvaluation => "opener_evaluation",
            CallStage::EarlyObjection => "early_objection",
            CallStage::ObjectionHandling => "objection_handling",
            CallStage::MiniPitch => "mini_pitch",
            CallStage::SoftDiscovery => "soft_discovery",
            CallStage::ExtendedConversation => "extended_conversation",
            CallStage::CallEnded => "call_ended",
        }
    }

    /// Rubric applied to user utterances spoken in this stage
    pub fn rubric(&self) -> Option<RubricLabel> {
        match self {
            CallStage::PhonePickup | CallStage::OpenerEvaluation => Some(RubricLabel::Opener),
            CallStage::EarlyObjection | CallStage::ObjectionHandling => {
                Some(RubricLabel::Objection)
            }
            CallStage::MiniPitch => Some(RubricLabel::MiniPitch),
            CallStage::SoftDiscovery => Some(RubricLabel::Discovery),
            CallStage::ExtendedConversation => Some(RubricLabel::Extended),
            CallStage::CallEnded => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CallStage::CallEnded)
    }

    /// True while the prospect is raising objections at the caller
    pub fn is_objection(&self) -> bool {
        matches!(self, CallStage::EarlyObjection | CallStage::ObjectionHandling)
    }
}

impl std::fmt::Display for CallStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered stage sequence for one call
#[derive(Debug, Clone)]
pub struct StageFlow {
    sequence: Vec<CallStage>,
}

impl StageFlow {
    /// Full flow including the extended conversation stage. Used by
    /// Practice (gated on quality at discovery) and Simulation (always).
    pub fn standard() -> Self {
        Self {
            sequence: vec![
                CallStage::PhonePickup,
                CallStage::OpenerEvaluation,
                CallStage::EarlyObjection,
                CallStage::ObjectionHandling,
                CallStage::MiniPitch,
                CallStage::SoftDiscovery,
                CallStage::ExtendedConversation,
                CallStage::CallEnded,
            ],
        }
    }

    /// Endurance flow that ends after soft discovery. Used by Marathon and
    /// PowerHour, where volume matters more than depth.
    pub fn short() -> Self {
        Self {
            sequence: vec![
                CallStage::PhonePickup,
                CallStage::OpenerEvaluation,
                CallStage::EarlyObjection,
                CallStage::ObjectionHandling,
                CallStage::MiniPitch,
                CallStage::SoftDiscovery,
                CallStage::CallEnded,
            ],
        }
    }

    /// Stage after `stage` in this flow
    pub fn next(&self, stage: CallStage) -> Option<CallStage> {
        let pos = self.sequence.iter().position(|s| *s == stage)?;
        self.sequence.get(pos + 1).copied()
    }

    pub fn first(&self) -> CallStage {
        self.sequence[0]
    }

    /// Number of scoreable (non-terminal) stages
    pub fn scoreable_stages(&self) -> usize {
        self.sequence.iter().filter(|s| !s.is_terminal()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order_matches_call_order() {
        assert!(CallStage::PhonePickup < CallStage::SoftDiscovery);
        assert!(CallStage::SoftDiscovery < CallStage::ExtendedConversation);
        assert!(CallStage::ExtendedConversation < CallStage::CallEnded);
    }

    #[test]
    fn test_rubric_mapping() {
        assert_eq!(CallStage::PhonePickup.rubric(), Some(RubricLabel::Opener));
        assert_eq!(
            CallStage::OpenerEvaluation.rubric(),
            Some(RubricLabel::Opener)
        );
        assert_eq!(
            CallStage::EarlyObjection.rubric(),
            Some(RubricLabel::Objection)
        );
        assert_eq!(
            CallStage::ObjectionHandling.rubric(),
            Some(RubricLabel::Objection)
        );
        assert_eq!(CallStage::MiniPitch.rubric(), Some(RubricLabel::MiniPitch));
        assert_eq!(
            CallStage::SoftDiscovery.rubric(),
            Some(RubricLabel::Discovery)
        );
        assert_eq!(CallStage::CallEnded.rubric(), None);
    }

    #[test]
    fn test_standard_flow_walk() {
        let flow = StageFlow::standard();
        let mut stage = flow.first();
        let mut visited = vec![stage];
        while let Some(next) = flow.next(stage) {
            stage = next;
            visited.push(stage);
        }
        assert_eq!(*visited.last().unwrap(), CallStage::CallEnded);
        assert!(visited.contains(&CallStage::ExtendedConversation));
    }

    #[test]
    fn test_short_flow_skips_extended() {
        let flow = StageFlow::short();
        assert_eq!(
            flow.next(CallStage::SoftDiscovery),
            Some(CallStage::CallEnded)
        );
    }
}
