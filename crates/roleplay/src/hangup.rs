//! Hang-up probability model
//!
//! The opener is the make-or-break moment: its probability comes from a
//! score-banded step table, strict or lenient depending on the mode. Later
//! stages use a small flat base that doubles on a failed evaluation. The
//! whole thing is scaled by a turn-count decay (never on the first turn)
//! and by the persona's hang-up sensitivity.

use serde::{Deserialize, Serialize};

use calltrainer_config::Tuning;
use calltrainer_core::RubricLabel;

/// How unforgiving the hang-up model is for this mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HangupStrictness {
    /// Practice and Simulation
    Lenient,
    /// Marathon and PowerHour
    Strict,
}

/// Effective hang-up probability for one evaluated turn
pub fn hangup_probability(
    tuning: &Tuning,
    strictness: HangupStrictness,
    label: RubricLabel,
    criteria_met: usize,
    passed: bool,
    turn_count: usize,
    persona_sensitivity: f64,
) -> f64 {
    let base = if label == RubricLabel::Opener {
        let table = match strictness {
            HangupStrictness::Lenient => &tuning.opener_hangup_lenient,
            HangupStrictness::Strict => &tuning.opener_hangup_strict,
        };
        table.probability_for(criteria_met)
    } else if passed {
        tuning.rubric_base_hangup
    } else {
        tuning.rubric_base_hangup * tuning.rubric_fail_multiplier
    };

    (base * tuning.hangup_decay(turn_count) * persona_sensitivity).clamp(0.0, 1.0)
}
