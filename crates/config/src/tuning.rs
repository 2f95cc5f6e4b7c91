//! Product tuning constants
//!
//! Every threshold and probability that shapes gameplay lives here as a
//! named, serde-overridable field. The "correct" values are product
//! decisions, not derivable invariants, so none of them is hardcoded at a
//! call site.

use serde::{Deserialize, Serialize};

/// Score-to-probability step table for opener hang-ups
///
/// `poor` applies at 0-1 criteria met, `medium` at 2, `good` at 3-4.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HangupStepTable {
    pub poor: f64,
    pub medium: f64,
    pub good: f64,
}

impl HangupStepTable {
    /// Look up the probability band for a criteria-met count
    pub fn probability_for(&self, criteria_met: usize) -> f64 {
        match criteria_met {
            0 | 1 => self.poor,
            2 => self.medium,
            _ => self.good,
        }
    }
}

fn default_opener_lenient() -> HangupStepTable {
    HangupStepTable {
        poor: 0.40,
        medium: 0.15,
        good: 0.05,
    }
}

fn default_opener_strict() -> HangupStepTable {
    HangupStepTable {
        poor: 0.60,
        medium: 0.30,
        good: 0.10,
    }
}

/// All tunable gameplay constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    // --- Call session ---
    /// Hard cap on user turns in one call
    #[serde(default = "default_max_call_turns")]
    pub max_call_turns: usize,
    /// Advance a stage after this many turns even without a pass
    #[serde(default = "default_stage_turn_budget")]
    pub stage_turn_budget: usize,

    // --- Hang-up model ---
    /// Opener step table for forgiving modes (Practice, Simulation)
    #[serde(default = "default_opener_lenient")]
    pub opener_hangup_lenient: HangupStepTable,
    /// Opener step table for endurance modes (Marathon, PowerHour)
    #[serde(default = "default_opener_strict")]
    pub opener_hangup_strict: HangupStepTable,
    /// Flat hang-up probability for non-opener rubrics when passed
    #[serde(default = "default_rubric_base_hangup")]
    pub rubric_base_hangup: f64,
    /// Multiplier applied to the base when a non-opener rubric is failed
    #[serde(default = "default_rubric_fail_multiplier")]
    pub rubric_fail_multiplier: f64,
    /// Hang-up probability scale on the second user turn
    #[serde(default = "default_hangup_decay_turn2")]
    pub hangup_decay_turn2: f64,
    /// Hang-up probability scale on the third user turn
    #[serde(default = "default_hangup_decay_turn3")]
    pub hangup_decay_turn3: f64,
    /// Hang-up probability floor scale from the fourth turn on
    #[serde(default = "default_hangup_decay_floor")]
    pub hangup_decay_floor: f64,

    // --- Practice ---
    /// Minimum user turns for a practice call to count as a success
    #[serde(default = "default_practice_min_turns")]
    pub practice_min_turns: usize,
    /// Average rubric score counted as "decent quality"
    #[serde(default = "default_practice_avg_quality")]
    pub practice_avg_quality: u32,
    /// "Most stages completed" bar for the alternative success path
    #[serde(default = "default_practice_min_stages")]
    pub practice_min_stages: usize,
    /// Average score needed at soft discovery to unlock the extended stage
    #[serde(default = "default_practice_extended_quality")]
    pub practice_extended_quality: u32,

    // --- Marathon ---
    #[serde(default = "default_marathon_total_calls")]
    pub marathon_total_calls: usize,
    #[serde(default = "default_marathon_calls_to_pass")]
    pub marathon_calls_to_pass: usize,
    /// Random hang-up chance applied once per call after a passed opener,
    /// independent of performance (simulates real-world variance)
    #[serde(default = "default_marathon_random_hangup")]
    pub marathon_random_hangup: f64,

    // --- Quiz ---
    #[serde(default = "default_quiz_question_count")]
    pub quiz_question_count: usize,
    /// Run-level pass bar on accuracy (product tuning value)
    #[serde(default = "default_quiz_pass_accuracy")]
    pub quiz_pass_accuracy: f64,
    /// Minimum word count for an answer to count as substantive
    #[serde(default = "default_quiz_min_answer_words")]
    pub quiz_min_answer_words: usize,
    /// Checks (of three: length, one keyword, two keywords) an answer must
    /// meet to be correct
    #[serde(default = "default_quiz_checks_to_pass")]
    pub quiz_checks_to_pass: usize,

    // --- Simulation ---
    /// Turn cap for the extended simulation call
    #[serde(default = "default_simulation_max_turns")]
    pub simulation_max_turns: usize,
    /// Distinct stages that must be completed for success
    #[serde(default = "default_simulation_min_stages")]
    pub simulation_min_stages: usize,
    /// Minimum accumulated trust for success
    #[serde(default = "default_simulation_min_trust")]
    pub simulation_min_trust: i32,
    /// Trust gained on a passed evaluation
    #[serde(default = "default_simulation_trust_gain")]
    pub simulation_trust_gain: i32,
    /// Trust lost on a failed evaluation
    #[serde(default = "default_simulation_trust_loss")]
    pub simulation_trust_loss: i32,

    // --- Power Hour ---
    #[serde(default = "default_power_hour_total_calls")]
    pub power_hour_total_calls: usize,
    /// Run-level success-rate bar
    #[serde(default = "default_power_hour_success_rate")]
    pub power_hour_success_rate: f64,
    /// Minimum consecutive-success streak required
    #[serde(default = "default_power_hour_min_streak")]
    pub power_hour_min_streak: usize,
    /// Minimum calls that must be completed (of the total)
    #[serde(default = "default_power_hour_min_completed")]
    pub power_hour_min_completed: usize,
    /// Starting energy level
    #[serde(default = "default_power_hour_energy_start")]
    pub power_hour_energy_start: f64,
    /// Energy lost on a failed call
    #[serde(default = "default_power_hour_energy_decay")]
    pub power_hour_energy_decay: f64,
    /// Energy regained on a successful call
    #[serde(default = "default_power_hour_energy_recovery")]
    pub power_hour_energy_recovery: f64,
    /// Extra rubric score required per difficulty step
    #[serde(default = "default_power_hour_difficulty_step")]
    pub power_hour_difficulty_step: u32,
}

fn default_max_call_turns() -> usize {
    25
}
fn default_stage_turn_budget() -> usize {
    2
}
fn default_rubric_base_hangup() -> f64 {
    0.05
}
fn default_rubric_fail_multiplier() -> f64 {
    2.0
}
fn default_hangup_decay_turn2() -> f64 {
    1.0
}
fn default_hangup_decay_turn3() -> f64 {
    0.7
}
fn default_hangup_decay_floor() -> f64 {
    0.5
}
fn default_practice_min_turns() -> usize {
    4
}
fn default_practice_avg_quality() -> u32 {
    60
}
fn default_practice_min_stages() -> usize {
    5
}
fn default_practice_extended_quality() -> u32 {
    75
}
fn default_marathon_total_calls() -> usize {
    10
}
fn default_marathon_calls_to_pass() -> usize {
    6
}
fn default_marathon_random_hangup() -> f64 {
    0.25
}
fn default_quiz_question_count() -> usize {
    25
}
fn default_quiz_pass_accuracy() -> f64 {
    0.60
}
fn default_quiz_min_answer_words() -> usize {
    6
}
fn default_quiz_checks_to_pass() -> usize {
    2
}
fn default_simulation_max_turns() -> usize {
    20
}
fn default_simulation_min_stages() -> usize {
    5
}
fn default_simulation_min_trust() -> i32 {
    50
}
fn default_simulation_trust_gain() -> i32 {
    15
}
fn default_simulation_trust_loss() -> i32 {
    5
}
fn default_power_hour_total_calls() -> usize {
    10
}
fn default_power_hour_success_rate() -> f64 {
    0.70
}
fn default_power_hour_min_streak() -> usize {
    3
}
fn default_power_hour_min_completed() -> usize {
    8
}
fn default_power_hour_energy_start() -> f64 {
    100.0
}
fn default_power_hour_energy_decay() -> f64 {
    15.0
}
fn default_power_hour_energy_recovery() -> f64 {
    5.0
}
fn default_power_hour_difficulty_step() -> u32 {
    3
}

impl Default for Tuning {
    fn default() -> Self {
        // Round-trip through serde so the fn-per-field defaults stay the
        // single source of truth.
        serde_json::from_str("{}").expect("empty tuning object must deserialize")
    }
}

impl Tuning {
    /// Turn-count decay factor for hang-up probability.
    ///
    /// Turn 1 never hangs up; the factor bottoms out at the floor from the
    /// fourth user turn onward so one bad turn late in a long call is not
    /// abruptly punished.
    pub fn hangup_decay(&self, turn_count: usize) -> f64 {
        match turn_count {
            0 | 1 => 0.0,
            2 => self.hangup_decay_turn2,
            3 => self.hangup_decay_turn3,
            _ => self.hangup_decay_floor,
        }
    }
}
