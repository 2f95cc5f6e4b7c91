//! Mode controller dispatch
//!
//! Closed enum over the five controllers. Orchestration matches on
//! `ModeKind` exactly once, here; everything downstream is typed.

use calltrainer_core::{CoreError, ModeKind, UserInput};

use crate::marathon::MarathonController;
use crate::power_hour::PowerHourController;
use crate::practice::PracticeController;
use crate::quiz::QuizController;
use crate::run::{ModeDeps, ProcessReply, RunOutcome};
use crate::simulation::SimulationController;

/// One live mode run
pub enum ModeController {
    Practice(PracticeController),
    Marathon(MarathonController),
    Quiz(QuizController),
    Simulation(SimulationController),
    PowerHour(PowerHourController),
}

impl ModeController {
    /// Create a run of the given kind; returns the controller and its
    /// opening text (a greeting, or the quiz intro).
    pub fn create(kind: ModeKind, deps: ModeDeps) -> (Self, String) {
        match kind {
            ModeKind::Practice => {
                let (c, opening) = PracticeController::new(deps);
                (Self::Practice(c), opening)
            }
            ModeKind::Marathon => {
                let (c, opening) = MarathonController::new(deps);
                (Self::Marathon(c), opening)
            }
            ModeKind::Quiz => {
                let (c, opening) = QuizController::new(deps);
                (Self::Quiz(c), opening)
            }
            ModeKind::Simulation => {
                let (c, opening) = SimulationController::new(deps);
                (Self::Simulation(c), opening)
            }
            ModeKind::PowerHour => {
                let (c, opening) = PowerHourController::new(deps);
                (Self::PowerHour(c), opening)
            }
        }
    }

    pub fn kind(&self) -> ModeKind {
        match self {
            Self::Practice(_) => ModeKind::Practice,
            Self::Marathon(_) => ModeKind::Marathon,
            Self::Quiz(_) => ModeKind::Quiz,
            Self::Simulation(_) => ModeKind::Simulation,
            Self::PowerHour(_) => ModeKind::PowerHour,
        }
    }

    pub async fn process_input(&mut self, input: &UserInput) -> Result<ProcessReply, CoreError> {
        match self {
            Self::Practice(c) => c.process_input(input).await,
            Self::Marathon(c) => c.process_input(input).await,
            Self::Quiz(c) => c.process_input(input).await,
            Self::Simulation(c) => c.process_input(input).await,
            Self::PowerHour(c) => c.process_input(input).await,
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            Self::Practice(c) => c.is_complete(),
            Self::Marathon(c) => c.is_complete(),
            Self::Quiz(c) => c.is_complete(),
            Self::Simulation(c) => c.is_complete(),
            Self::PowerHour(c) => c.is_complete(),
        }
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        match self {
            Self::Practice(c) => c.outcome(),
            Self::Marathon(c) => c.outcome(),
            Self::Quiz(c) => c.outcome(),
            Self::Simulation(c) => c.outcome(),
            Self::PowerHour(c) => c.outcome(),
        }
    }

    /// Force-finish the run and return its outcome
    pub fn end(&mut self) -> RunOutcome {
        match self {
            Self::Practice(c) => c.end(),
            Self::Marathon(c) => c.end(),
            Self::Quiz(c) => c.end(),
            Self::Simulation(c) => c.end(),
            Self::PowerHour(c) => c.end(),
        }
    }
}
