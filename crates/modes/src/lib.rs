//! Training mode controllers
//!
//! One controller per mode, dispatched through a closed enum. Controllers
//! own their call sessions (or quiz state) and produce a `RunOutcome` when
//! the run finishes, by its own rules or by a forced end.

pub mod controller;
pub mod marathon;
pub mod power_hour;
pub mod practice;
pub mod quiz;
pub mod run;
pub mod simulation;

pub use controller::ModeController;
pub use run::{ModeDeps, ProcessReply, RunOutcome};
