//! Roleplay call engine
//!
//! One simulated cold call: the stage state machine, rubric evaluation
//! (oracle with deterministic fallback), the prospect dialogue responder
//! (oracle with canned fallback), the hang-up model and the per-call
//! session driving it all.

pub mod hangup;
pub mod persona;
pub mod responder;
pub mod rubric;
pub mod session;
pub mod stage;

pub use hangup::{hangup_probability, HangupStrictness};
pub use persona::{Persona, PersonaArchetype};
pub use responder::DialogueResponder;
pub use rubric::{FallbackEvaluator, RubricEvaluator};
pub use session::{AdvanceOutcome, CallSession, CallSummary, SessionPolicy};
pub use stage::{CallStage, StageFlow};
