//! Core types and trait seams for the cold-call trainer
//!
//! This crate provides the foundational vocabulary shared by every other
//! crate in the workspace:
//! - Error taxonomy
//! - Call transcript types
//! - User input variants (speech vs. silence)
//! - Rubric evaluation results
//! - Module/mode identifiers
//! - Injected randomness seam
//! - Oracle traits for pluggable text generation and evaluation backends

pub mod error;
pub mod input;
pub mod module;
pub mod rng;
pub mod rubric;
pub mod traits;
pub mod transcript;

pub use error::{CoreError, OracleError, Result};
pub use input::{SilenceKind, UserInput};
pub use module::{ModeKind, ModuleId};
pub use rng::{RngSource, ScriptedRng, SeededRng, SystemRng};
pub use rubric::{EvalSource, RubricLabel, RubricResult};
pub use transcript::{Speaker, Transcript, TranscriptEntry};

pub use traits::{
    ChatMessage, ChatRole, GenerationRequest, TextGenerator, UtteranceEvaluator,
};
