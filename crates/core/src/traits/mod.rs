//! Trait seams for pluggable external services

mod evaluation;
mod generation;

pub use evaluation::UtteranceEvaluator;
pub use generation::{ChatMessage, ChatRole, GenerationRequest, TextGenerator};
