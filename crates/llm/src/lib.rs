//! External oracle clients
//!
//! Implements the `TextGenerator` and `UtteranceEvaluator` seams from
//! `calltrainer-core` against an Ollama-style chat endpoint. Each request
//! is attempted exactly once; the roleplay layer owns timeouts and
//! fallback behavior, so no retry logic lives here.

pub mod backend;
pub mod evaluator;
pub mod prompt;

pub use backend::OllamaBackend;
pub use evaluator::OracleEvaluator;
pub use prompt::{evaluation_request, ProspectPromptBuilder};
