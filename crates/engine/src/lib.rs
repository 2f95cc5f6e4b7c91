//! Trainer engine: run orchestration
//!
//! The engine owns the registry of live mode runs and wires together the
//! oracle backends, the roleplay machinery, the mode controllers and the
//! progress store. It is the single entry point a transport layer (HTTP,
//! telephony) talks to.

pub mod engine;

pub use engine::{RunCreated, TrainerEngine};
