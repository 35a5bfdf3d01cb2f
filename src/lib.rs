//! tutorbuddy - Interactive English Tutor
//!
//! Practice vocabulary, grammar and conversation against an
//! OpenAI-compatible chat completion service.
//!
//! # Architecture
//!
//! - **dispatch**: one prompt in, one trimmed answer out
//! - **progress**: JSON progress file, read-modify-write per save
//! - **conversation**: rolling session transcript and prompt rendering
//! - **tutor**: the three practice flows
//! - **repl** / **cli**: terminal surface

pub mod errors;

pub use errors::{DispatchError, Result, TutorError};

pub mod cli;
pub mod conversation;
pub mod dispatch;
pub mod doctor;
pub mod progress;
pub mod repl;
pub mod tutor;
