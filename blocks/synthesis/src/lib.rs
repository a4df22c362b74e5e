//! AI task synthesis: turn a raw requirements document into a batch of
//! unapproved tasks, assigned against the current developer roster.

pub mod gemini;
pub mod generate;
pub mod parse;
pub mod prompt;

pub use gemini::GeminiClient;
pub use generate::{generate_tasks, list_models};
