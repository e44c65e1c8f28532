//! Styling Assistant
//!
//! Free-text styling advice from a hosted language model. The assistant never fails from the
//! caller's point of view: every error is mapped to a fixed, readable fallback answer.

mod errors;
pub mod gemini;
mod prompt;
mod service;

pub use errors::AssistantError;
pub use gemini::{GeminiStylist, StylistConfig};
pub use prompt::{DEFAULT_CONTEXT, system_instruction};
pub use service::*;
