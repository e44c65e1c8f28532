//! Assistant errors.

use thiserror::Error;

/// Errors that can occur when talking to the styling assistant.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// No API key is configured.
    #[error("no API key configured")]
    MissingApiKey,

    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The model returned a non-2xx response.
    #[error("unexpected response from assistant: {0}")]
    UnexpectedResponse(String),

    /// The model answered with no text.
    #[error("assistant returned an empty answer")]
    EmptyAnswer,
}
