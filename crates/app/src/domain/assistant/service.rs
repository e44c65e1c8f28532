//! Stylist service.

use async_trait::async_trait;
use mockall::automock;

/// Answer shown when no API key is configured.
pub const NOT_CONFIGURED_ANSWER: &str =
    "I apologize, but I cannot connect to the styling assistant right now.";

/// Answer shown when the model replies with no text.
pub const EMPTY_ANSWER: &str = "I'm having trouble thinking of a style right now.";

/// Answer shown on network, HTTP or decoding failures.
pub const OFFLINE_ANSWER: &str = "I'm currently offline. Please try again later.";

/// Styling assistant.
#[automock]
#[async_trait]
pub trait Stylist: Send + Sync {
    /// Answer a free-text styling question, optionally with a description of the current view.
    ///
    /// Never fails; errors are answered with a fallback message.
    async fn advise(&self, query: String, context: Option<String>) -> String;
}
