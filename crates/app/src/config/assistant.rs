//! Assistant Config

use clap::Args;

use crate::domain::assistant::StylistConfig;

/// Styling assistant settings.
#[derive(Debug, Args)]
pub struct AssistantConfig {
    /// Gemini API key; the assistant answers with a fallback message when unset
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model used for styling advice
    #[arg(long, env = "FABRIMA_ASSISTANT_MODEL", default_value = "gemini-3-flash-preview")]
    pub model: String,

    /// Generative Language API base URL
    #[arg(
        long,
        env = "FABRIMA_ASSISTANT_ENDPOINT",
        default_value = "https://generativelanguage.googleapis.com"
    )]
    pub endpoint: String,

    /// Request timeout in seconds
    #[arg(long, env = "FABRIMA_ASSISTANT_TIMEOUT_SECONDS", default_value_t = 20_u64)]
    pub timeout_seconds: u64,
}

impl AssistantConfig {
    /// Build the stylist client configuration, moving the API key out of the CLI config.
    #[must_use]
    pub fn into_stylist_config(self) -> StylistConfig {
        StylistConfig::new(self.endpoint, self.model, self.api_key)
            .with_timeout_seconds(self.timeout_seconds)
    }
}
