//! Application configuration

use clap::Args;

pub mod assistant;
pub mod observability;
pub mod storefront;

pub use assistant::AssistantConfig;
pub use observability::{LogFormat, LoggingConfig};
pub use storefront::StorefrontConfig;

/// Fabrima application configuration, read from CLI arguments and the environment.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Storefront storage, catalog and display settings.
    #[command(flatten)]
    pub storefront: StorefrontConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Styling assistant settings.
    #[command(flatten)]
    pub assistant: AssistantConfig,
}
