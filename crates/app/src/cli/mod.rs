use clap::{Parser, Subcommand};
use fabrima_app::{config::AppConfig, context::AppContext, observability};

mod ask;
mod cart;
mod catalog;

#[derive(Debug, Parser)]
#[command(name = "fabrima-app", about = "Fabrima storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List catalog products
    Catalog(catalog::CatalogArgs),

    /// Inspect or change the cart
    Cart(cart::CartCommand),

    /// Ask the styling assistant
    Ask(ask::AskArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let AppConfig {
            storefront,
            logging,
            assistant,
        } = self.config;

        observability::init_subscriber(&logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let context = AppContext::from_config(&storefront, assistant)
            .map_err(|error| format!("{error}: {}", error_source(&error)))?;

        let expiry = context.toaster.spawn_expiry();

        let result = match self.command {
            Commands::Catalog(args) => catalog::run(&context, &args),
            Commands::Cart(command) => cart::run(&context, command),
            Commands::Ask(args) => ask::run(&context, args).await,
        };

        context.toaster.shutdown();

        if let Err(error) = expiry.await {
            tracing::warn!("notification expiry task failed: {error}");
        }

        result
    }
}

fn error_source(error: &dyn std::error::Error) -> String {
    error
        .source()
        .map_or_else(|| "unknown cause".to_string(), ToString::to_string)
}
