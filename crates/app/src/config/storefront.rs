//! Storefront Config

use std::{path::PathBuf, time::Duration};

use clap::Args;
use fabrima::pricing::DisplayPricing;
use rust_decimal::Decimal;
use rusty_money::iso;

/// Storefront storage, catalog and display settings.
#[derive(Debug, Args)]
pub struct StorefrontConfig {
    /// Directory holding persisted storefront state
    #[arg(long, env = "FABRIMA_DATA_DIR", default_value = ".fabrima")]
    pub data_dir: PathBuf,

    /// Product catalog YAML; the bundled catalog is used when omitted
    #[arg(long, env = "FABRIMA_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Rupees per base price unit
    #[arg(long, env = "FABRIMA_DISPLAY_RATE", default_value = "83")]
    pub display_rate: Decimal,

    /// How long notifications stay visible, in milliseconds
    #[arg(long, env = "FABRIMA_NOTIFICATION_TTL_MS", default_value_t = 4_000_u64)]
    pub notification_ttl_ms: u64,
}

impl StorefrontConfig {
    /// Display currency conversion.
    #[must_use]
    pub fn display_pricing(&self) -> DisplayPricing {
        DisplayPricing::new(iso::INR, self.display_rate)
    }

    /// Notification lifetime.
    #[must_use]
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }
}
