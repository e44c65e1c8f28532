//! App Context

use std::sync::Arc;

use fabrima::{
    catalog::{Catalog, CatalogError},
    pricing::DisplayPricing,
    storage::{FileStore, StorageError},
};
use thiserror::Error;
use tracing::info;

use crate::{
    config::{AssistantConfig, StorefrontConfig},
    domain::{
        assistant::{GeminiStylist, Stylist},
        carts::{CartsService, StoredCartsService},
    },
    notifications::Toaster,
    storefront::Storefront,
};

/// Catalog bundled with the binary.
pub const BUNDLED_CATALOG: &str = include_str!("../../../fixtures/products/catalog.yml");

/// Errors raised while wiring the application.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The data directory could not be opened.
    #[error("failed to open data directory")]
    Storage(#[source] StorageError),

    /// The catalog could not be read or parsed.
    #[error("failed to load product catalog")]
    Catalog(#[source] CatalogError),
}

/// Shared application services.
#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<Catalog>,
    pub carts: Arc<dyn CartsService>,
    pub stylist: Arc<dyn Stylist>,
    pub toaster: Toaster,
    pub pricing: DisplayPricing,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the data directory cannot be opened or the catalog fails to load.
    pub fn from_config(
        storefront: &StorefrontConfig,
        assistant: AssistantConfig,
    ) -> Result<Self, AppInitError> {
        let store = FileStore::open(&storefront.data_dir).map_err(AppInitError::Storage)?;

        let catalog = match &storefront.catalog {
            Some(path) => Catalog::from_file(path),
            None => Catalog::from_yaml(BUNDLED_CATALOG),
        }
        .map_err(AppInitError::Catalog)?;

        info!(
            data_dir = %storefront.data_dir.display(),
            products = catalog.len(),
            "storefront ready"
        );

        Ok(Self {
            catalog: Arc::new(catalog),
            carts: Arc::new(StoredCartsService::hydrate(Arc::new(store))),
            stylist: Arc::new(GeminiStylist::new(assistant.into_stylist_config())),
            toaster: Toaster::new(storefront.notification_ttl()),
            pricing: storefront.display_pricing(),
        })
    }

    /// Storefront controller over this context.
    pub fn storefront(&self) -> Storefront {
        Storefront::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.carts),
            self.toaster.clone(),
            self.pricing,
        )
    }
}
