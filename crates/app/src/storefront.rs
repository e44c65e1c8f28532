//! Storefront
//!
//! Top-level controller: owns the view state and routes user actions to the cart, catalog and
//! notifications.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    io,
    sync::Arc,
};

use fabrima::{
    cart::{
        CartAction, CartState,
        summary::{CartSummary, SummaryError},
    },
    catalog::Catalog,
    notifications::{Notification, NotificationId},
    pricing::DisplayPricing,
    products::{Product, ProductId},
    views::{PageView, ViewState},
};
use thiserror::Error;
use tracing::{debug, info};

use crate::{domain::carts::CartsService, notifications::Toaster};

/// Message shown when a guest tries to use the wishlist.
pub const WISHLIST_LOGIN_MESSAGE: &str = "Login first for next steps";

/// Errors raised by storefront actions.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The product is not in the catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// The cart summary could not be rendered.
    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// Storefront controller.
pub struct Storefront {
    catalog: Arc<Catalog>,
    carts: Arc<dyn CartsService>,
    toaster: Toaster,
    pricing: DisplayPricing,
    view: ViewState,
}

impl Debug for Storefront {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Storefront")
            .field("products", &self.catalog.len())
            .field("pricing", &self.pricing)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Create a storefront starting on the home page.
    pub fn new(
        catalog: Arc<Catalog>,
        carts: Arc<dyn CartsService>,
        toaster: Toaster,
        pricing: DisplayPricing,
    ) -> Self {
        Self {
            catalog,
            carts,
            toaster,
            pricing,
            view: ViewState::new(),
        }
    }

    fn product(&self, id: &ProductId) -> Result<&Product, StorefrontError> {
        self.catalog
            .get(id)
            .ok_or_else(|| StorefrontError::UnknownProduct(id.clone()))
    }

    /// Add one unit of a catalog product and open the cart preview.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownProduct`] if `id` is not in the catalog.
    pub fn add_to_cart(&mut self, id: &ProductId) -> Result<CartState, StorefrontError> {
        let product = self.product(id)?.clone();
        let message = format!("Added {} to cart", product.name);

        let state = self.carts.dispatch(CartAction::Add(product)).after;

        info!(product = %id, quantity = state.quantity_of(id), "added to cart");

        self.view.open_cart();
        self.toaster.push(message);

        Ok(state)
    }

    /// Change a line's quantity by `delta`, never going below one.
    pub fn update_quantity(&self, id: &ProductId, delta: i64) -> CartState {
        let state = self.carts.dispatch(CartAction::UpdateQuantity {
            id: id.clone(),
            delta,
        })
        .after;

        debug!(product = %id, delta, quantity = state.quantity_of(id), "quantity updated");

        state
    }

    /// Remove a line from the cart. Ids not in the cart are ignored.
    pub fn remove_from_cart(&self, id: &ProductId) -> CartState {
        let change = self.carts.dispatch(CartAction::Remove(id.clone()));

        if let Some(item) = change.removed(id) {
            info!(product = %id, "removed from cart");

            self.toaster.push(format!("Removed {} from cart", item.product.name));
        }

        change.after
    }

    /// Empty the cart.
    pub fn clear_cart(&self) -> CartState {
        info!("cart cleared");

        self.carts.clear()
    }

    /// Current cart.
    pub fn cart(&self) -> CartState {
        self.carts.snapshot()
    }

    /// Render the cart table and totals to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Summary`] if rendering fails.
    pub fn write_cart(&self, out: impl io::Write) -> Result<(), StorefrontError> {
        let state = self.carts.snapshot();

        CartSummary::new(&state, self.pricing).write_to(out)?;

        Ok(())
    }

    /// Switch to `page`.
    pub fn navigate(&mut self, page: PageView) {
        debug!(%page, "navigate");

        self.view.navigate(page);
    }

    /// Filter the shop by `category`.
    pub fn select_category(&mut self, category: impl Into<String>) {
        self.view.select_category(category);
    }

    /// Show a product's page.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownProduct`] if `id` is not in the catalog.
    pub fn select_product(&mut self, id: &ProductId) -> Result<(), StorefrontError> {
        self.product(id)?;
        self.view.select_product(id.clone());

        Ok(())
    }

    /// Products matching the selected category.
    pub fn shop(&self) -> Vec<&Product> {
        self.catalog
            .in_category(self.view.selected_category())
            .collect()
    }

    /// Product on the product page, if any.
    pub fn selected_product(&self) -> Option<&Product> {
        self.view
            .selected_product()
            .and_then(|id| self.catalog.get(id))
    }

    /// Wishlist requires an account: ask the user to sign in.
    pub fn wishlist(&mut self) -> NotificationId {
        self.navigate(PageView::UserLogin);

        self.toaster.push(WISHLIST_LOGIN_MESSAGE)
    }

    /// Close the cart preview.
    pub fn close_cart(&mut self) {
        self.view.close_cart();
    }

    /// Current view state.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Catalog backing the storefront.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Display-currency pricing.
    pub fn pricing(&self) -> DisplayPricing {
        self.pricing
    }

    /// Visible notifications.
    pub fn notifications(&self) -> Vec<Notification> {
        self.toaster.visible()
    }

    /// Remove a notification early.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.toaster.dismiss(id)
    }
}
