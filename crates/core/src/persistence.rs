//! Cart Persistence
//!
//! Stores the whole cart as a JSON array of line items under a single key.

use thiserror::Error;

use crate::{
    cart::CartState,
    products::ProductId,
    storage::{KeyValueStore, StorageError},
};

/// Storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "fabrima_cart";

/// Errors raised while loading or saving the cart.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// The key-value store failed.
    #[error("cart storage failed: {0}")]
    Storage(#[from] StorageError),

    /// The stored value is not a valid cart.
    #[error("stored cart is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// The cart could not be serialized.
    #[error("cart could not be serialized: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A line's price cannot be stored without losing precision.
    #[error("price of product {0} cannot be stored exactly")]
    InexactPrice(ProductId),
}

/// Persistence adapter for the cart.
#[derive(Debug)]
pub struct CartStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create a cart store over `store` using [`CART_STORAGE_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, CART_STORAGE_KEY)
    }

    /// Create a cart store over `store` using a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored cart, reporting why it could not be read.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStoreError`] if the store fails or the stored value does not parse.
    pub fn try_load(&self) -> Result<Option<CartState>, CartStoreError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };

        let state = serde_json::from_str(&raw).map_err(CartStoreError::Corrupt)?;

        Ok(Some(state))
    }

    /// Load the stored cart, falling back to an empty cart on any failure.
    pub fn load(&self) -> CartState {
        self.try_load().ok().flatten().unwrap_or_default()
    }

    /// Serialize and store the full cart, overwriting the previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStoreError`] if a price would not read back unchanged, or if
    /// serialization or the write fails. Nothing is written on error. Callers may ignore the
    /// failure; the in-memory cart stays authoritative.
    pub fn save(&self, state: &CartState) -> Result<(), CartStoreError> {
        if let Some(item) = state.iter().find(|item| !item.product.has_storable_price()) {
            return Err(CartStoreError::InexactPrice(item.id().clone()));
        }

        let raw = serde_json::to_string(state).map_err(CartStoreError::Serialize)?;

        self.store.set(&self.key, &raw)?;

        Ok(())
    }

    /// Delete the stored cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStoreError`] if the store cannot be modified.
    pub fn clear(&self) -> Result<(), CartStoreError> {
        self.store.remove(&self.key)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        products::Product,
        storage::{MemoryStore, MockKeyValueStore},
    };

    use super::*;

    fn sample_cart() -> CartState {
        let mut a = Product::new("na-1", "Heavy Twill", Decimal::new(8614, 2), "Fabric");
        a.discount = Some(10);
        a.rating = Some(4.5);
        a.reviews = Some(12);
        a.brand = Some("Fabrima".to_string());
        a.in_stock = Some(true);
        a.material = "Twill".to_string();

        let b = Product::new("na-2", "Oxford", Decimal::new(5, 0), "Industrial");

        CartState::new().with_added(&a).with_added(&b).with_added(&a)
    }

    #[test]
    fn load_without_stored_value_is_empty() -> TestResult {
        let store = CartStore::new(MemoryStore::new());

        assert!(store.try_load()?.is_none());
        assert!(store.load().is_empty());

        Ok(())
    }

    #[test]
    fn save_then_load_round_trips() -> TestResult {
        let store = CartStore::new(MemoryStore::new());
        let cart = sample_cart();

        store.save(&cart)?;

        assert_eq!(store.load(), cart);

        Ok(())
    }

    #[test]
    fn many_digit_prices_round_trip() -> TestResult {
        let store = CartStore::new(MemoryStore::new());
        let silk = Product::new("sk-1", "Mulberry Silk", "1234.56789012345".parse()?, "Fabric");
        let strip = Product::new("lp-2", "PVC Strip", "0.445783132530".parse()?, "Industrial");

        let cart = CartState::new().with_added(&silk).with_added(&strip);

        store.save(&cart)?;

        assert_eq!(store.try_load()?, Some(cart));

        Ok(())
    }

    #[test]
    fn save_refuses_prices_that_would_not_read_back() -> TestResult {
        let memory = MemoryStore::new();
        let store = CartStore::new(&memory);

        store.save(&sample_cart())?;

        let fine = Product::new("fw-1", "Fine Weave", "12.345678901234567891".parse()?, "Fabric");
        let cart = sample_cart().with_added(&fine);

        assert!(matches!(
            store.save(&cart),
            Err(CartStoreError::InexactPrice(id)) if id == ProductId::new("fw-1")
        ));
        assert_eq!(store.load(), sample_cart(), "previous value is kept");

        Ok(())
    }

    #[test]
    fn save_overwrites_previous_value() -> TestResult {
        let store = CartStore::new(MemoryStore::new());

        store.save(&sample_cart())?;
        store.save(&CartState::new())?;

        assert!(store.load().is_empty());

        Ok(())
    }

    #[test]
    fn stored_layout_is_flat_array_of_line_items() -> TestResult {
        let memory = MemoryStore::new();
        let store = CartStore::new(&memory);

        store.save(&sample_cart())?;

        let raw = memory.get(CART_STORAGE_KEY)?.unwrap_or_default();
        let json: serde_json::Value = serde_json::from_str(&raw)?;

        assert_eq!(json[0]["id"], "na-1");
        assert_eq!(json[0]["quantity"], 2);
        assert_eq!(json[0]["inStock"], true);
        assert_eq!(json[1]["id"], "na-2");
        assert_eq!(json[1]["quantity"], 1);
        assert!(json[1].get("discount").is_none(), "absent fields are omitted");

        Ok(())
    }

    #[test]
    fn corrupt_value_loads_as_empty() -> TestResult {
        let memory = MemoryStore::new();
        memory.set(CART_STORAGE_KEY, "{not json")?;

        let store = CartStore::new(&memory);

        assert!(matches!(store.try_load(), Err(CartStoreError::Corrupt(_))));
        assert!(store.load().is_empty());

        Ok(())
    }

    #[test]
    fn stored_duplicates_are_merged_on_load() -> TestResult {
        let memory = MemoryStore::new();
        memory.set(
            CART_STORAGE_KEY,
            r#"[{"id":"a","name":"A","price":2,"category":"Fabric","quantity":1},
                {"id":"a","name":"A","price":2,"category":"Fabric","quantity":2}]"#,
        )?;

        let cart = CartStore::new(&memory).load();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.iter().map(|item| item.quantity).sum::<u32>(), 3);

        Ok(())
    }

    #[test]
    fn storage_failures_fail_soft() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get()
            .returning(|_| Err(StorageError::Unavailable));
        mock.expect_set()
            .returning(|_, _| Err(StorageError::Unavailable));

        let store = CartStore::new(mock);

        assert!(store.load().is_empty());
        assert!(matches!(
            store.save(&sample_cart()),
            Err(CartStoreError::Storage(StorageError::Unavailable))
        ));
    }

    #[test]
    fn quota_exceeded_is_reported() {
        let store = CartStore::new(MemoryStore::with_quota(4));

        let result = store.save(&sample_cart());

        assert!(matches!(
            result,
            Err(CartStoreError::Storage(StorageError::QuotaExceeded { .. }))
        ));
    }

    #[test]
    fn clear_removes_stored_cart() -> TestResult {
        let store = CartStore::with_key(MemoryStore::new(), "other_cart");

        store.save(&sample_cart())?;
        store.clear()?;

        assert_eq!(store.key(), "other_cart");
        assert!(store.try_load()?.is_none());

        Ok(())
    }
}
