//! Carts service.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    mem,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use fabrima::{
    cart::{CartAction, CartLineItem, CartState, reduce},
    persistence::CartStore,
    products::ProductId,
    storage::KeyValueStore,
};
use mockall::automock;
use tracing::{debug, warn};

/// Result of applying one action: the cart just before and just after it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartChange {
    /// Cart the action was applied to
    pub before: CartState,

    /// Resulting cart
    pub after: CartState,
}

impl CartChange {
    /// Line for `id` that the action removed, if any.
    pub fn removed(&self, id: &ProductId) -> Option<&CartLineItem> {
        if self.after.get(id).is_some() {
            return None;
        }

        self.before.get(id)
    }
}

/// Cart backed by a key-value store.
///
/// Every transition is applied to the in-memory cart under a single lock, then the full cart is
/// written through. Write failures are logged and otherwise ignored.
pub struct StoredCartsService {
    state: Mutex<CartState>,
    store: CartStore<Arc<dyn KeyValueStore>>,
}

impl StoredCartsService {
    /// Hydrate the cart from `store`, starting empty if nothing usable is stored.
    #[must_use]
    pub fn hydrate(store: Arc<dyn KeyValueStore>) -> Self {
        let store = CartStore::new(store);

        let state = match store.try_load() {
            Ok(Some(state)) => {
                debug!(lines = state.len(), "cart restored");

                state
            }
            Ok(None) => CartState::new(),
            Err(error) => {
                warn!("discarding stored cart: {error}");

                CartState::new()
            }
        };

        Self {
            state: Mutex::new(state),
            store,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, state: &CartState) {
        if let Err(error) = self.store.save(state) {
            warn!(key = self.store.key(), "failed to persist cart: {error}");
        }
    }
}

impl Debug for StoredCartsService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StoredCartsService")
            .field("state", &self.state)
            .field("key", &self.store.key())
            .finish_non_exhaustive()
    }
}

impl CartsService for StoredCartsService {
    fn snapshot(&self) -> CartState {
        self.lock().clone()
    }

    fn dispatch(&self, action: CartAction) -> CartChange {
        let mut state = self.lock();

        let next = reduce(&state, action);

        self.persist(&next);

        CartChange {
            before: mem::replace(&mut *state, next.clone()),
            after: next,
        }
    }

    fn clear(&self) -> CartState {
        let mut state = self.lock();

        if let Err(error) = self.store.clear() {
            warn!(key = self.store.key(), "failed to clear stored cart: {error}");
        }

        *state = CartState::new();

        state.clone()
    }
}

#[automock]
pub trait CartsService: Send + Sync {
    /// Current cart.
    fn snapshot(&self) -> CartState;

    /// Apply `action` atomically, returning the cart before and after it.
    fn dispatch(&self, action: CartAction) -> CartChange;

    /// Empty the cart and forget the stored copy.
    fn clear(&self) -> CartState;
}

#[cfg(test)]
mod tests {
    use std::thread;

    use fabrima::{
        persistence::CART_STORAGE_KEY,
        products::Product,
        storage::{FileStore, MemoryStore},
        totals,
    };
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    fn canvas() -> Product {
        Product::new("na-1", "Canvas", Decimal::new(10, 0), "Fabric")
    }

    #[test]
    fn hydrate_empty_store_starts_empty() {
        let service = StoredCartsService::hydrate(Arc::new(MemoryStore::new()));

        assert!(service.snapshot().is_empty());
    }

    #[test]
    fn hydrate_ignores_corrupt_value() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        store.set(CART_STORAGE_KEY, "{not json")?;

        let service = StoredCartsService::hydrate(store);

        assert!(service.snapshot().is_empty());

        Ok(())
    }

    #[test]
    fn dispatch_writes_through() -> TestResult {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let service = StoredCartsService::hydrate(Arc::clone(&store));

        service.dispatch(CartAction::Add(canvas()));
        service.dispatch(CartAction::UpdateQuantity {
            id: ProductId::new("na-1"),
            delta: 2,
        });

        let restored = CartStore::new(store).try_load()?;

        assert_eq!(
            restored.map(|state| state.quantity_of(&ProductId::new("na-1"))),
            Some(3)
        );

        Ok(())
    }

    #[test]
    fn cart_survives_restart() -> TestResult {
        let dir = tempfile::tempdir()?;

        {
            let service = StoredCartsService::hydrate(Arc::new(FileStore::open(dir.path())?));
            service.dispatch(CartAction::Add(canvas()));
            service.dispatch(CartAction::Add(canvas()));
        }

        let service = StoredCartsService::hydrate(Arc::new(FileStore::open(dir.path())?));

        assert_eq!(totals::item_count(&service.snapshot()), 2);

        Ok(())
    }

    #[test]
    fn full_store_keeps_memory_authoritative() {
        let service = StoredCartsService::hydrate(Arc::new(MemoryStore::with_quota(4)));

        let change = service.dispatch(CartAction::Add(canvas()));

        assert_eq!(change.after.len(), 1);
        assert_eq!(service.snapshot(), change.after);
    }

    #[test]
    fn dispatch_reports_before_and_after() {
        let service = StoredCartsService::hydrate(Arc::new(MemoryStore::new()));
        let id = ProductId::new("na-1");

        let added = service.dispatch(CartAction::Add(canvas()));

        assert!(added.before.is_empty());
        assert_eq!(added.after.quantity_of(&id), 1);
        assert!(added.removed(&id).is_none());

        let removed = service.dispatch(CartAction::Remove(id.clone()));

        assert_eq!(
            removed.removed(&id).map(|item| item.product.name.as_str()),
            Some("Canvas")
        );

        let again = service.dispatch(CartAction::Remove(id.clone()));

        assert!(again.removed(&id).is_none());
    }

    #[test]
    fn clear_forgets_stored_cart() -> TestResult {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let service = StoredCartsService::hydrate(Arc::clone(&store));

        service.dispatch(CartAction::Add(canvas()));

        assert!(service.clear().is_empty());
        assert!(store.get(CART_STORAGE_KEY)?.is_none());

        Ok(())
    }

    #[test]
    fn concurrent_adds_are_not_lost() {
        let service = Arc::new(StoredCartsService::hydrate(Arc::new(MemoryStore::new())));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);

                thread::spawn(move || {
                    for _ in 0..25 {
                        service.dispatch(CartAction::Add(canvas()));
                    }
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().is_ok());
        }

        assert_eq!(service.snapshot().quantity_of(&ProductId::new("na-1")), 200);
    }
}
