//! Cart
//!
//! The cart is an ordered list of line items, at most one per product id. It only changes
//! through [`CartAction`]s applied by [`reduce`], which never mutates the previous state.

use serde::{Deserialize, Serialize};

use crate::products::{Product, ProductId};

pub mod summary;

/// A cart entry pairing a product with a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// The product in this line
    #[serde(flatten)]
    pub product: Product,

    /// Quantity, never below 1
    pub quantity: u32,
}

impl CartLineItem {
    /// Create a line item holding a single unit of the product.
    pub fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// Id of the product in this line.
    pub fn id(&self) -> &ProductId {
        &self.product.id
    }
}

/// A cart-affecting operation.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add one unit of a product, creating its line if needed.
    Add(Product),

    /// Adjust the quantity of a line by a signed delta, clamped at 1.
    UpdateQuantity {
        /// Line to adjust
        id: ProductId,

        /// Signed change in quantity
        delta: i64,
    },

    /// Remove a line entirely.
    Remove(ProductId),
}

/// Cart State
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct CartState {
    items: Vec<CartLineItem>,
}

impl CartState {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from line items, merging lines that share a product id.
    ///
    /// The first occurrence keeps its position and absorbs the quantities of later duplicates,
    /// and zero quantities are raised to 1.
    pub fn from_items(items: impl IntoIterator<Item = CartLineItem>) -> Self {
        let mut merged: Vec<CartLineItem> = Vec::new();

        for mut item in items {
            item.quantity = item.quantity.max(1);

            match merged.iter_mut().find(|line| line.id() == item.id()) {
                Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
                None => merged.push(item),
            }
        }

        Self { items: merged }
    }

    /// Iterate over the line items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.iter()
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Find the line for a product id.
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Quantity of a product in the cart, zero when absent.
    pub fn quantity_of(&self, id: &ProductId) -> u32 {
        self.get(id).map_or(0, |item| item.quantity)
    }

    /// Number of distinct lines in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Apply an action, returning the next state.
    #[must_use]
    pub fn apply(&self, action: CartAction) -> Self {
        reduce(self, action)
    }

    /// Add one unit of a product.
    #[must_use]
    pub fn with_added(&self, product: &Product) -> Self {
        if self.get(&product.id).is_some() {
            return self.map_line(&product.id, |quantity| quantity.saturating_add(1));
        }

        let mut items = self.items.clone();
        items.push(CartLineItem::new(product.clone()));

        Self { items }
    }

    /// Change a line's quantity by `delta`, never going below 1.
    #[must_use]
    pub fn with_quantity_delta(&self, id: &ProductId, delta: i64) -> Self {
        self.map_line(id, |quantity| clamp_quantity(i64::from(quantity).saturating_add(delta)))
    }

    /// Drop the line for a product id.
    #[must_use]
    pub fn without(&self, id: &ProductId) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| item.id() != id)
                .cloned()
                .collect(),
        }
    }

    fn map_line(&self, id: &ProductId, quantity: impl Fn(u32) -> u32) -> Self {
        Self {
            items: self
                .items
                .iter()
                .map(|item| {
                    if item.id() == id {
                        CartLineItem {
                            product: item.product.clone(),
                            quantity: quantity(item.quantity),
                        }
                    } else {
                        item.clone()
                    }
                })
                .collect(),
        }
    }
}

impl From<Vec<CartLineItem>> for CartState {
    fn from(items: Vec<CartLineItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<CartState> for Vec<CartLineItem> {
    fn from(state: CartState) -> Self {
        state.items
    }
}

impl<'a> IntoIterator for &'a CartState {
    type Item = &'a CartLineItem;
    type IntoIter = std::slice::Iter<'a, CartLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Apply a cart action to a state, producing the next state.
///
/// Targets that are not in the cart leave the state unchanged.
pub fn reduce(state: &CartState, action: CartAction) -> CartState {
    match action {
        CartAction::Add(product) => state.with_added(&product),
        CartAction::UpdateQuantity { id, delta } => state.with_quantity_delta(&id, delta),
        CartAction::Remove(id) => state.without(&id),
    }
}

fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(1)).unwrap_or(u32::MAX)
}
