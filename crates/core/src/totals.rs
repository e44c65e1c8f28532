//! Totals
//!
//! Derived, side-effect free reads over a [`CartState`].

use rust_decimal::Decimal;

use crate::cart::CartState;

/// Sum of all line quantities, used for the cart badge.
pub fn item_count(state: &CartState) -> u64 {
    state.iter().map(|item| u64::from(item.quantity)).sum()
}

/// Sum of `price * quantity` over all lines.
///
/// Product discounts are deliberately not applied here; they only affect per-unit display
/// prices (see [`crate::pricing::discounted_price`]). Arithmetic saturates instead of
/// overflowing.
pub fn subtotal(state: &CartState) -> Decimal {
    state.iter().fold(Decimal::ZERO, |acc, item| {
        acc.saturating_add(item.product.price.saturating_mul(Decimal::from(item.quantity)))
    })
}
