//! Pricing

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

use crate::products::Product;

/// Errors that can occur while converting amounts for display.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The converted amount does not fit into the currency's minor units.
    #[error("amount {0} overflows when converted to {1}")]
    Overflow(Decimal, &'static str),
}

/// Per-unit price after applying the product's discount percentage.
pub fn discounted_price(product: &Product) -> Decimal {
    let discount = Decimal::from(product.discount_percent());

    product.price - product.price.saturating_mul(discount) / Decimal::ONE_HUNDRED
}

/// Conversion from base units to a display currency at a fixed rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPricing {
    currency: &'static Currency,
    rate: Decimal,
}

impl DisplayPricing {
    /// Create a display conversion with the given currency and rate.
    pub fn new(currency: &'static Currency, rate: Decimal) -> Self {
        Self { currency, rate }
    }

    /// Display currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Base-unit to display-currency rate.
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Convert a base-unit amount into display money, rounding half away from zero.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the converted amount cannot be represented.
    pub fn to_money(&self, amount: Decimal) -> Result<Money<'static, Currency>, PricingError> {
        let overflow = || PricingError::Overflow(amount, self.currency.iso_alpha_code);

        let mut converted = amount
            .checked_mul(self.rate)
            .ok_or_else(overflow)?
            .round_dp_with_strategy(self.currency.exponent, RoundingStrategy::MidpointAwayFromZero);

        converted.rescale(self.currency.exponent);

        let minor_units = i64::try_from(converted.mantissa()).map_err(|_err| overflow())?;

        Ok(Money::from_minor(minor_units, self.currency))
    }
}

impl Default for DisplayPricing {
    /// Indian rupees at 83 per base unit.
    fn default() -> Self {
        Self::new(iso::INR, Decimal::new(83, 0))
    }
}
