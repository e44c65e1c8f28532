//! Cart Summary

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartState,
    pricing::{DisplayPricing, PricingError},
    totals,
};

/// Errors that can occur while rendering a cart summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// A display price could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Writing to the output failed.
    #[error("failed to write cart summary: {0}")]
    Io(#[from] io::Error),
}

/// Renderable view of a cart with its derived totals.
#[derive(Debug, Clone, Copy)]
pub struct CartSummary<'a> {
    state: &'a CartState,
    pricing: DisplayPricing,
}

impl<'a> CartSummary<'a> {
    /// Summarise `state`, showing display prices through `pricing`.
    pub fn new(state: &'a CartState, pricing: DisplayPricing) -> Self {
        Self { state, pricing }
    }

    /// Badge count.
    pub fn item_count(&self) -> u64 {
        totals::item_count(self.state)
    }

    /// Subtotal in base units.
    pub fn subtotal(&self) -> Decimal {
        totals::subtotal(self.state)
    }

    /// Subtotal in the display currency.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the conversion overflows.
    pub fn display_subtotal(&self) -> Result<Money<'static, Currency>, PricingError> {
        self.pricing.to_money(self.subtotal())
    }

    /// Render the line table followed by the totals.
    ///
    /// # Errors
    ///
    /// Returns a [`SummaryError`] if a price cannot be converted or the output fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), SummaryError> {
        if self.state.is_empty() {
            writeln!(out, "Your cart is empty")?;

            return Ok(());
        }

        let mut builder = Builder::default();

        builder.push_record([
            String::new(),
            "Item".to_string(),
            "Unit".to_string(),
            "Qty".to_string(),
            "Line".to_string(),
            self.pricing.currency().iso_alpha_code.to_string(),
        ]);

        for (position, item) in self.state.iter().enumerate() {
            let line_total = item
                .product
                .price
                .saturating_mul(Decimal::from(item.quantity));

            builder.push_record([
                format!("#{:<3}", position + 1),
                item.product.name.clone(),
                item.product.price.round_dp(2).to_string(),
                item.quantity.to_string(),
                line_total.round_dp(2).to_string(),
                self.pricing.to_money(line_total)?.to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..6), Alignment::right());

        writeln!(out, "{table}")?;
        writeln!(out, "Items:    {}", self.item_count())?;
        writeln!(
            out,
            "Subtotal: {} ({})",
            self.subtotal().round_dp(2),
            self.display_subtotal()?
        )?;

        Ok(())
    }
}
