//! Products

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product identifier, stable across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Product
///
/// Read-only reference data supplied by the catalog. Field names follow the persisted
/// cart layout, so a product serializes the same way inside a cart line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price in base units
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Catalog category
    pub category: String,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Material, e.g. "Twill"
    #[serde(default)]
    pub material: String,

    /// Discount percentage in `[0, 100)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u8>,

    /// Average rating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,

    /// Number of reviews
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,

    /// Brand name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    /// Stock flag; absent means in stock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
}

impl Product {
    /// Create a product with the required fields; everything else is empty or absent.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Decimal,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category: category.into(),
            image: String::new(),
            description: String::new(),
            material: String::new(),
            discount: None,
            rating: None,
            reviews: None,
            brand: None,
            in_stock: None,
        }
    }

    /// Whether the product can be bought. Absent stock information means in stock.
    pub fn is_in_stock(&self) -> bool {
        self.in_stock.unwrap_or(true)
    }

    /// Discount percentage, treating an absent discount as zero.
    pub fn discount_percent(&self) -> u8 {
        self.discount.unwrap_or(0)
    }

    /// Whether the price survives being stored, see [`is_storable_price`].
    pub fn has_storable_price(&self) -> bool {
        is_storable_price(self.price)
    }
}

#[derive(Serialize, Deserialize)]
struct StoredPrice(#[serde(with = "rust_decimal::serde::float")] Decimal);

/// Whether `price` reads back unchanged after going through the JSON number encoding used for
/// persisted products.
///
/// Prices are stored as JSON floats, so values needing more precision than an `f64` carries
/// (roughly 15 significant digits) are not storable.
pub fn is_storable_price(price: Decimal) -> bool {
    serde_json::to_string(&StoredPrice(price))
        .ok()
        .and_then(|raw| serde_json::from_str::<StoredPrice>(&raw).ok())
        .is_some_and(|StoredPrice(stored)| stored == price)
}
