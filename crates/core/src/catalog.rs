//! Catalog
//!
//! Immutable, pre-loaded product list. Products are read from YAML fixtures of the form:
//!
//! ```yaml
//! products:
//!   - id: na-1
//!     name: Heavy Twill Bonded
//!     price: "86.14"
//!     category: Fabric
//!     discount: 10
//! ```

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    products::{Product, ProductId, is_storable_price},
    views::ALL_CATEGORIES,
};

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the fixture file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format, negative, or too precise to store
    #[error("Invalid price for product {0}: {1}")]
    InvalidPrice(String, String),

    /// Discount outside `[0, 100)`
    #[error("Invalid discount for product {0}: {1}%")]
    InvalidDiscount(String, u8),

    /// Two products share an id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),
}

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Products in display order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: String,

    /// Product name
    pub name: String,

    /// Product price in base units (e.g., "86.14")
    pub price: String,

    /// Product category
    pub category: String,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Product material
    #[serde(default)]
    pub material: String,

    /// Discount percentage
    #[serde(default)]
    pub discount: Option<u8>,

    /// Average rating
    #[serde(default)]
    pub rating: Option<f32>,

    /// Number of reviews
    #[serde(default)]
    pub reviews: Option<u32>,

    /// Brand name
    #[serde(default)]
    pub brand: Option<String>,

    /// Stock flag
    #[serde(default)]
    pub in_stock: Option<bool>,
}

impl TryFrom<ProductFixture> for Product {
    type Error = CatalogError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let price = parse_price(&fixture.price)
            .ok_or_else(|| CatalogError::InvalidPrice(fixture.id.clone(), fixture.price.clone()))?;

        if let Some(discount) = fixture.discount.filter(|discount| *discount >= 100) {
            return Err(CatalogError::InvalidDiscount(fixture.id, discount));
        }

        Ok(Product {
            id: ProductId::new(fixture.id),
            name: fixture.name,
            price,
            category: fixture.category,
            image: fixture.image,
            description: fixture.description,
            material: fixture.material,
            discount: fixture.discount,
            rating: fixture.rating,
            reviews: fixture.reviews,
            brand: fixture.brand,
            in_stock: fixture.in_stock,
        })
    }
}

/// Parse a non-negative decimal price such as `"86.14"`.
///
/// Prices that would not survive cart persistence are rejected here rather than silently
/// rounded later.
fn parse_price(s: &str) -> Option<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .ok()
        .filter(|price| !price.is_sign_negative() && is_storable_price(*price))
}

/// Read-only product catalog
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from products in display order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateProduct`] if two products share an id.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut index = FxHashMap::default();

        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id.to_string()));
            }
        }

        Ok(Self { products, index })
    }

    /// Parse a catalog from a YAML fixture.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the YAML is malformed or a product is invalid.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        let products = fixture
            .products
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_products(products)
    }

    /// Load a catalog from a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Look up a product by id.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index
            .get(id)
            .and_then(|position| self.products.get(*position))
    }

    /// All products in display order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();

        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }

        categories
    }

    /// Products in `category`; [`ALL_CATEGORIES`] matches everything.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |product| category == ALL_CATEGORIES || product.category == category)
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const YAML: &str = r#"
products:
  - id: na-1
    name: Heavy Twill
    price: "86.14"
    category: Fabric
    material: Twill
    discount: 10
    in_stock: true
  - id: bt-1
    name: Oxford 600D
    price: "4"
    category: Bags Textile
  - id: na-2
    name: Lab Print
    price: "88.75"
    category: Fabric
"#;

    #[test]
    fn from_yaml_parses_products_in_order() -> TestResult {
        let catalog = Catalog::from_yaml(YAML)?;

        let ids: Vec<&str> = catalog
            .products()
            .iter()
            .map(|product| product.id.as_str())
            .collect();

        assert_eq!(ids, vec!["na-1", "bt-1", "na-2"]);

        let twill = catalog.get(&ProductId::new("na-1"));

        assert_eq!(twill.map(|product| product.price), Some(Decimal::new(8614, 2)));
        assert_eq!(twill.and_then(|product| product.discount), Some(10));
        assert_eq!(twill.and_then(|product| product.in_stock), Some(true));

        Ok(())
    }

    #[test]
    fn categories_are_distinct_in_first_seen_order() -> TestResult {
        let catalog = Catalog::from_yaml(YAML)?;

        assert_eq!(catalog.categories(), vec!["Fabric", "Bags Textile"]);

        Ok(())
    }

    #[test]
    fn in_category_filters_and_all_matches_everything() -> TestResult {
        let catalog = Catalog::from_yaml(YAML)?;

        assert_eq!(catalog.in_category("Fabric").count(), 2);
        assert_eq!(catalog.in_category(ALL_CATEGORIES).count(), 3);
        assert_eq!(catalog.in_category("Sewing Machine").count(), 0);

        Ok(())
    }

    #[test]
    fn get_unknown_id_is_none() -> TestResult {
        let catalog = Catalog::from_yaml(YAML)?;

        assert!(catalog.get(&ProductId::new("missing")).is_none());

        Ok(())
    }

    #[test]
    fn rejects_invalid_prices() {
        for price in ["abc", "-1", "", "12.345678901234567891"] {
            let yaml =
                format!("products:\n  - id: x\n    name: X\n    price: \"{price}\"\n    category: C\n");

            let result = Catalog::from_yaml(&yaml);

            assert!(
                matches!(result, Err(CatalogError::InvalidPrice(ref id, _)) if id == "x"),
                "expected InvalidPrice for {price:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_discount() {
        let yaml =
            "products:\n  - id: x\n    name: X\n    price: \"1\"\n    category: C\n    discount: 100\n";

        let result = Catalog::from_yaml(yaml);

        assert!(matches!(result, Err(CatalogError::InvalidDiscount(_, 100))));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let products = vec![
            Product::new("x", "X", Decimal::ONE, "C"),
            Product::new("x", "Y", Decimal::ONE, "C"),
        ];

        let result = Catalog::from_products(products);

        assert!(matches!(result, Err(CatalogError::DuplicateProduct(id)) if id == "x"));
    }

    #[test]
    fn from_file_reads_fixture() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("catalog.yml");
        std::fs::write(&path, YAML)?;

        let catalog = Catalog::from_file(&path)?;

        assert_eq!(catalog.len(), 3);

        Ok(())
    }
}
