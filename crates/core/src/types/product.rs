//! Product snapshots embedded in carts and lists.
//!
//! A snapshot is a denormalized copy of a catalog product taken when the
//! shopper acts on it. It is never refreshed: a later catalog price change
//! does not reach a line item already in the cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// Errors that can occur when building a [`ProductSnapshot`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    /// Price was below zero.
    #[error("product price cannot be negative (got {0})")]
    NegativePrice(Decimal),
    /// Name was empty.
    #[error("product name cannot be empty")]
    EmptyName,
}

/// Product data captured at the time it was added.
///
/// `price` is denominated in the base currency and is always `>= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SnapshotRecord")]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub reviews: u32,
}

/// Unvalidated wire form of a snapshot.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRecord {
    id: ProductId,
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    description: String,
    price: Decimal,
    #[serde(default)]
    image: String,
    #[serde(default)]
    badges: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    rating: f32,
    #[serde(default)]
    reviews: u32,
}

impl TryFrom<SnapshotRecord> for ProductSnapshot {
    type Error = ProductError;

    fn try_from(record: SnapshotRecord) -> Result<Self, Self::Error> {
        let mut snapshot = Self::new(record.id, record.name, record.price)?;
        snapshot.category = record.category;
        snapshot.description = record.description;
        snapshot.image = record.image;
        snapshot.badges = record.badges;
        snapshot.tags = record.tags;
        snapshot.rating = record.rating;
        snapshot.reviews = record.reviews;
        Ok(snapshot)
    }
}

impl ProductSnapshot {
    /// Create a snapshot with the required fields; display fields start empty.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError`] if the price is negative or the name is blank.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Decimal,
    ) -> Result<Self, ProductError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProductError::EmptyName);
        }
        if price.is_sign_negative() && !price.is_zero() {
            return Err(ProductError::NegativePrice(price));
        }

        Ok(Self {
            id,
            name,
            category: String::new(),
            description: String::new(),
            price,
            image: String::new(),
            badges: Vec::new(),
            tags: Vec::new(),
            rating: 0.0,
            reviews: 0,
        })
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Unit price in the base currency.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }
}
