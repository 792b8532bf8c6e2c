//! Shopping cart store.
//!
//! # Invariants
//!
//! - Every line has `1 <= quantity <= MAX_LINE_QUANTITY`. Mutations that
//!   would go to zero or below remove the line instead.
//! - At most one line exists per `(product id, variant)` pair.
//! - No total is stored; see [`super::totals`].

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::notify::Notifier;
use super::persist::{Persisted, Storage, StoreKey};
use super::totals;
use crate::types::{ProductId, ProductSnapshot};

/// Storage key and schema version of the cart.
pub const CART_KEY: StoreKey = StoreKey::new("cart", 1);

/// Largest quantity a single line can hold.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// A product snapshot with a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product: ProductSnapshot,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_variant: Option<String>,
}

impl LineItem {
    fn matches(&self, key: &LineKey) -> bool {
        self.product.id == key.product_id && self.selected_variant == key.variant
    }
}

/// Identifies one cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: ProductId,
    pub variant: Option<String>,
}

impl LineKey {
    /// Key for a specific variant of a product.
    #[must_use]
    pub fn variant(product_id: ProductId, variant: impl Into<String>) -> Self {
        Self {
            product_id,
            variant: Some(variant.into()),
        }
    }
}

impl From<ProductId> for LineKey {
    fn from(product_id: ProductId) -> Self {
        Self {
            product_id,
            variant: None,
        }
    }
}

/// Persisted cart contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<LineItem>,
    /// Drawer visibility. Not persisted.
    #[serde(skip)]
    pub is_open: bool,
}

impl CartState {
    /// Add `quantity` of a product/variant, returning the line's new quantity.
    fn insert(&mut self, product: ProductSnapshot, variant: Option<String>, quantity: u32) -> u32 {
        let key = LineKey {
            product_id: product.id,
            variant,
        };

        if let Some(line) = self.items.iter_mut().find(|line| line.matches(&key)) {
            line.quantity = line.quantity.saturating_add(quantity).min(MAX_LINE_QUANTITY);
            return line.quantity;
        }

        self.items.push(LineItem {
            product,
            quantity,
            selected_variant: key.variant,
        });
        quantity
    }

    /// Restore the line invariants on loaded state.
    ///
    /// Lines with quantity 0 are dropped, quantities are capped at
    /// [`MAX_LINE_QUANTITY`] and lines sharing a `(product id, variant)` are
    /// merged into the first one. Returns whether anything changed.
    pub fn normalize(&mut self) -> bool {
        let before = self.items.len();
        let mut merged: Vec<LineItem> = Vec::with_capacity(before);
        let mut index: HashMap<LineKey, usize> = HashMap::new();
        let mut changed = false;

        for mut line in self.items.drain(..) {
            if line.quantity == 0 {
                changed = true;
                continue;
            }
            let key = LineKey {
                product_id: line.product.id,
                variant: line.selected_variant.clone(),
            };
            if let Some(kept) = index.get(&key).and_then(|&at| merged.get_mut(at)) {
                kept.quantity = kept
                    .quantity
                    .saturating_add(line.quantity)
                    .min(MAX_LINE_QUANTITY);
                changed = true;
                continue;
            }
            if line.quantity > MAX_LINE_QUANTITY {
                line.quantity = MAX_LINE_QUANTITY;
                changed = true;
            }
            index.insert(key, merged.len());
            merged.push(line);
        }

        self.items = merged;
        changed
    }

    fn remove(&mut self, key: &LineKey) -> Option<LineItem> {
        let index = self.items.iter().position(|line| line.matches(key))?;
        Some(self.items.remove(index))
    }

    fn set_quantity(&mut self, key: &LineKey, quantity: u32) -> bool {
        match self.items.iter_mut().find(|line| line.matches(key)) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }
}

/// Clamp a requested quantity into `1..=MAX_LINE_QUANTITY`.
fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.clamp(1, i64::from(MAX_LINE_QUANTITY))).unwrap_or(1)
}

/// The cart, persisted under [`CART_KEY`].
#[derive(Debug)]
pub struct CartStore {
    inner: Persisted<CartState>,
    notifier: Notifier,
}

impl CartStore {
    /// Open the cart, restoring any saved lines.
    pub fn open(storage: Arc<dyn Storage>, notifier: Notifier) -> Self {
        Self {
            inner: Persisted::open_with(storage, CART_KEY, CartState::normalize),
            notifier,
        }
    }

    /// Add a product with no variant.
    ///
    /// Quantities below 1 are treated as 1; the resulting line quantity is
    /// capped at [`MAX_LINE_QUANTITY`]. Returns the line's new quantity.
    pub fn add_item(&mut self, product: ProductSnapshot, quantity: i64) -> u32 {
        self.add_variant(product, None, quantity)
    }

    /// Add a product, optionally as a specific variant.
    pub fn add_variant(
        &mut self,
        product: ProductSnapshot,
        variant: Option<String>,
        quantity: i64,
    ) -> u32 {
        if quantity < 1 {
            tracing::debug!(product_id = %product.id, quantity, "Clamping non-positive add quantity to 1");
        }
        let quantity = clamp_quantity(quantity);
        let name = product.name.clone();

        let new_quantity = self
            .inner
            .mutate(|cart| cart.insert(product, variant, quantity));
        self.notifier.success(format!("{name} added to cart"));
        new_quantity
    }

    /// Remove one line. Returns whether anything was removed.
    pub fn remove_item(&mut self, key: impl Into<LineKey>) -> bool {
        let key = key.into();
        if !self.contains_line(&key) {
            return false;
        }

        let removed = self.inner.mutate(|cart| cart.remove(&key));
        match removed {
            Some(line) => {
                self.notifier
                    .info(format!("{} removed from cart", line.product.name));
                true
            }
            None => false,
        }
    }

    /// Remove every line of a product, whatever the variant.
    /// Returns how many lines were removed.
    pub fn remove_product(&mut self, product_id: ProductId) -> usize {
        let Some(name) = self
            .items()
            .iter()
            .find(|line| line.product.id == product_id)
            .map(|line| line.product.name.clone())
        else {
            return 0;
        };

        let removed = self.inner.mutate(|cart| {
            let before = cart.items.len();
            cart.items.retain(|line| line.product.id != product_id);
            before - cart.items.len()
        });
        self.notifier.info(format!("{name} removed from cart"));
        removed
    }

    /// Overwrite a line's quantity; `quantity <= 0` removes the line.
    ///
    /// Quantities above [`MAX_LINE_QUANTITY`] are capped. Returns whether a
    /// line was changed or removed.
    pub fn update_quantity(&mut self, key: impl Into<LineKey>, quantity: i64) -> bool {
        let key = key.into();
        if quantity <= 0 {
            return self.remove_item(key);
        }
        if !self.contains_line(&key) {
            return false;
        }

        let quantity = clamp_quantity(quantity);
        self.inner.mutate(|cart| cart.set_quantity(&key, quantity))
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        self.inner.mutate(|cart| cart.items.clear());
        self.notifier.info("Cart cleared");
    }

    /// Flip the drawer visibility flag.
    pub fn toggle_cart(&mut self) {
        self.inner.mutate(|cart| cart.is_open = !cart.is_open);
    }

    /// Set the drawer visibility flag.
    pub fn set_open(&mut self, open: bool) {
        self.inner.mutate(|cart| cart.is_open = open);
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.state().is_open
    }

    /// Current lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.inner.state().items
    }

    /// Full state, for persistence checks.
    #[must_use]
    pub fn state(&self) -> &CartState {
        self.inner.state()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        totals::total_items(self.items())
    }

    /// Sum of `price * quantity`, in the base currency.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        totals::total_price(self.items())
    }

    /// Quantity of a product across variants, 0 if absent.
    #[must_use]
    pub fn item_quantity(&self, product_id: ProductId) -> u32 {
        totals::item_quantity(self.items(), product_id)
    }

    /// Register a callback run after every cart mutation.
    pub fn subscribe(&mut self, subscriber: impl Fn(&CartState) + Send + Sync + 'static) {
        self.inner.subscribe(subscriber);
    }

    fn contains_line(&self, key: &LineKey) -> bool {
        self.items().iter().any(|line| line.matches(key))
    }
}
