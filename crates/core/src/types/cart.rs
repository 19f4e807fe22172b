//! Shopping cart aggregation.
//!
//! A [`Cart`] is an ordered list of [`CartItem`]s keyed by
//! `(product_id, size)`. Adding a line that already exists merges quantities
//! instead of duplicating the line, and every line always has a quantity of
//! at least one.
//!
//! Totals are derived on every read rather than cached.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub size: String,
    pub quantity: u32,
}

impl CartItem {
    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }

    fn is_line(&self, product_id: &ProductId, size: &str) -> bool {
        self.product_id == *product_id && self.size == size
    }
}

/// What [`Cart::add_item`] did with the incoming line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOutcome {
    /// A new line was appended; the cart drawer should open.
    Appended,
    /// The quantity was added to an existing line.
    Merged,
    /// The incoming quantity was zero; nothing changed.
    Ignored,
}

impl AddOutcome {
    /// Whether the cart changed.
    #[must_use]
    pub const fn changed(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Ordered cart contents.
///
/// Serializes as a bare JSON array of items, the format of the persisted
/// cart blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild a cart from persisted lines.
    ///
    /// Lines with a zero quantity are dropped and duplicate
    /// `(product_id, size)` lines are merged, so a hand-edited blob cannot
    /// break the cart's invariants.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            cart.add_item(item);
        }
        cart
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Find the line for `(product_id, size)`.
    #[must_use]
    pub fn get(&self, product_id: &ProductId, size: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.is_line(product_id, size))
    }

    /// Add a line, merging with an existing `(product_id, size)` line.
    pub fn add_item(&mut self, item: CartItem) -> AddOutcome {
        if item.quantity == 0 {
            return AddOutcome::Ignored;
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.is_line(&item.product_id, &item.size))
        {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            return AddOutcome::Merged;
        }

        self.items.push(item);
        AddOutcome::Appended
    }

    /// Remove the line for `(product_id, size)`.
    ///
    /// Returns `false` (and changes nothing) if there is no such line.
    pub fn remove_item(&mut self, product_id: &ProductId, size: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| !i.is_line(product_id, size));
        self.items.len() != before
    }

    /// Replace a line's quantity.
    ///
    /// Quantities below one are rejected, not clamped: the cart is left
    /// untouched and `false` is returned. Unknown lines also return `false`.
    pub fn update_quantity(&mut self, product_id: &ProductId, size: &str, quantity: i64) -> bool {
        let Ok(quantity) = u32::try_from(quantity) else {
            return false;
        };
        if quantity < 1 {
            return false;
        }

        match self.items.iter_mut().find(|i| i.is_line(product_id, size)) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Σ price × quantity.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Σ quantity.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, item| count.saturating_add(item.quantity))
    }
}
