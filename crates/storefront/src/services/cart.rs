//! Persisted cart store.
//!
//! Holds the single shopping cart plus the cart drawer's visibility flag.
//! The cart lines are written to the local blob store after every change;
//! the visibility flag is never persisted.
//!
//! Writes run on the blocking pool and are awaited before a mutation
//! returns, so callers holding the store's lock see writes land in order.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, warn};
use zoco_core::{AddOutcome, Cart, CartItem, Price, ProductId};

use crate::blob::{self, BlobStore, keys};

/// Snapshot of the cart as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total: Price,
    pub item_count: u32,
    pub is_open: bool,
}

/// The cart and its persistence.
#[derive(Debug)]
pub struct CartStore {
    cart: Cart,
    is_open: bool,
    blobs: Arc<dyn BlobStore>,
}

impl CartStore {
    /// Rehydrate the cart from the blob store.
    ///
    /// A missing blob starts an empty cart. So does an unreadable or
    /// malformed one, after logging the error.
    #[must_use]
    pub fn load(blobs: Arc<dyn BlobStore>) -> Self {
        let cart = match blob::load_json::<Vec<CartItem>>(blobs.as_ref(), keys::CART) {
            Ok(Some(items)) => Cart::from_items(items),
            Ok(None) => Cart::new(),
            Err(e) => {
                error!(error = %e, "Failed to load saved cart (starting empty)");
                Cart::new()
            }
        };
        debug!(lines = cart.line_count(), "Cart loaded");
        Self {
            cart,
            is_open: false,
            blobs,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Add a line; a new line also opens the cart drawer.
    pub async fn add_item(&mut self, item: CartItem) -> AddOutcome {
        let outcome = self.cart.add_item(item);
        if outcome == AddOutcome::Appended {
            self.is_open = true;
        }
        if outcome.changed() {
            self.persist().await;
        }
        outcome
    }

    /// Remove a line; returns `false` if it was not in the cart.
    pub async fn remove_item(&mut self, product_id: &ProductId, size: &str) -> bool {
        let removed = self.cart.remove_item(product_id, size);
        if removed {
            self.persist().await;
        }
        removed
    }

    /// Set a line's quantity; quantities below one are ignored.
    pub async fn update_quantity(
        &mut self,
        product_id: &ProductId,
        size: &str,
        quantity: i64,
    ) -> bool {
        let updated = self.cart.update_quantity(product_id, size, quantity);
        if updated {
            self.persist().await;
        }
        updated
    }

    pub async fn clear(&mut self) {
        self.cart.clear();
        self.persist().await;
    }

    pub const fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    #[must_use]
    pub fn view(&self) -> CartView {
        CartView {
            items: self.cart.items().to_vec(),
            total: self.cart.total(),
            item_count: self.cart.item_count(),
            is_open: self.is_open,
        }
    }

    /// Write the cart lines; a failed write keeps the in-memory change.
    async fn persist(&self) {
        let saved =
            blob::save_json_async(Arc::clone(&self.blobs), keys::CART, self.cart.items()).await;
        if let Err(e) = saved {
            warn!(error = %e, "Failed to persist cart");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::blob::{BlobError, MemoryBlobStore};

    fn item(product_id: &str, size: &str, quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductId::new(product_id),
            name: format!("Product {product_id}"),
            price: Price::from_cents(1000),
            image: String::new(),
            size: size.to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_cart_survives_reload() {
        let blobs: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
        let mut store = CartStore::load(Arc::clone(&blobs));
        store.add_item(item("1", "M", 2)).await;
        store.add_item(item("2", "L", 1)).await;
        store.update_quantity(&ProductId::new("2"), "L", 3).await;

        let reloaded = CartStore::load(blobs);
        assert_eq!(reloaded.cart(), store.cart());
        assert_eq!(reloaded.cart().item_count(), 5);
        assert!(!reloaded.is_open());
    }

    #[test]
    fn test_extreme_prices_total_without_overflow() {
        let blobs: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
        blobs
            .set(
                keys::CART,
                r#"[{"productId":"1","name":"Gold","price":1e28,"image":"","size":"M","quantity":10},
                    {"productId":"2","name":"Gold","price":1e28,"image":"","size":"L","quantity":7}]"#,
            )
            .unwrap();

        let view = CartStore::load(blobs).view();
        assert_eq!(view.item_count, 17);
        let largest = Price::parse("79228162514264337593543950335").unwrap();
        assert_eq!(view.total, largest);
    }

    #[test]
    fn test_corrupt_blob_yields_empty_cart() {
        let blobs: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
        blobs.set(keys::CART, "not json").unwrap();
        let store = CartStore::load(blobs);
        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_append_opens_drawer_merge_does_not() {
        let mut store = CartStore::load(Arc::new(MemoryBlobStore::new()));
        assert_eq!(store.add_item(item("1", "M", 1)).await, AddOutcome::Appended);
        assert!(store.is_open());

        store.set_open(false);
        assert_eq!(store.add_item(item("1", "M", 1)).await, AddOutcome::Merged);
        assert!(!store.is_open());
        assert_eq!(store.add_item(item("1", "M", 0)).await, AddOutcome::Ignored);
    }

    #[tokio::test]
    async fn test_clear_is_persisted() {
        let blobs: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
        let mut store = CartStore::load(Arc::clone(&blobs));
        store.add_item(item("1", "M", 1)).await;
        store.clear().await;

        assert_eq!(blobs.get(keys::CART).unwrap().as_deref(), Some("[]"));
        assert!(CartStore::load(blobs).cart().is_empty());
    }

    #[derive(Debug)]
    struct ReadOnlyStore;

    impl BlobStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, BlobError> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), BlobError> {
            Err(std::io::Error::other("read-only").into())
        }
        fn remove(&self, _key: &str) -> Result<(), BlobError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_persist_failure_keeps_mutation() {
        let mut store = CartStore::load(Arc::new(ReadOnlyStore));
        store.add_item(item("1", "M", 2)).await;
        assert_eq!(store.view().item_count, 2);
    }
}
