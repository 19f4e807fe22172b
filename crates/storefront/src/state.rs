//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::blob::BlobStore;
use crate::config::StorefrontConfig;
use crate::services::{Api, CartStore};
use crate::supabase::{SupabaseClient, SupabaseError};

/// Bucket used when no backend is configured; only named in logs then.
const DEFAULT_BUCKET: &str = "products";

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It owns the data facade and
/// the single cart, so every handler that touches the cart goes through the
/// same store and mutations are serialized by its lock.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: Api,
    cart: Mutex<CartStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `blobs` - Local persisted tier (cart and site content)
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(config: StorefrontConfig, blobs: Arc<dyn BlobStore>) -> Result<Self, SupabaseError> {
        let supabase = SupabaseClient::new(config.supabase.as_ref())?;
        let bucket = config
            .supabase
            .as_ref()
            .map_or(DEFAULT_BUCKET, |s| s.storage_bucket.as_str())
            .to_string();
        let api = Api::new(supabase, blobs, bucket);
        Ok(Self::with_api(config, api))
    }

    /// Create state around an existing facade, loading the cart from its blobs.
    #[must_use]
    pub fn with_api(config: StorefrontConfig, api: Api) -> Self {
        let cart = CartStore::load(api.blobs());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                cart: Mutex::new(cart),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the data facade.
    #[must_use]
    pub fn api(&self) -> &Api {
        &self.inner.api
    }

    /// The cart store lock.
    #[must_use]
    pub fn cart(&self) -> &Mutex<CartStore> {
        &self.inner.cart
    }
}
