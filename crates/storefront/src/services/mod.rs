//! Data access facade and storefront services.
//!
//! # Fallback model
//!
//! Every resource operation first tries the hosted backend. On any failure
//! (offline mode, network error, error status, empty or missing result) it
//! logs a warning and answers from the local tier instead:
//!
//! | Resource | Fallback |
//! |----------|----------|
//! | product list / lookup | built-in fixture catalog |
//! | product create | input echoed back with a locally generated id |
//! | image upload | ephemeral in-process upload, served under `/uploads` |
//! | site content | local blob, then built-in default content |
//!
//! Callers therefore always get a usable value and never see a backend
//! error. Local writes are never replayed upstream once the backend comes
//! back; the two tiers are not reconciled.
//!
//! # Services
//!
//! - [`products`] - Catalog reads, admin product creation, image upload
//! - [`orders`] - Order list and admin dashboard
//! - [`settings`] - Site content get/save
//! - [`uploads`] - Ephemeral local upload registry
//! - [`cart`] - Persisted cart store
//! - [`checkout`] - Order placement

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod settings;
pub mod uploads;

use std::sync::Arc;

pub use cart::{CartStore, CartView};
pub use orders::{Dashboard, Orders};
pub use products::Products;
pub use settings::{ContentSaved, Settings};
pub use uploads::{LocalUpload, LocalUploads};

use crate::blob::BlobStore;
use crate::supabase::SupabaseClient;

/// Entry point to the storefront's data.
///
/// Cheaply cloneable; resource operations are grouped behind
/// [`Api::products`], [`Api::orders`] and [`Api::settings`].
#[derive(Clone, Debug)]
pub struct Api {
    inner: Arc<ApiInner>,
}

#[derive(Debug)]
struct ApiInner {
    supabase: SupabaseClient,
    blobs: Arc<dyn BlobStore>,
    uploads: LocalUploads,
    storage_bucket: String,
}

impl Api {
    /// Create the facade.
    ///
    /// * `supabase` - Remote tier (may be offline)
    /// * `blobs` - Local persisted tier
    /// * `storage_bucket` - Bucket that receives uploaded images
    #[must_use]
    pub fn new(
        supabase: SupabaseClient,
        blobs: Arc<dyn BlobStore>,
        storage_bucket: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(ApiInner {
                supabase,
                blobs,
                uploads: LocalUploads::new(),
                storage_bucket: storage_bucket.into(),
            }),
        }
    }

    /// Catalog operations.
    #[must_use]
    pub const fn products(&self) -> Products<'_> {
        Products::new(self)
    }

    /// Order operations.
    #[must_use]
    pub const fn orders(&self) -> Orders<'_> {
        Orders::new(self)
    }

    /// Site content operations.
    #[must_use]
    pub const fn settings(&self) -> Settings<'_> {
        Settings::new(self)
    }

    /// Uploads kept locally because the backend was unavailable.
    #[must_use]
    pub fn uploads(&self) -> &LocalUploads {
        &self.inner.uploads
    }

    /// The local persisted tier.
    #[must_use]
    pub fn blobs(&self) -> Arc<dyn BlobStore> {
        Arc::clone(&self.inner.blobs)
    }

    /// Whether a hosted backend is configured.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.inner.supabase.is_configured()
    }

    fn supabase(&self) -> &SupabaseClient {
        &self.inner.supabase
    }

    fn storage_bucket(&self) -> &str {
        &self.inner.storage_bucket
    }
}
