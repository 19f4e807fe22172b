//! Catalog operations with fixture fallback.

use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::{instrument, warn};
use uuid::Uuid;
use zoco_core::{NewProduct, Product, ProductFilter, ProductId};

use super::Api;
use super::uploads::LocalUpload;
use crate::fixtures;

/// Backend table holding the catalog.
pub const PRODUCTS_TABLE: &str = "products";

/// Length of locally generated product ids.
const LOCAL_ID_LEN: usize = 9;

/// Catalog operations, obtained from [`Api::products`].
#[derive(Debug, Clone, Copy)]
pub struct Products<'a> {
    api: &'a Api,
}

impl<'a> Products<'a> {
    pub(super) const fn new(api: &'a Api) -> Self {
        Self { api }
    }

    /// The whole catalog.
    ///
    /// Falls back to the fixture catalog, verbatim, when the backend fails
    /// or has no products.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Vec<Product> {
        match self.api.supabase().select_all::<Product>(PRODUCTS_TABLE).await {
            Ok(products) if !products.is_empty() => products,
            Ok(_) => {
                warn!("Backend returned no products (using fixture catalog)");
                fixtures::products()
            }
            Err(e) => {
                warn!(error = %e, "Product fetch failed (using fixture catalog)");
                fixtures::products()
            }
        }
    }

    /// A single product by slug.
    ///
    /// Falls back to the fixture catalog; `None` only if neither tier knows
    /// the slug.
    #[instrument(skip(self))]
    pub async fn get(&self, slug: &str) -> Option<Product> {
        match self
            .api
            .supabase()
            .select_single_eq::<Product>(PRODUCTS_TABLE, "slug", slug)
            .await
        {
            Ok(product) => Some(product),
            Err(e) => {
                warn!(error = %e, slug, "Product lookup failed (using fixture catalog)");
                fixtures::product_by_slug(slug)
            }
        }
    }

    /// Featured products, at most `limit`, in catalog order.
    pub async fn featured(&self, limit: usize) -> Vec<Product> {
        self.list()
            .await
            .into_iter()
            .filter(|p| p.featured)
            .take(limit)
            .collect()
    }

    /// Catalog filtered for the shop page.
    pub async fn filter(&self, filter: &ProductFilter) -> Vec<Product> {
        filter.apply(self.list().await)
    }

    /// Create a product.
    ///
    /// If the backend rejects or cannot be reached, the input is echoed back
    /// with a locally generated id. That product exists only in the caller's
    /// hands; it is not added to the fixture catalog.
    #[instrument(skip(self, product), fields(slug = %product.slug))]
    pub async fn create(&self, product: NewProduct) -> Product {
        match self
            .api
            .supabase()
            .insert_one::<NewProduct, Product>(PRODUCTS_TABLE, &product)
            .await
        {
            Ok(created) => created,
            Err(e) => {
                let id = local_product_id();
                warn!(error = %e, %id, "Create product failed (simulating success)");
                product.with_id(id)
            }
        }
    }

    /// Upload a product or content image and return its URL.
    ///
    /// Uploads to the configured storage bucket under a randomized object
    /// name. On failure the image is kept in memory and a local `/uploads/…`
    /// reference is returned instead.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_image(&self, file_name: &str, bytes: Vec<u8>, content_type: &str) -> String {
        let object = format!("{}-{}", Uuid::new_v4().simple(), sanitize_file_name(file_name));
        let supabase = self.api.supabase();
        let bucket = self.api.storage_bucket();

        let uploaded = match supabase
            .upload(bucket, &object, bytes.clone(), content_type)
            .await
        {
            Ok(()) => supabase.public_url(bucket, &object),
            Err(e) => Err(e),
        };

        match uploaded {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, file_name, "Image upload failed (using local preview)");
                self.api
                    .uploads()
                    .insert(LocalUpload {
                        file_name: file_name.to_string(),
                        content_type: content_type.to_string(),
                        bytes,
                    })
                    .await
            }
        }
    }
}

/// Random lowercase alphanumeric id for products created while offline.
fn local_product_id() -> ProductId {
    let id: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(LOCAL_ID_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    ProductId::new(id)
}

/// Keep object names URL- and filesystem-friendly.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.trim_matches(['-', '.']).is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
