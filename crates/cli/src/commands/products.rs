//! `zoco products ...`

use std::path::Path;

use tracing::info;
use zoco_core::{NewProduct, Price, ProductFilter};
use zoco_storefront::services::Api;

use super::{print_json, read_yaml};

/// List products, optionally filtered.
///
/// # Errors
///
/// Returns an error if output fails.
pub async fn list(
    api: &Api,
    category: Option<String>,
    max_price: Option<Price>,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = ProductFilter {
        category,
        min_price: None,
        max_price,
    };
    let products = api.products().filter(&filter).await;
    info!(count = products.len(), "Products listed");
    print_json(&products)
}

/// Show one product.
///
/// # Errors
///
/// Returns an error if no product has `slug`.
pub async fn get(api: &Api, slug: &str) -> Result<(), Box<dyn std::error::Error>> {
    let product = api
        .products()
        .get(slug)
        .await
        .ok_or_else(|| format!("Product not found: {slug}"))?;
    print_json(&product)
}

/// Create a product described by a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn create(api: &Api, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let new: NewProduct = read_yaml(file).await?;
    info!(slug = %new.slug, "Creating product");
    let product = api.products().create(new).await;
    print_json(&product)
}
