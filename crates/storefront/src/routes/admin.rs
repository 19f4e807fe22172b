//! Admin console route handlers.
//!
//! Product creation, image upload, and content saves always succeed from the
//! caller's point of view; when the backend is unavailable the data facade
//! answers with a local substitute and logs a warning.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use zoco_core::{NewProduct, Order, Price, Product, SiteContent};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::{ContentSaved, Dashboard};
use crate::state::AppState;

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";

/// Add product form.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub price: Price,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

/// Response to an image upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Revenue, order and stock figures.
#[instrument(skip(state))]
pub async fn dashboard(State(state): State<AppState>) -> Json<Dashboard> {
    Json(state.api().orders().dashboard().await)
}

/// Recent orders.
#[instrument(skip(state))]
pub async fn orders(State(state): State<AppState>) -> Json<Vec<Order>> {
    Json(state.api().orders().list())
}

/// Create a product from the admin form.
#[instrument(skip(state, form), fields(name = %form.name))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(form): Json<ProductForm>,
) -> Result<(StatusCode, Json<Product>)> {
    if form.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    if form.category.trim().is_empty() {
        return Err(AppError::BadRequest("category is required".to_string()));
    }

    let new = NewProduct::from_admin_form(
        form.name.trim(),
        form.price,
        form.category.trim(),
        &form.description,
        form.image,
    );
    let product = state.api().products().create(new).await;
    add_breadcrumb("admin", "Created product", &[("slug", product.slug.as_str())]);
    Ok((StatusCode::CREATED, Json(product)))
}

/// Upload an image from a multipart form (`file` field).
#[instrument(skip(state, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("empty file".to_string()));
        }

        let url = state
            .api()
            .products()
            .upload_image(&file_name, bytes.to_vec(), &content_type)
            .await;
        return Ok(Json(UploadResponse { url }));
    }

    Err(AppError::BadRequest(format!("missing `{FILE_FIELD}` field")))
}

/// Save the site content.
#[instrument(skip(state, content))]
pub async fn save_content(
    State(state): State<AppState>,
    Json(content): Json<SiteContent>,
) -> Json<ContentSaved> {
    Json(state.api().settings().save_content(&content).await)
}
