//! Cart route handlers.
//!
//! There is one cart per storefront process; it lives in [`AppState`] and
//! every response carries the full cart view.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use zoco_core::{AddOutcome, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::CartView;
use crate::state::AppState;

/// Add to cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub slug: String,
    pub size: String,
    #[serde(default = "one")]
    pub quantity: u32,
}

const fn one() -> u32 {
    1
}

/// Update quantity request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub size: String,
    pub quantity: i64,
}

/// Remove line query parameters.
#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
    pub product_id: ProductId,
    pub size: String,
}

/// Cart drawer visibility request.
#[derive(Debug, Deserialize)]
pub struct OpenRequest {
    pub open: bool,
}

/// Response to an add.
#[derive(Debug, Serialize)]
pub struct AddToCartResponse {
    pub outcome: AddOutcome,
    pub cart: CartView,
}

/// Current cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    Json(state.cart().lock().await.view())
}

/// Add a product in a given size.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(req): Json<AddToCartRequest>,
) -> Result<Json<AddToCartResponse>> {
    let product = state
        .api()
        .products()
        .get(&req.slug)
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {}", req.slug)))?;
    let mut item = product.to_cart_item(&req.size, 1).ok_or_else(|| {
        AppError::BadRequest(format!("{} is not available in size {}", product.name, req.size))
    })?;
    // A zero quantity reaches the cart, which reports it as ignored.
    item.quantity = req.quantity;

    add_breadcrumb(
        "cart",
        "Added to cart",
        &[("product", product.slug.as_str()), ("size", req.size.as_str())],
    );

    let mut cart = state.cart().lock().await;
    let outcome = cart.add_item(item).await;
    Ok(Json(AddToCartResponse {
        outcome,
        cart: cart.view(),
    }))
}

/// Set a line's quantity. Quantities below one leave the cart unchanged.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<UpdateCartRequest>,
) -> Json<CartView> {
    let mut cart = state.cart().lock().await;
    cart.update_quantity(&req.product_id, &req.size, req.quantity).await;
    Json(cart.view())
}

/// Remove a line; removing an absent line is not an error.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    query: std::result::Result<Query<RemoveQuery>, QueryRejection>,
) -> Result<Json<CartView>> {
    let Query(query) = query?;
    let mut cart = state.cart().lock().await;
    cart.remove_item(&query.product_id, &query.size).await;
    Ok(Json(cart.view()))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<CartView> {
    let mut cart = state.cart().lock().await;
    cart.clear().await;
    Json(cart.view())
}

/// Open or close the cart drawer.
#[instrument(skip(state))]
pub async fn set_open(
    State(state): State<AppState>,
    Json(req): Json<OpenRequest>,
) -> Json<CartView> {
    let mut cart = state.cart().lock().await;
    cart.set_open(req.open);
    Json(cart.view())
}
