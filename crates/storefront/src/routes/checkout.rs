//! Checkout route handlers.

use axum::{Json, extract::State};
use tracing::instrument;
use zoco_core::{CheckoutForm, CheckoutSummary, OrderConfirmation};

use crate::error::Result;
use crate::services::checkout::place_order;
use crate::state::AppState;

/// Order summary for the current cart.
#[instrument(skip(state))]
pub async fn summary(State(state): State<AppState>) -> Json<CheckoutSummary> {
    let cart = state.cart().lock().await;
    Json(CheckoutSummary::from_cart(cart.cart()))
}

/// Place an order for the current cart.
#[instrument(skip(state, form))]
pub async fn place(
    State(state): State<AppState>,
    Json(form): Json<CheckoutForm>,
) -> Result<Json<OrderConfirmation>> {
    let mut cart = state.cart().lock().await;
    let confirmation = place_order(&mut cart, &form).await?;
    Ok(Json(confirmation))
}
