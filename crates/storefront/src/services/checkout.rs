//! Order placement.
//!
//! No payment is taken. A valid form against a non-empty cart produces a
//! confirmation and empties the cart.

use rand::Rng;
use tracing::info;
use zoco_core::{CheckoutError, CheckoutForm, CheckoutSummary, OrderConfirmation, OrderId};

use super::CartStore;

/// Validate the form and place an order for the current cart.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] for an empty cart, otherwise the
/// first form validation error. The cart is untouched on error.
pub async fn place_order(
    store: &mut CartStore,
    form: &CheckoutForm,
) -> Result<OrderConfirmation, CheckoutError> {
    if store.cart().is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let ship_to = form.validate()?;
    let summary = CheckoutSummary::from_cart(store.cart());

    let order_id = OrderId::new(format!("#ORD-{}", rand::rng().random_range(1000..10000)));
    info!(
        order_id = %order_id,
        total = %summary.total,
        items = summary.item_count,
        "Order placed"
    );
    store.clear().await;

    Ok(OrderConfirmation {
        order_id,
        total: summary.total,
        item_count: summary.item_count,
        ship_to,
    })
}
