//! Checkout totals and contact/shipping details.
//!
//! Shipping is currently free, so the order total equals the cart subtotal.
//! No payment is taken; placing an order only validates the form and
//! produces a confirmation.

use serde::{Deserialize, Serialize};

use super::cart::{Cart, CartItem};
use super::email::{Email, EmailError};
use super::id::OrderId;
use super::price::Price;

/// Flat shipping charge applied to every order.
pub const SHIPPING: Price = Price::ZERO;

/// Errors raised while placing an order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Order summary shown next to the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub items: Vec<CartItem>,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
    pub item_count: u32,
}

impl CheckoutSummary {
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Self {
        let subtotal = cart.total();
        Self {
            items: cart.items().to_vec(),
            subtotal,
            shipping: SHIPPING,
            total: subtotal + SHIPPING,
            item_count: cart.item_count(),
        }
    }

    /// Whether shipping is free for this order.
    #[must_use]
    pub fn free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// Checkout form as submitted by the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub newsletter: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub apartment: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
}

/// Contact and shipping details that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub email: Email,
    pub newsletter: bool,
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apartment: Option<String>,
    pub city: String,
    pub postal_code: String,
}

impl CheckoutForm {
    /// Check required fields and the email address.
    ///
    /// # Errors
    ///
    /// Returns the first missing required field, or an invalid email.
    pub fn validate(&self) -> Result<ShippingDetails, CheckoutError> {
        let email = Email::parse(&self.email)?;
        let first_name = required(&self.first_name, "firstName")?;
        let last_name = required(&self.last_name, "lastName")?;
        let address = required(&self.address, "address")?;
        let city = required(&self.city, "city")?;
        let postal_code = required(&self.postal_code, "postalCode")?;
        let apartment = self
            .apartment
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(ShippingDetails {
            email,
            newsletter: self.newsletter,
            name: format!("{first_name} {last_name}"),
            address: address.to_string(),
            apartment,
            city: city.to_string(),
            postal_code: postal_code.to_string(),
        })
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, CheckoutError> {
    let value = value.trim();
    if value.is_empty() {
        Err(CheckoutError::MissingField(field))
    } else {
        Ok(value)
    }
}

/// Result of a successfully placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub total: Price,
    pub item_count: u32,
    pub ship_to: ShippingDetails,
}
