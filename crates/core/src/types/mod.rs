//! Core types for ZOCO.
//!
//! This module provides type-safe wrappers and domain records for the
//! storefront.

pub mod cart;
pub mod checkout;
pub mod content;
pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod product;

pub use cart::{AddOutcome, Cart, CartItem};
pub use checkout::{
    CheckoutError, CheckoutForm, CheckoutSummary, OrderConfirmation, SHIPPING, ShippingDetails,
};
pub use content::{Category, Hero, SiteContent};
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{Order, OrderStatus};
pub use price::{Price, PriceError};
pub use product::{NewProduct, Product, ProductFilter};
