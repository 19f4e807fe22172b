//! ZOCO storefront library.
//!
//! The storefront's data layer and JSON API as a library, so the server
//! binary, the `zoco` CLI, and the integration tests share one
//! implementation.
//!
//! - [`services::Api`] - Data access facade with local fallback
//! - [`services::CartStore`] - Persisted shopping cart
//! - [`routes::app`] - The axum application

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod blob;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod routes;
pub mod services;
pub mod state;
pub mod supabase;
