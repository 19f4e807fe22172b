//! Hosted backend client (PostgREST tables + object storage).
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`; no SDK
//! - One-shot requests: no retry, no cancellation, a per-request timeout
//! - Offline mode when the connection values are missing: every call fails
//!   with [`SupabaseError::NotConfigured`] without touching the network
//!
//! Callers never surface these errors to users; the data access facade in
//! [`crate::services`] turns every failure into a fallback value.
//!
//! # Example
//!
//! ```rust,ignore
//! use zoco_storefront::supabase::SupabaseClient;
//!
//! let client = SupabaseClient::new(config.supabase.as_ref())?;
//! let products: Vec<Product> = client.select_all("products").await?;
//! let product: Product = client.select_single_eq("products", "slug", "black-hoodie").await?;
//! ```

mod client;

pub use client::SupabaseClient;

use thiserror::Error;

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// No backend URL/key configured (offline mode).
    #[error("backend not configured")]
    NotConfigured,

    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A single-row query matched no row.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The configured base URL cannot be joined with a request path.
    #[error("invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}
