//! ZOCO Core - Shared domain types.
//!
//! This crate provides the types used across all ZOCO components:
//! - `storefront` - Data access facade, cart store and JSON API
//! - `cli` - Command-line admin console
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no persistence. Cart aggregation lives here because it is a
//! pure function of the line items; persisting it is the storefront's job.
//!
//! # Modules
//!
//! - [`types`] - Ids, prices, catalog entries, cart, site content, orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
