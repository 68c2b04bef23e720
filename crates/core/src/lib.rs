//! Order Bridge Core - Shared types library.
//!
//! This crate provides common types used across all order-bridge components:
//! - `server` - HTTP intake service bridging external order sources to Shopify
//! - `integration-tests` - End-to-end tests against the server router
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe SKUs, quantities, emails,
//!   catalog identifiers, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
