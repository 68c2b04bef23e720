//! Core types for order-bridge.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod quantity;
pub mod sku;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{ProductId, VariantId};
pub use quantity::{Quantity, QuantityError};
pub use sku::{Sku, SkuError};
pub use status::FinancialStatus;
