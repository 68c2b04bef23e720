//! Order Bridge server library.
//!
//! This crate provides the order intake service as a library, allowing the
//! router to be exercised in tests and reused.
//!
//! # Pipeline
//!
//! Every endpoint runs the same linear pipeline, parameterized by an
//! authentication scheme list, a payload shape, and a variant resolution
//! strategy:
//!
//! 1. [`auth`] - authenticate the caller and resolve shop + access token
//! 2. [`pipeline::normalize`] - parse and validate the inbound payload
//! 3. [`pipeline::resolve`] - map SKUs to catalog variant identifiers
//! 4. [`pipeline::submit`] - build and submit the Shopify order
//! 5. [`error`] / [`routes::envelope`] - map the outcome to a JSON envelope

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod routes;
pub mod shopify;
pub mod state;

pub use routes::app;
pub use state::AppState;
