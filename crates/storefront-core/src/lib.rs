//! Core types and trait definitions for the storefront backend.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The analytics computation lives here as a pure function over events so
//! every backend produces the same numbers.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod analytics;
pub mod error;
pub mod event;
pub mod record;
pub mod store;

pub use error::{Error, Result};
