//! supplyline core: domain entities, validation, and the metrics calculator.
//!
//! This crate defines the vendor/purchase-order/snapshot data model, the
//! per-field input validation, and the performance aggregation shared by the
//! server and tooling. It intentionally carries no transport or storage
//! dependencies so it can be reused in multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `SupplyError`/`Result` so production
//! processes do not crash on malformed input.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;
pub mod model;

/// Shared result type.
pub use error::{Result, SupplyError};
