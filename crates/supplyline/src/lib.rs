//! Top-level facade crate for supplyline.
//!
//! Re-exports core types and the server library so users can depend on a single crate.

pub mod core {
    pub use supplyline_core::*;
}

pub mod server {
    pub use supplyline_server::*;
}
