//! supplyline server library entry.
//!
//! This crate wires config, auth, the SQLite-backed record store, the HTTP
//! surface, and observability into a cohesive service. It is intended to be
//! consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod auth;
pub mod config;
pub mod http;
pub mod obs;
pub mod ops;
pub mod router;
pub mod store;
