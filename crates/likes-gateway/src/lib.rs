//! likes gateway library entry.
//!
//! Wires configuration, the durable counter stores, the HTTP boundary and
//! operational endpoints around `likes_core::CounterService`. Consumed by the
//! binary (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod server;
pub mod store;
