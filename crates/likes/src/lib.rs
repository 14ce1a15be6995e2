//! Top-level facade crate for the like counter.
//!
//! Re-exports the core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use likes_core::*;
}

pub mod gateway {
    pub use likes_gateway::*;
}
