//! Ports layer for the state resolver.
//!
//! - Inbound (Driving) ports: API exposed to callers
//! - Outbound (Driven) ports: stores, cache, lock and clock

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
