//! # Adapters Layer (Outer Hexagon)
//!
//! Concrete implementations of the driven ports. The compute adapter here is
//! the deterministic in-memory double; a deployment would swap in a bridge
//! to the real Confidential Computation Service without touching the core.

pub mod clock;
pub mod compute;
pub mod event_log;

pub use clock::*;
pub use compute::*;
pub use event_log::*;
