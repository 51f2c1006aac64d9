//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for shipment tracking.
//! These are the interfaces between the domain and the outside world.
//!
//! - **Driving Ports (Inbound)**: `ShipmentTrackingApi`
//! - **Driven Ports (Outbound)**: `ConfidentialCompute`, `EventSink`, `TimeSource`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
