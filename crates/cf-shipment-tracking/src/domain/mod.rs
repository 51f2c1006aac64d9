//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic for confidential shipment tracking.
//! NO I/O, NO async, NO external dependencies.
//!
//! - All types here are pure domain concepts.
//! - Dependencies point INWARD only (adapters depend on this, not vice versa).
//! - Nothing in this layer can inspect a ciphertext; it moves opaque handles.

pub mod entities;
pub mod invariants;
pub mod value_objects;

pub use entities::*;
pub use invariants::*;
pub use value_objects::*;
