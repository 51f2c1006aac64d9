//! # CipherFreight Shipment Tracking - Confidential Lifecycle Subsystem
//!
//! ## Purpose
//!
//! Maintains confidential shipment records shared among three parties
//! (shipper, carrier, consignee) and produces a privacy-preserving verdict
//! ("delivered on time?") without revealing cargo identity, route, deadline,
//! or delivery timestamp in the clear. The core enforces ordering and
//! authorization rules over data it can never inspect: every check is
//! expressible without decrypting anything, and only the final boolean
//! verdict may become publicly readable.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | One record per id | `domain/entities.rs` - `ShipmentRegistry::insert()` |
//! | INVARIANT-2 | Meta ingestion fires at most once | `domain/entities.rs` - `ShipmentRecord::ingest_meta()` |
//! | INVARIANT-3 | Delivery fires at most once and requires meta | `domain/entities.rs` - `ShipmentRecord::mark_delivered()` |
//! | INVARIANT-4 | Only the three parties mutate a record | `service.rs` - `require_party()` |
//! | INVARIANT-5 | View grants are additive, never revoked | no removal path exists anywhere |
//! | INVARIANT-6 | Mutations commit atomically (state + event) or not at all | `service.rs` - checks precede collaborator calls precede commit |
//!
//! ## Architecture
//!
//! Hexagonal: a pure domain (records, explicit lifecycle states, registry
//! arena), driving port `ShipmentTrackingApi`, driven ports
//! `ConfidentialCompute` / `EventSink` / `TimeSource`, and in-memory
//! adapters for all three driven ports. The Confidential Computation
//! Service is an injected capability: the core forwards bytes and
//! attestation, stores opaque handles, and never touches plaintext.
//!
//! ## Usage Example
//!
//! ```ignore
//! use cf_shipment_tracking::prelude::*;
//!
//! let service = ShipmentTrackingService::new(compute, events, clock, ServiceConfig::default());
//!
//! service.create(id, shipper, carrier, consignee).await?;
//! service.ingest_meta(id, carrier, sealed_meta).await?;
//! let outcome = service.mark_delivered(id, consignee).await?;
//! // outcome.sla_ok is publicly decryptable; everything else stays restricted.
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        DeliveryOutcome, EncryptedMeta, LifecycleState, Participants, ShipmentRecord,
        ShipmentRegistry,
    };

    // Value objects
    pub use crate::domain::value_objects::{
        AttestationProof, CargoTagHandle, ContextId, DeadlineHandle, DeliveredAtHandle,
        ExternalCiphertext, Handle, HandleId, PartyId, RouteTagHandle, ShipmentId,
        TransportToken, VerdictHandle,
    };

    // Invariants
    pub use crate::domain::invariants::{
        check_record_invariants, InvariantCheckResult, InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::{
        MetaIngestion, ParticipantsView, ResultHandlesView, SealedInput, ShipmentTrackingApi,
    };
    pub use crate::ports::outbound::{
        CipherDomain, ConfidentialCompute, EventSink, TimeSource,
    };

    // Events
    pub use crate::events::{
        topics, DeliveryMarkedPayload, EventEnvelope, MetaIngestedPayload,
        ShipmentCreatedPayload, TrackingEvent, ViewerGrantedPayload,
    };

    // Errors
    pub use crate::errors::{ComputeError, TrackingError};

    // Adapters
    pub use crate::adapters::{FixedClock, InMemoryCompute, InMemoryEventLog, SystemClock};

    // Service
    pub use crate::service::{
        create_test_service, ServiceConfig, ServiceStats, ShipmentTrackingService,
    };
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Shipment Tracking";

// =============================================================================
// TESTS
// =============================================================================
