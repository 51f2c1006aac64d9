//! # Integration Tests
//!
//! Cross-flow choreography through the public `ShipmentTrackingApi`, wired
//! with the in-memory compute, event log, and fixed clock adapters.

pub mod acl;
pub mod lifecycle;

use cf_shipment_tracking::prelude::*;

/// The three standing parties used across flows.
pub const SHIPPER: PartyId = PartyId::new([0x51; 20]);
/// Carrier party.
pub const CARRIER: PartyId = PartyId::new([0x52; 20]);
/// Consignee party.
pub const CONSIGNEE: PartyId = PartyId::new([0x53; 20]);
/// An identity that is no party to anything.
pub const OUTSIDER: PartyId = PartyId::new([0xEE; 20]);

/// A fully wired test service (in-memory adapters, clock pinned at 1000).
pub fn test_service() -> ShipmentTrackingService<InMemoryCompute, InMemoryEventLog, FixedClock> {
    create_test_service()
}

/// A standard ingestion request with the given deadline (Unix seconds).
pub fn sealed_meta(deadline: u64) -> MetaIngestion {
    MetaIngestion::new(
        SealedInput::new(
            InMemoryCompute::seal_word([0xC0; 32]),
            AttestationProof::new(vec![0x11; 32]),
        ),
        SealedInput::new(
            InMemoryCompute::seal_word([0xB0; 32]),
            AttestationProof::new(vec![0x22; 32]),
        ),
        SealedInput::new(
            InMemoryCompute::seal_scalar(deadline),
            AttestationProof::new(vec![0x33; 32]),
        ),
    )
}
