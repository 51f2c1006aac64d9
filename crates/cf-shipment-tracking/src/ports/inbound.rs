//! # Driving Ports (API - Inbound)
//!
//! The public API of the tracking subsystem: four party-gated mutations and
//! three unrestricted read projections. The service implements
//! [`ShipmentTrackingApi`]; callers (gateway, tests) depend only on the
//! trait.

use crate::domain::entities::{DeliveryOutcome, EncryptedMeta};
use crate::domain::value_objects::{
    AttestationProof, ExternalCiphertext, PartyId, ShipmentId,
};
use crate::errors::TrackingError;
use async_trait::async_trait;

// =============================================================================
// INGESTION REQUEST
// =============================================================================

/// One externally encrypted field with its attestation proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedInput {
    /// Externally supplied ciphertext.
    pub value: ExternalCiphertext,
    /// Attestation evidence for `value`.
    pub proof: AttestationProof,
}

impl SealedInput {
    /// Creates a sealed input.
    #[must_use]
    pub fn new(value: ExternalCiphertext, proof: AttestationProof) -> Self {
        Self { value, proof }
    }

    /// Cheap well-formedness pre-check: non-zero value, non-empty proof.
    /// Runs before the expensive collaborator call.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.value.is_zero() && !self.proof.is_empty()
    }
}

/// The full meta-ingestion request: three sealed fields submitted together.
/// Ingestion is atomic; no record ever holds partially-ingested meta.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaIngestion {
    /// Sealed cargo identity tag.
    pub cargo: SealedInput,
    /// Sealed route tag.
    pub route: SealedInput,
    /// Sealed delivery deadline.
    pub deadline: SealedInput,
}

impl MetaIngestion {
    /// Creates an ingestion request.
    #[must_use]
    pub fn new(cargo: SealedInput, route: SealedInput, deadline: SealedInput) -> Self {
        Self {
            cargo,
            route,
            deadline,
        }
    }

    /// Pre-check all three sealed inputs.
    ///
    /// # Errors
    ///
    /// `InvalidInput` naming the first malformed field.
    pub fn validate(&self) -> Result<(), TrackingError> {
        if !self.cargo.is_well_formed() {
            return Err(TrackingError::InvalidInput("cargo: zero value or empty proof"));
        }
        if !self.route.is_well_formed() {
            return Err(TrackingError::InvalidInput("route: zero value or empty proof"));
        }
        if !self.deadline.is_well_formed() {
            return Err(TrackingError::InvalidInput(
                "deadline: zero value or empty proof",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// READ PROJECTIONS
// =============================================================================

/// Public projection of a shipment's participants and lifecycle flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParticipantsView {
    /// The creator of the record.
    pub shipper: PartyId,
    /// The transporting party.
    pub carrier: PartyId,
    /// The receiving party.
    pub consignee: PartyId,
    /// True once delivery has been marked.
    pub delivered: bool,
    /// True once meta ingestion has succeeded.
    pub have_meta: bool,
}

/// Projection of the delivery result handles.
///
/// `outcome` is `None` pre-delivery (the explicit rendering of the null
/// handle pair); no stale or garbage handle is ever returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResultHandlesView {
    /// True once delivery has been marked.
    pub delivered: bool,
    /// The delivery handles, present only after delivery.
    pub outcome: Option<DeliveryOutcome>,
}

// =============================================================================
// SHIPMENT TRACKING API (Primary Driving Port)
// =============================================================================

/// Primary API for confidential shipment tracking.
///
/// Mutations are admitted one at a time and commit atomically: either every
/// check passes and every state/handle update and emitted event commits
/// together, or nothing changes. Reads run concurrently and observe the last
/// committed state.
#[async_trait]
pub trait ShipmentTrackingApi: Send + Sync {
    /// Create a shipment record. The caller becomes the shipper.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` for a duplicate id; `InvalidInput` for a null carrier
    /// or consignee.
    async fn create(
        &self,
        id: ShipmentId,
        caller: PartyId,
        carrier: PartyId,
        consignee: PartyId,
    ) -> Result<(), TrackingError>;

    /// Ingest the three encrypted meta fields. One-time, any party.
    ///
    /// On success the record context holds "use" rights and all three
    /// parties hold "view" rights over the new handles.
    ///
    /// # Errors
    ///
    /// `NotFound` / `Unauthorized` from the party check; `IllegalState` on
    /// re-ingestion; `InvalidInput` on malformed sealed inputs;
    /// `AttestationRejected` from the collaborator, propagated unchanged.
    async fn ingest_meta(
        &self,
        id: ShipmentId,
        caller: PartyId,
        request: MetaIngestion,
    ) -> Result<EncryptedMeta, TrackingError>;

    /// Mark the shipment delivered and derive the SLA verdict
    /// `delivered_at ≤ deadline` (equality counts as on-time). One-time,
    /// any party, requires ingested meta. The verdict handle is marked
    /// publicly decryptable; every other handle stays view-restricted.
    ///
    /// # Errors
    ///
    /// `NotFound` / `Unauthorized` from the party check; `IllegalState`
    /// before meta or on re-delivery.
    async fn mark_delivered(
        &self,
        id: ShipmentId,
        caller: PartyId,
    ) -> Result<DeliveryOutcome, TrackingError>;

    /// Grant an additional identity view rights over every handle the
    /// record currently has. Monotonic; a no-op grant on a freshly created
    /// record still succeeds.
    ///
    /// # Errors
    ///
    /// `NotFound` / `Unauthorized` from the party check; `InvalidInput` for
    /// the null viewer.
    async fn grant_viewer(
        &self,
        id: ShipmentId,
        caller: PartyId,
        viewer: PartyId,
    ) -> Result<(), TrackingError>;

    /// Participants and lifecycle flags.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    async fn get_participants(&self, id: ShipmentId) -> Result<ParticipantsView, TrackingError>;

    /// The three meta handles, or `None` before ingestion.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    async fn get_encrypted_meta_handles(
        &self,
        id: ShipmentId,
    ) -> Result<Option<EncryptedMeta>, TrackingError>;

    /// The delivery flag and result handles (`None` pre-delivery).
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    async fn get_result_handles(&self, id: ShipmentId)
        -> Result<ResultHandlesView, TrackingError>;
}

// =============================================================================
// TESTS
// =============================================================================
