//! # Error Types
//!
//! All error types for confidential shipment tracking.
//!
//! Every check is local and precedes any collaborator call or state
//! mutation; the first failing check aborts the whole operation with no
//! partial writes and no emitted event.

use crate::domain::value_objects::{HandleId, PartyId, ShipmentId};
use thiserror::Error;

// =============================================================================
// COMPUTE ERRORS
// =============================================================================

/// Errors returned by the Confidential Computation Service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComputeError {
    /// The service refused an attestation proof.
    #[error("attestation rejected: {0}")]
    AttestationRejected(String),

    /// A handle was presented that the service does not know.
    #[error("unknown handle: {0}")]
    UnknownHandle(HandleId),

    /// An operation was requested on a handle of the wrong ciphertext domain
    /// (e.g. ordering comparison on a bitwise tag).
    #[error("handle domain mismatch: {0}")]
    DomainMismatch(HandleId),

    /// An identity without view rights requested decryption of a
    /// non-public handle.
    #[error("view denied for {identity} on handle {handle}")]
    ViewDenied {
        /// The requested handle.
        handle: HandleId,
        /// The identity lacking view rights.
        identity: PartyId,
    },

    /// The service is unreachable or failed internally.
    #[error("compute service unavailable")]
    Unavailable,
}

// =============================================================================
// TRACKING ERRORS
// =============================================================================

/// Errors surfaced by shipment tracking operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackingError {
    /// No record exists for the given id.
    #[error("shipment not found: {0}")]
    NotFound(ShipmentId),

    /// A record already exists for the given id.
    #[error("shipment already exists: {0}")]
    AlreadyExists(ShipmentId),

    /// The caller is not one of the shipment's three parties.
    #[error("caller {caller} is not a party of shipment {shipment}")]
    Unauthorized {
        /// The shipment the caller tried to mutate.
        shipment: ShipmentId,
        /// The rejected caller.
        caller: PartyId,
    },

    /// A null identity, zero external handle, or empty proof was supplied.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// The operation is not legal in the record's current lifecycle state.
    #[error("cannot {action}: shipment {shipment} is {state}")]
    IllegalState {
        /// The shipment in the wrong state.
        shipment: ShipmentId,
        /// Name of the current lifecycle state.
        state: &'static str,
        /// The attempted action.
        action: &'static str,
    },

    /// The collaborator refused an attestation proof. Propagated unchanged.
    #[error("attestation rejected: {0}")]
    AttestationRejected(String),

    /// Any other collaborator failure.
    #[error("compute service error: {0}")]
    Compute(ComputeError),
}

impl TrackingError {
    /// Returns true if the error denotes an authorization failure.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns true if the error denotes an illegal lifecycle transition.
    #[must_use]
    pub fn is_illegal_state(&self) -> bool {
        matches!(self, Self::IllegalState { .. })
    }
}

impl From<ComputeError> for TrackingError {
    fn from(err: ComputeError) -> Self {
        match err {
            // Attestation refusals keep their identity across the boundary.
            ComputeError::AttestationRejected(reason) => Self::AttestationRejected(reason),
            other => Self::Compute(other),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
