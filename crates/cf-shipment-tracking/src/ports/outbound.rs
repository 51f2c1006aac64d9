//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the tracking subsystem depends on. External adapters implement
//! these traits to provide:
//! - Confidential computation (proof verification, encrypted comparison, ACL)
//! - Event publication
//! - The execution environment's clock
//!
//! Dependencies point INWARD: adapters implement these traits, the service
//! calls them. The collaborator is an injected capability, never ambient
//! state, so tests can substitute doubles that simulate proof rejection and
//! deterministic comparisons.

use crate::domain::value_objects::{
    AttestationProof, ContextId, ExternalCiphertext, HandleId, PartyId, TransportToken,
};
use crate::errors::ComputeError;
use crate::events::EventEnvelope;
use async_trait::async_trait;

// =============================================================================
// CIPHERTEXT DOMAIN
// =============================================================================

/// Ciphertext domain of a submitted or derived value.
///
/// The collaborator types its ciphertexts; the core declares the expected
/// domain when submitting so a tag can never be used in an ordering
/// comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CipherDomain {
    /// 256-bit opaque word; equality/bitwise only (cargo and route tags).
    Word256,
    /// 64-bit scalar; ordering comparisons permitted (deadline, timestamp).
    Scalar64,
    /// Boolean (SLA verdict).
    Flag,
}

// =============================================================================
// CONFIDENTIAL COMPUTE (external collaborator)
// =============================================================================

/// Interface to the Confidential Computation Service.
///
/// The core forwards raw bytes and attestation, stores only the returned
/// handles, and never calls any arithmetic or decryption primitive beyond
/// the operations below. Calls are synchronous, side-effect-bearing steps of
/// the enclosing operation: if one fails, the operation aborts with no
/// partial core state.
#[async_trait]
pub trait ConfidentialCompute: Send + Sync {
    /// Verify an attestation proof and internalize an externally supplied
    /// ciphertext.
    ///
    /// # Arguments
    ///
    /// * `value` - Externally supplied ciphertext bytes
    /// * `proof` - Attestation evidence bound to the submitting context
    /// * `domain` - Expected ciphertext domain of the value
    ///
    /// # Errors
    ///
    /// `AttestationRejected` if the proof does not verify.
    async fn submit_external(
        &self,
        value: ExternalCiphertext,
        proof: &AttestationProof,
        domain: CipherDomain,
    ) -> Result<HandleId, ComputeError>;

    /// Encrypt a trusted plaintext scalar (a trusted-input cast, not an
    /// external claim; the value originates from the execution
    /// environment).
    async fn encrypt_trusted(&self, plain: u64) -> Result<HandleId, ComputeError>;

    /// Encrypted non-strict comparison `a ≤ b` over two scalar handles.
    /// Returns a boolean-domain handle.
    ///
    /// # Errors
    ///
    /// `UnknownHandle` for a handle the service does not hold;
    /// `DomainMismatch` if either operand is not a scalar.
    async fn compare_le(&self, a: HandleId, b: HandleId) -> Result<HandleId, ComputeError>;

    /// Grant a computation context "use" rights over a handle (required for
    /// later operations such as comparison).
    async fn grant_use(&self, handle: HandleId, context: ContextId) -> Result<(), ComputeError>;

    /// Grant an identity "view" rights over a handle, allowing it to request
    /// decryption out-of-band. Grants are additive and never revoked.
    async fn grant_view(&self, handle: HandleId, identity: PartyId) -> Result<(), ComputeError>;

    /// Mark a handle publicly decryptable. One-way policy flag.
    async fn mark_public(&self, handle: HandleId) -> Result<(), ComputeError>;

    /// Fixed-size opaque token form of a handle, for event payloads and
    /// query results. Pure.
    fn to_transport_bytes(&self, handle: HandleId) -> TransportToken;
}

// =============================================================================
// EVENT SINK
// =============================================================================

/// Publishing side of the event log.
///
/// Transport is out of scope for the core; an in-memory adapter is provided
/// for tests and single-process wiring.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Publish one committed-operation event.
    async fn publish(&self, event: EventEnvelope);
}

// =============================================================================
// TIME SOURCE
// =============================================================================

/// The execution environment's clock.
///
/// `mark_delivered` reads the delivery timestamp here: a trusted input, not
/// a caller-supplied claim.
pub trait TimeSource: Send + Sync {
    /// Current time as Unix seconds.
    fn now_unix(&self) -> u64;
}
