//! # Value Objects
//!
//! Immutable domain primitives for confidential shipment tracking.
//! These types represent concepts that are defined by their value, not identity.
//!
//! Ciphertext handles are *opaque*: they reference an encrypted value held by
//! the Confidential Computation Service and carry no plaintext. Each handle
//! kind gets its own type so a cargo-tag handle can never be passed where a
//! deadline handle is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

// =============================================================================
// PARTY ID (20 bytes)
// =============================================================================

/// A 20-byte party identity (shipper, carrier, consignee, or granted viewer).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PartyId(pub [u8; 20]);

impl PartyId {
    /// The null identity (0x0000...0000). Never a valid participant.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates a party id from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates a party id from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == 20 {
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(slice);
            Some(Self(bytes))
        } else {
            None
        }
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the null identity.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "...")?;
        for byte in &self.0[18..] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 20]> for PartyId {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

// =============================================================================
// CONTEXT ID (20 bytes)
// =============================================================================

/// Identity of a computation context holding "use" rights over handles.
///
/// The tracking service itself is a context: it must be able to hand its own
/// handles back to the Confidential Computation Service for comparison.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContextId(pub [u8; 20]);

impl ContextId {
    /// The zero context.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates a context id from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Debug for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx:0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

// =============================================================================
// SHIPMENT ID
// =============================================================================

/// Unique shipment key. Immutable once created.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ShipmentId(pub u64);

impl ShipmentId {
    /// Creates a shipment id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ShipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shipment#{}", self.0)
    }
}

impl fmt::Display for ShipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ShipmentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// =============================================================================
// HANDLE ID (32 bytes, untyped)
// =============================================================================

/// A 32-byte opaque reference to a ciphertext held by the Confidential
/// Computation Service.
///
/// This is the untyped form used at the collaborator boundary; domain code
/// works with the typed [`Handle<K>`] wrappers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HandleId(pub [u8; 32]);

impl HandleId {
    /// The zero handle. Marks "no ciphertext".
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates a handle id from a 32-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Creates a handle id from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == 32 {
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(slice);
            Some(Self(bytes))
        } else {
            None
        }
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns true if this is the zero handle.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "...")?;
        for byte in &self.0[28..] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 32]> for HandleId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

// =============================================================================
// TYPED HANDLES
// =============================================================================

/// Marker for the kind of ciphertext a handle refers to.
pub trait CipherKind: Copy + Eq + std::hash::Hash + fmt::Debug + Send + Sync + 'static {
    /// Short kind name, used in Debug output.
    const NAME: &'static str;
}

/// Encrypted cargo identity tag (equality/bitwise only, never arithmetic).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct CargoTag;

/// Encrypted route tag (equality/bitwise only, never arithmetic).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct RouteTag;

/// Encrypted delivery deadline (comparable scalar).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Deadline;

/// Encrypted delivery timestamp (comparable scalar).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DeliveredAt;

/// Encrypted SLA verdict (boolean domain).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Verdict;

impl CipherKind for CargoTag {
    const NAME: &'static str = "cargo-tag";
}
impl CipherKind for RouteTag {
    const NAME: &'static str = "route-tag";
}
impl CipherKind for Deadline {
    const NAME: &'static str = "deadline";
}
impl CipherKind for DeliveredAt {
    const NAME: &'static str = "delivered-at";
}
impl CipherKind for Verdict {
    const NAME: &'static str = "verdict";
}

/// A ciphertext handle tagged with its kind.
///
/// The tag exists only at the type level; the wire representation is the
/// bare [`HandleId`]. Mixing kinds (e.g. comparing a cargo tag against a
/// deadline) fails to compile.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle<K: CipherKind> {
    id: HandleId,
    #[serde(skip)]
    _kind: PhantomData<K>,
}

impl<K: CipherKind> Handle<K> {
    /// Wraps an untyped handle id.
    #[must_use]
    pub const fn new(id: HandleId) -> Self {
        Self {
            id,
            _kind: PhantomData,
        }
    }

    /// Returns the untyped handle id.
    #[must_use]
    pub const fn id(&self) -> HandleId {
        self.id
    }

    /// Returns true if this is the zero handle.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.id.is_zero()
    }
}

impl<K: CipherKind> Clone for Handle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: CipherKind> Copy for Handle<K> {}

impl<K: CipherKind> PartialEq for Handle<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<K: CipherKind> Eq for Handle<K> {}

impl<K: CipherKind> std::hash::Hash for Handle<K> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<K: CipherKind> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", K::NAME, self.id)
    }
}

/// Handle to the encrypted cargo identity tag.
pub type CargoTagHandle = Handle<CargoTag>;
/// Handle to the encrypted route tag.
pub type RouteTagHandle = Handle<RouteTag>;
/// Handle to the encrypted delivery deadline.
pub type DeadlineHandle = Handle<Deadline>;
/// Handle to the encrypted delivery timestamp.
pub type DeliveredAtHandle = Handle<DeliveredAt>;
/// Handle to the encrypted SLA verdict.
pub type VerdictHandle = Handle<Verdict>;

// =============================================================================
// EXTERNAL CIPHERTEXT + ATTESTATION PROOF
// =============================================================================

/// A ciphertext value supplied from outside the trust boundary.
///
/// Meaningless to the core on its own; it becomes a [`HandleId`] only after
/// the Confidential Computation Service verifies the accompanying proof.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ExternalCiphertext(pub [u8; 32]);

impl ExternalCiphertext {
    /// The zero value. Rejected at ingestion.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates an external ciphertext from a 32-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns true if this is the zero value.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for ExternalCiphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ext:0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "...")
    }
}

/// Attestation evidence binding an external ciphertext to the submitting
/// context. Verified by the collaborator, never inspected by the core.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttestationProof(Vec<u8>);

impl AttestationProof {
    /// Creates a proof from raw bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the proof bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns true if the proof is empty. Empty proofs are rejected before
    /// the collaborator is ever invoked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Proof length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Debug for AttestationProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "proof[{} bytes]", self.0.len())
    }
}

impl From<Vec<u8>> for AttestationProof {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

// =============================================================================
// TRANSPORT TOKEN
// =============================================================================

/// Fixed-size opaque token form of a handle, used in event payloads and
/// query results. Produced by the collaborator's `to_transport_bytes`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TransportToken(pub [u8; 32]);

impl TransportToken {
    /// Creates a token from a 32-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for TransportToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tok:0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "...")
    }
}

// =============================================================================
// TESTS
// =============================================================================
