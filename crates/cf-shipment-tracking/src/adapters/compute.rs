//! # In-Memory Compute Adapter
//!
//! Deterministic Confidential Computation Service double for testing and
//! single-process wiring. Plaintexts live behind this adapter boundary only;
//! the core sees nothing but [`HandleId`]s.
//!
//! Handle ids are Keccak-256 digests salted with a monotonic counter, so two
//! submissions of the same bytes still yield distinct handles. Grant sets are
//! append-only: there is no removal API, matching the non-revocable trust
//! model. The public flag is one-way.

use crate::domain::value_objects::{
    AttestationProof, ContextId, ExternalCiphertext, HandleId, PartyId, TransportToken,
};
use crate::errors::ComputeError;
use crate::ports::outbound::{CipherDomain, ConfidentialCompute};
use async_trait::async_trait;
use sha3::{Digest, Keccak256};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

// =============================================================================
// PLAINTEXT TABLE
// =============================================================================

/// Decrypted form of a held ciphertext. Never leaves this module except via
/// the right-checked reveal helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Plain {
    /// 256-bit opaque word (cargo/route tags).
    Word([u8; 32]),
    /// 64-bit scalar (deadline, timestamp).
    Scalar(u64),
    /// Boolean (verdict).
    Flag(bool),
}

impl Plain {
    const fn domain(&self) -> CipherDomain {
        match self {
            Self::Word(_) => CipherDomain::Word256,
            Self::Scalar(_) => CipherDomain::Scalar64,
            Self::Flag(_) => CipherDomain::Flag,
        }
    }
}

/// One held ciphertext with its ACL state.
#[derive(Clone, Debug)]
struct HandleEntry {
    plain: Plain,
    /// Identities allowed to request decryption. Append-only.
    viewers: HashSet<PartyId>,
    /// Contexts allowed to use the handle in further operations. Append-only.
    contexts: HashSet<ContextId>,
    /// One-way public-decryption flag.
    public: bool,
}

impl HandleEntry {
    fn new(plain: Plain) -> Self {
        Self {
            plain,
            viewers: HashSet::new(),
            contexts: HashSet::new(),
            public: false,
        }
    }
}

#[derive(Debug, Default)]
struct ComputeTable {
    entries: HashMap<HandleId, HandleEntry>,
    counter: u64,
}

impl ComputeTable {
    fn entry(&self, handle: HandleId) -> Result<&HandleEntry, ComputeError> {
        self.entries
            .get(&handle)
            .ok_or(ComputeError::UnknownHandle(handle))
    }

    fn entry_mut(&mut self, handle: HandleId) -> Result<&mut HandleEntry, ComputeError> {
        self.entries
            .get_mut(&handle)
            .ok_or(ComputeError::UnknownHandle(handle))
    }

    /// Derive a fresh handle id and store the entry under it.
    fn store(&mut self, tag: &[u8], material: &[u8], plain: Plain) -> HandleId {
        self.counter += 1;
        let mut hasher = Keccak256::new();
        hasher.update(tag);
        hasher.update(self.counter.to_le_bytes());
        hasher.update(material);
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        let handle = HandleId::new(bytes);
        self.entries.insert(handle, HandleEntry::new(plain));
        handle
    }
}

// =============================================================================
// IN-MEMORY COMPUTE
// =============================================================================

/// In-memory Confidential Computation Service for testing.
///
/// A production adapter would bridge to the real service; this one keeps a
/// plaintext table and enforces the same visible contract, including
/// attestation rejection (toggleable) and view-right checks on decryption.
#[derive(Debug, Default)]
pub struct InMemoryCompute {
    table: RwLock<ComputeTable>,
    reject_proofs: AtomicBool,
}

impl InMemoryCompute {
    /// Create an empty compute service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Force every subsequent `submit_external` to fail with
    /// `AttestationRejected`, simulating a collaborator refusal.
    pub fn set_reject_proofs(&self, reject: bool) {
        self.reject_proofs.store(reject, Ordering::SeqCst);
    }

    /// Number of handles currently held.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.table.read().unwrap().entries.len()
    }

    // -------------------------------------------------------------------------
    // Client-side fixture helpers
    // -------------------------------------------------------------------------

    /// Build the external ciphertext a client would submit for a 64-bit
    /// scalar. The leading marker byte keeps the ciphertext non-zero even
    /// for value 0.
    #[must_use]
    pub fn seal_scalar(value: u64) -> ExternalCiphertext {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x01;
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        ExternalCiphertext::new(bytes)
    }

    /// Build the external ciphertext a client would submit for a 256-bit
    /// tag word.
    #[must_use]
    pub fn seal_word(word: [u8; 32]) -> ExternalCiphertext {
        ExternalCiphertext::new(word)
    }

    // -------------------------------------------------------------------------
    // Out-of-band decryption channel (right-checked)
    // -------------------------------------------------------------------------

    /// Decrypt a scalar handle for `requester`.
    ///
    /// # Errors
    ///
    /// `UnknownHandle`, `DomainMismatch`, or `ViewDenied` if `requester`
    /// holds no view right and the handle is not public.
    pub fn reveal_u64(&self, handle: HandleId, requester: PartyId) -> Result<u64, ComputeError> {
        match self.readable_plain(handle, requester)? {
            Plain::Scalar(value) => Ok(value),
            _ => Err(ComputeError::DomainMismatch(handle)),
        }
    }

    /// Decrypt a boolean handle for `requester`.
    ///
    /// # Errors
    ///
    /// `UnknownHandle`, `DomainMismatch`, or `ViewDenied`.
    pub fn reveal_bool(&self, handle: HandleId, requester: PartyId) -> Result<bool, ComputeError> {
        match self.readable_plain(handle, requester)? {
            Plain::Flag(value) => Ok(value),
            _ => Err(ComputeError::DomainMismatch(handle)),
        }
    }

    /// Decrypt a 256-bit word handle for `requester`.
    ///
    /// # Errors
    ///
    /// `UnknownHandle`, `DomainMismatch`, or `ViewDenied`.
    pub fn reveal_word(
        &self,
        handle: HandleId,
        requester: PartyId,
    ) -> Result<[u8; 32], ComputeError> {
        match self.readable_plain(handle, requester)? {
            Plain::Word(value) => Ok(value),
            _ => Err(ComputeError::DomainMismatch(handle)),
        }
    }

    /// The identities currently holding view rights over a handle.
    ///
    /// # Errors
    ///
    /// `UnknownHandle`.
    pub fn view_rights(&self, handle: HandleId) -> Result<HashSet<PartyId>, ComputeError> {
        Ok(self.table.read().unwrap().entry(handle)?.viewers.clone())
    }

    /// Whether a handle is publicly decryptable.
    ///
    /// # Errors
    ///
    /// `UnknownHandle`.
    pub fn is_public(&self, handle: HandleId) -> Result<bool, ComputeError> {
        Ok(self.table.read().unwrap().entry(handle)?.public)
    }

    fn readable_plain(&self, handle: HandleId, requester: PartyId) -> Result<Plain, ComputeError> {
        let table = self.table.read().unwrap();
        let entry = table.entry(handle)?;
        if entry.public || entry.viewers.contains(&requester) {
            Ok(entry.plain)
        } else {
            Err(ComputeError::ViewDenied {
                handle,
                identity: requester,
            })
        }
    }

    fn decode(value: ExternalCiphertext, domain: CipherDomain) -> Plain {
        match domain {
            CipherDomain::Word256 => Plain::Word(value.0),
            CipherDomain::Scalar64 => {
                let mut scalar = [0u8; 8];
                scalar.copy_from_slice(&value.0[24..]);
                Plain::Scalar(u64::from_be_bytes(scalar))
            }
            CipherDomain::Flag => Plain::Flag(value.0[31] != 0),
        }
    }
}

#[async_trait]
impl ConfidentialCompute for InMemoryCompute {
    async fn submit_external(
        &self,
        value: ExternalCiphertext,
        proof: &AttestationProof,
        domain: CipherDomain,
    ) -> Result<HandleId, ComputeError> {
        if self.reject_proofs.load(Ordering::SeqCst) {
            return Err(ComputeError::AttestationRejected(
                "proof verification failed".to_string(),
            ));
        }
        if proof.is_empty() {
            return Err(ComputeError::AttestationRejected("empty proof".to_string()));
        }

        let plain = Self::decode(value, domain);
        let mut table = self.table.write().unwrap();
        Ok(table.store(b"external", value.as_bytes(), plain))
    }

    async fn encrypt_trusted(&self, plain: u64) -> Result<HandleId, ComputeError> {
        let mut table = self.table.write().unwrap();
        Ok(table.store(b"trusted", &plain.to_be_bytes(), Plain::Scalar(plain)))
    }

    async fn compare_le(&self, a: HandleId, b: HandleId) -> Result<HandleId, ComputeError> {
        let mut table = self.table.write().unwrap();

        let lhs = table.entry(a)?.plain;
        let rhs = table.entry(b)?.plain;
        let (Plain::Scalar(lhs), Plain::Scalar(rhs)) = (lhs, rhs) else {
            let offender = if lhs.domain() == CipherDomain::Scalar64 {
                b
            } else {
                a
            };
            return Err(ComputeError::DomainMismatch(offender));
        };

        let mut material = [0u8; 64];
        material[..32].copy_from_slice(a.as_bytes());
        material[32..].copy_from_slice(b.as_bytes());
        Ok(table.store(b"cmp-le", &material, Plain::Flag(lhs <= rhs)))
    }

    async fn grant_use(&self, handle: HandleId, context: ContextId) -> Result<(), ComputeError> {
        let mut table = self.table.write().unwrap();
        table.entry_mut(handle)?.contexts.insert(context);
        Ok(())
    }

    async fn grant_view(&self, handle: HandleId, identity: PartyId) -> Result<(), ComputeError> {
        let mut table = self.table.write().unwrap();
        table.entry_mut(handle)?.viewers.insert(identity);
        Ok(())
    }

    async fn mark_public(&self, handle: HandleId) -> Result<(), ComputeError> {
        let mut table = self.table.write().unwrap();
        table.entry_mut(handle)?.public = true;
        Ok(())
    }

    fn to_transport_bytes(&self, handle: HandleId) -> TransportToken {
        TransportToken::new(*handle.as_bytes())
    }
}

// =============================================================================
// TESTS
// =============================================================================
