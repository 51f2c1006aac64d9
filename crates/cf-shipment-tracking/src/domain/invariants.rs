//! # Domain Invariants
//!
//! Critical invariants that MUST hold for every committed shipment record.
//! The lifecycle enum makes most of them structural; these checks catch
//! handle-level corruption (zero handles smuggled into a committed state)
//! and participant-level corruption.

use crate::domain::entities::ShipmentRecord;
use crate::domain::value_objects::ShipmentId;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// INVARIANT-1: Non-null counterparties
///
/// A committed record always names a non-null carrier and consignee
/// (creation rejects the null identity).
#[must_use]
pub fn check_counterparty_invariant(record: &ShipmentRecord) -> bool {
    !record.participants.carrier.is_zero() && !record.participants.consignee.is_zero()
}

/// INVARIANT-2: Meta handle integrity
///
/// Once ingested, all three meta handles are non-zero. A zero handle in a
/// `MetaIngested` or `Delivered` record means a partially committed
/// ingestion, which the sequencer forbids.
#[must_use]
pub fn check_meta_handles_invariant(record: &ShipmentRecord) -> bool {
    match record.state.meta() {
        None => true,
        Some(meta) => {
            !meta.cargo_tag.is_zero() && !meta.route_tag.is_zero() && !meta.deadline.is_zero()
        }
    }
}

/// INVARIANT-3: Outcome handle integrity
///
/// Once delivered, the timestamp and verdict handles are non-zero, and the
/// record necessarily also carries meta (structural in [`LifecycleState`]).
#[must_use]
pub fn check_outcome_handles_invariant(record: &ShipmentRecord) -> bool {
    match record.state.outcome() {
        None => true,
        Some(outcome) => !outcome.delivered_at.is_zero() && !outcome.sla_ok.is_zero(),
    }
}

/// Check all record invariants at once.
#[must_use]
pub fn check_record_invariants(record: &ShipmentRecord) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_counterparty_invariant(record) {
        violations.push(InvariantViolation::NullCounterparty { id: record.id });
    }

    if !check_meta_handles_invariant(record) {
        violations.push(InvariantViolation::ZeroMetaHandle {
            id: record.id,
            state: record.state.name(),
        });
    }

    if !check_outcome_handles_invariant(record) {
        violations.push(InvariantViolation::ZeroOutcomeHandle {
            id: record.id,
            state: record.state.name(),
        });
    }

    InvariantCheckResult { violations }
}

// =============================================================================
// CHECK RESULT
// =============================================================================

/// A single invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Carrier or consignee is the null identity.
    NullCounterparty {
        /// The offending record.
        id: ShipmentId,
    },
    /// A meta handle is zero in a post-ingestion state.
    ZeroMetaHandle {
        /// The offending record.
        id: ShipmentId,
        /// Lifecycle state name at check time.
        state: &'static str,
    },
    /// An outcome handle is zero in the delivered state.
    ZeroOutcomeHandle {
        /// The offending record.
        id: ShipmentId,
        /// Lifecycle state name at check time.
        state: &'static str,
    },
}

/// Result of checking all invariants for a record.
#[derive(Clone, Debug, Default)]
pub struct InvariantCheckResult {
    /// All detected violations (empty when the record is consistent).
    pub violations: Vec<InvariantViolation>,
}

impl InvariantCheckResult {
    /// Returns true if no invariant was violated.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
