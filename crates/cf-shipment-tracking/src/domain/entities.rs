//! # Core Domain Entities
//!
//! Shipment records, the explicit lifecycle state machine, and the registry
//! arena. All lifecycle rules live here as exhaustive matches on
//! [`LifecycleState`]; the illegal flag combination of the boolean-flag
//! design ("delivered but no meta") is unrepresentable.

use crate::domain::value_objects::{
    CargoTagHandle, DeadlineHandle, DeliveredAtHandle, PartyId, RouteTagHandle, ShipmentId,
    VerdictHandle,
};
use crate::errors::TrackingError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// PARTICIPANTS
// =============================================================================

/// The three registered parties of a shipment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participants {
    /// The creator of the record.
    pub shipper: PartyId,
    /// The transporting party.
    pub carrier: PartyId,
    /// The receiving party.
    pub consignee: PartyId,
}

impl Participants {
    /// Creates the participant set.
    #[must_use]
    pub const fn new(shipper: PartyId, carrier: PartyId, consignee: PartyId) -> Self {
        Self {
            shipper,
            carrier,
            consignee,
        }
    }

    /// Returns true if `caller` is one of the three parties.
    #[must_use]
    pub fn contains(&self, caller: PartyId) -> bool {
        caller == self.shipper || caller == self.carrier || caller == self.consignee
    }

    /// The three parties, shipper first.
    #[must_use]
    pub const fn as_array(&self) -> [PartyId; 3] {
        [self.shipper, self.carrier, self.consignee]
    }
}

// =============================================================================
// ENCRYPTED META + DELIVERY OUTCOME
// =============================================================================

/// The three meta handles stored by a successful ingestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedMeta {
    /// Encrypted cargo identity tag.
    pub cargo_tag: CargoTagHandle,
    /// Encrypted route tag.
    pub route_tag: RouteTagHandle,
    /// Encrypted delivery deadline.
    pub deadline: DeadlineHandle,
}

/// The two handles produced atomically when delivery is marked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    /// Encrypted delivery timestamp.
    pub delivered_at: DeliveredAtHandle,
    /// Encrypted SLA verdict (publicly decryptable by policy).
    pub sla_ok: VerdictHandle,
}

// =============================================================================
// LIFECYCLE STATE
// =============================================================================

/// Explicit lifecycle state of a shipment record.
///
/// Transitions: `Created` → `MetaIngested` → `Delivered`. Each transition
/// fires at most once; `Delivered` is terminal for mutation (ACL grants
/// remain possible indefinitely).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Record exists; no encrypted state yet.
    Created,
    /// Encrypted meta ingested.
    MetaIngested {
        /// The stored meta handles.
        meta: EncryptedMeta,
    },
    /// Delivery marked and SLA verdict computed. Terminal.
    Delivered {
        /// The stored meta handles.
        meta: EncryptedMeta,
        /// The delivery handles.
        outcome: DeliveryOutcome,
    },
}

impl LifecycleState {
    /// State name for diagnostics and error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::MetaIngested { .. } => "meta-ingested",
            Self::Delivered { .. } => "delivered",
        }
    }

    /// True once meta ingestion has succeeded.
    #[must_use]
    pub const fn have_meta(&self) -> bool {
        !matches!(self, Self::Created)
    }

    /// True once delivery has been marked.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    /// The meta handles, if ingested.
    #[must_use]
    pub const fn meta(&self) -> Option<&EncryptedMeta> {
        match self {
            Self::Created => None,
            Self::MetaIngested { meta } | Self::Delivered { meta, .. } => Some(meta),
        }
    }

    /// The delivery outcome, if delivered.
    #[must_use]
    pub const fn outcome(&self) -> Option<&DeliveryOutcome> {
        match self {
            Self::Created | Self::MetaIngested { .. } => None,
            Self::Delivered { outcome, .. } => Some(outcome),
        }
    }
}

// =============================================================================
// SHIPMENT RECORD
// =============================================================================

/// One confidential shipment record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    /// Unique key, immutable once created.
    pub id: ShipmentId,
    /// The three registered parties.
    pub participants: Participants,
    /// Current lifecycle state.
    pub state: LifecycleState,
}

impl ShipmentRecord {
    /// Creates a record in the `Created` state.
    #[must_use]
    pub const fn new(id: ShipmentId, participants: Participants) -> Self {
        Self {
            id,
            participants,
            state: LifecycleState::Created,
        }
    }

    /// Returns true if `caller` is one of the three parties.
    #[must_use]
    pub fn is_party(&self, caller: PartyId) -> bool {
        self.participants.contains(caller)
    }

    /// Transition `Created` → `MetaIngested`. One-time.
    ///
    /// # Errors
    ///
    /// `IllegalState` if meta was already ingested.
    pub fn ingest_meta(&mut self, meta: EncryptedMeta) -> Result<(), TrackingError> {
        match self.state {
            LifecycleState::Created => {
                self.state = LifecycleState::MetaIngested { meta };
                Ok(())
            }
            LifecycleState::MetaIngested { .. } | LifecycleState::Delivered { .. } => {
                Err(TrackingError::IllegalState {
                    shipment: self.id,
                    state: self.state.name(),
                    action: "ingest meta",
                })
            }
        }
    }

    /// Transition `MetaIngested` → `Delivered`. One-time, requires meta.
    ///
    /// # Errors
    ///
    /// `IllegalState` if meta is missing or delivery was already marked.
    pub fn mark_delivered(&mut self, outcome: DeliveryOutcome) -> Result<(), TrackingError> {
        match self.state {
            LifecycleState::MetaIngested { meta } => {
                self.state = LifecycleState::Delivered { meta, outcome };
                Ok(())
            }
            LifecycleState::Created | LifecycleState::Delivered { .. } => {
                Err(TrackingError::IllegalState {
                    shipment: self.id,
                    state: self.state.name(),
                    action: "mark delivered",
                })
            }
        }
    }
}

// =============================================================================
// SHIPMENT REGISTRY (arena)
// =============================================================================

/// Keyed store of shipment records.
///
/// Presence in the map is the existence marker; records are owned
/// exclusively by the registry and no mutable reference escapes the
/// service that holds it.
#[derive(Debug, Default)]
pub struct ShipmentRegistry {
    records: HashMap<ShipmentId, ShipmentRecord>,
}

impl ShipmentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if a record with the same id is present.
    pub fn insert(&mut self, record: ShipmentRecord) -> Result<(), TrackingError> {
        if self.records.contains_key(&record.id) {
            return Err(TrackingError::AlreadyExists(record.id));
        }
        self.records.insert(record.id, record);
        Ok(())
    }

    /// Looks up a record.
    ///
    /// # Errors
    ///
    /// `NotFound` if no record exists for `id`.
    pub fn get(&self, id: ShipmentId) -> Result<&ShipmentRecord, TrackingError> {
        self.records.get(&id).ok_or(TrackingError::NotFound(id))
    }

    /// Looks up a record for mutation.
    ///
    /// # Errors
    ///
    /// `NotFound` if no record exists for `id`.
    pub fn get_mut(&mut self, id: ShipmentId) -> Result<&mut ShipmentRecord, TrackingError> {
        self.records.get_mut(&id).ok_or(TrackingError::NotFound(id))
    }

    /// Returns true if a record exists for `id`.
    #[must_use]
    pub fn contains(&self, id: ShipmentId) -> bool {
        self.records.contains_key(&id)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the registry holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
