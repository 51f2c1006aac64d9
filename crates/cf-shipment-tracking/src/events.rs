//! # Event Schema
//!
//! Payloads emitted on every committed mutation. Events carry transport
//! tokens for ciphertext handles, never values, so the log reveals
//! nothing about cargo, route, deadline, or delivery time.
//!
//! One event per committed operation; a failed operation emits nothing.
//! Transport is delegated to the [`EventSink`](crate::ports::EventSink)
//! port.

use crate::domain::value_objects::{PartyId, ShipmentId, TransportToken};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// TOPICS
// =============================================================================

/// Event topic names.
pub mod topics {
    /// A shipment record was created.
    pub const SHIPMENT_CREATED: &str = "shipment.created";
    /// Encrypted meta was ingested.
    pub const META_INGESTED: &str = "shipment.meta_ingested";
    /// Delivery was marked and the SLA verdict computed.
    pub const DELIVERY_MARKED: &str = "shipment.delivery_marked";
    /// An additional viewer was granted.
    pub const VIEWER_GRANTED: &str = "shipment.viewer_granted";
}

// =============================================================================
// PAYLOADS
// =============================================================================

/// A shipment record was created. No encrypted state exists yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentCreatedPayload {
    /// The new record's id.
    pub id: ShipmentId,
    /// Creator, registered as shipper.
    pub shipper: PartyId,
    /// The transporting party.
    pub carrier: PartyId,
    /// The receiving party.
    pub consignee: PartyId,
}

/// Encrypted meta was ingested. Carries handle tokens, not values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaIngestedPayload {
    /// The shipment.
    pub id: ShipmentId,
    /// Token of the cargo-tag handle.
    pub cargo_tag: TransportToken,
    /// Token of the route-tag handle.
    pub route_tag: TransportToken,
    /// Token of the deadline handle.
    pub deadline: TransportToken,
}

/// Delivery was marked; the verdict handle is publicly decryptable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryMarkedPayload {
    /// The shipment.
    pub id: ShipmentId,
    /// Token of the delivery-timestamp handle.
    pub delivered_at: TransportToken,
    /// Token of the SLA-verdict handle.
    pub sla_ok: TransportToken,
}

/// An additional identity was granted view rights.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerGrantedPayload {
    /// The shipment.
    pub id: ShipmentId,
    /// The newly granted identity.
    pub viewer: PartyId,
}

// =============================================================================
// EVENT + ENVELOPE
// =============================================================================

/// All events emitted by the tracking subsystem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingEvent {
    /// See [`ShipmentCreatedPayload`].
    ShipmentCreated(ShipmentCreatedPayload),
    /// See [`MetaIngestedPayload`].
    MetaIngested(MetaIngestedPayload),
    /// See [`DeliveryMarkedPayload`].
    DeliveryMarked(DeliveryMarkedPayload),
    /// See [`ViewerGrantedPayload`].
    ViewerGranted(ViewerGrantedPayload),
}

impl TrackingEvent {
    /// Topic this event is published under.
    #[must_use]
    pub const fn topic(&self) -> &'static str {
        match self {
            Self::ShipmentCreated(_) => topics::SHIPMENT_CREATED,
            Self::MetaIngested(_) => topics::META_INGESTED,
            Self::DeliveryMarked(_) => topics::DELIVERY_MARKED,
            Self::ViewerGranted(_) => topics::VIEWER_GRANTED,
        }
    }

    /// The shipment this event concerns.
    #[must_use]
    pub const fn shipment(&self) -> ShipmentId {
        match self {
            Self::ShipmentCreated(p) => p.id,
            Self::MetaIngested(p) => p.id,
            Self::DeliveryMarked(p) => p.id,
            Self::ViewerGranted(p) => p.id,
        }
    }
}

/// An event with its correlation id, as handed to the sink.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Correlation id of the operation that produced the event.
    pub correlation_id: Uuid,
    /// The event payload.
    pub event: TrackingEvent,
}

impl EventEnvelope {
    /// Wraps an event with a fresh correlation id.
    #[must_use]
    pub fn new(event: TrackingEvent) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            event,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
