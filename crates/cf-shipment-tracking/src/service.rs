//! # Shipment Tracking Service
//!
//! The Lifecycle Controller: enforces the create → ingest-meta →
//! mark-delivered state machine, mediates every mutation through the
//! Authorization Guard, drives the Confidential Computation Service, and
//! extends visibility through the ACL grants.
//!
//! ## Execution model
//!
//! A single write lock over the registry admits one mutating operation at a
//! time. Every check precedes every collaborator call, and the registry is
//! written only after all collaborator calls succeed, so a mutation either
//! commits completely (state + event) or leaves no trace. Reads take the
//! read lock, run concurrently, and observe the last committed state.

use crate::domain::entities::{
    DeliveryOutcome, EncryptedMeta, LifecycleState, Participants, ShipmentRecord,
    ShipmentRegistry,
};
use crate::domain::invariants::check_record_invariants;
use crate::domain::value_objects::{
    CargoTagHandle, ContextId, DeadlineHandle, DeliveredAtHandle, HandleId, PartyId,
    RouteTagHandle, ShipmentId, VerdictHandle,
};
use crate::errors::TrackingError;
use crate::events::{
    DeliveryMarkedPayload, EventEnvelope, MetaIngestedPayload, ShipmentCreatedPayload,
    TrackingEvent, ViewerGrantedPayload,
};
use crate::ports::inbound::{
    MetaIngestion, ParticipantsView, ResultHandlesView, ShipmentTrackingApi,
};
use crate::ports::outbound::{CipherDomain, ConfidentialCompute, EventSink, TimeSource};

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

// =============================================================================
// CONFIG + STATS
// =============================================================================

/// Shipment Tracking Service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Context identity granted "use" rights over every stored handle, so
    /// the service can hand its own handles back for comparison.
    pub context: ContextId,
    /// Run record invariant checks after each commit.
    pub check_invariants: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            context: ContextId::new(*b"cf-shipment-tracking"),
            check_invariants: true,
        }
    }
}

/// Statistics for the Shipment Tracking Service.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Records created.
    pub shipments_created: u64,
    /// Successful meta ingestions.
    pub metas_ingested: u64,
    /// Deliveries marked.
    pub deliveries_marked: u64,
    /// Viewer grants committed.
    pub viewers_granted: u64,
    /// Mutations rejected by the Authorization Guard.
    pub rejected_unauthorized: u64,
    /// Ingestions refused by the collaborator's proof verification.
    pub attestations_rejected: u64,
}

// =============================================================================
// SERVICE
// =============================================================================

/// The main Shipment Tracking Service.
///
/// Generic over its driven ports:
/// - `C` - the Confidential Computation Service
/// - `E` - the event sink
/// - `T` - the execution environment's clock
pub struct ShipmentTrackingService<C: ConfidentialCompute, E: EventSink, T: TimeSource> {
    /// Service configuration.
    config: ServiceConfig,
    /// Confidential computation collaborator.
    compute: Arc<C>,
    /// Event sink.
    events: Arc<E>,
    /// Clock.
    clock: Arc<T>,
    /// The registry arena. Shared mutable state is exactly this.
    registry: RwLock<ShipmentRegistry>,
    /// Service statistics.
    stats: RwLock<ServiceStats>,
}

impl<C: ConfidentialCompute, E: EventSink, T: TimeSource> ShipmentTrackingService<C, E, T> {
    /// Create a new Shipment Tracking Service.
    pub fn new(compute: C, events: E, clock: T, config: ServiceConfig) -> Self {
        Self {
            config,
            compute: Arc::new(compute),
            events: Arc::new(events),
            clock: Arc::new(clock),
            registry: RwLock::new(ShipmentRegistry::new()),
            stats: RwLock::new(ServiceStats::default()),
        }
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// The compute collaborator (shared).
    #[must_use]
    pub fn compute(&self) -> Arc<C> {
        Arc::clone(&self.compute)
    }

    /// The event sink (shared).
    #[must_use]
    pub fn events(&self) -> Arc<E> {
        Arc::clone(&self.events)
    }

    /// The clock (shared).
    #[must_use]
    pub fn clock(&self) -> Arc<T> {
        Arc::clone(&self.clock)
    }

    /// Authorization Guard: the caller must be one of the record's three
    /// parties.
    async fn require_party(
        &self,
        record: &ShipmentRecord,
        caller: PartyId,
    ) -> Result<(), TrackingError> {
        if record.is_party(caller) {
            return Ok(());
        }
        warn!(caller = %caller, shipment = %record.id, "caller is not a party");
        self.stats.write().await.rejected_unauthorized += 1;
        Err(TrackingError::Unauthorized {
            shipment: record.id,
            caller,
        })
    }

    /// Grant the record context "use" and all of `identities` "view" over a
    /// handle.
    async fn grant_handle(
        &self,
        handle: HandleId,
        identities: &[PartyId],
    ) -> Result<(), TrackingError> {
        self.compute.grant_use(handle, self.config.context).await?;
        for identity in identities {
            self.compute.grant_view(handle, *identity).await?;
        }
        Ok(())
    }

    /// Post-commit record consistency check.
    async fn check_committed(&self, registry: &ShipmentRegistry, id: ShipmentId) {
        if !self.config.check_invariants {
            return;
        }
        if let Ok(record) = registry.get(id) {
            let result = check_record_invariants(record);
            if !result.is_ok() {
                error!(shipment = %id, violations = ?result.violations, "record invariant violated");
                debug_assert!(result.is_ok(), "invariant violated: {:?}", result.violations);
            }
        }
    }

    /// Publish one committed-operation event.
    async fn emit(&self, event: TrackingEvent) {
        let envelope = EventEnvelope::new(event);
        debug!(
            correlation_id = %envelope.correlation_id,
            topic = envelope.event.topic(),
            "publishing event"
        );
        self.events.publish(envelope).await;
    }
}

#[async_trait]
impl<C, E, T> ShipmentTrackingApi for ShipmentTrackingService<C, E, T>
where
    C: ConfidentialCompute,
    E: EventSink,
    T: TimeSource,
{
    #[instrument(skip(self), fields(shipment = %id))]
    async fn create(
        &self,
        id: ShipmentId,
        caller: PartyId,
        carrier: PartyId,
        consignee: PartyId,
    ) -> Result<(), TrackingError> {
        let mut registry = self.registry.write().await;

        if registry.contains(id) {
            return Err(TrackingError::AlreadyExists(id));
        }
        if carrier.is_zero() || consignee.is_zero() {
            return Err(TrackingError::InvalidInput(
                "carrier and consignee must be non-null",
            ));
        }

        let participants = Participants::new(caller, carrier, consignee);
        registry.insert(ShipmentRecord::new(id, participants))?;

        self.stats.write().await.shipments_created += 1;
        info!(shipper = %caller, "shipment created");

        self.emit(TrackingEvent::ShipmentCreated(ShipmentCreatedPayload {
            id,
            shipper: caller,
            carrier,
            consignee,
        }))
        .await;
        Ok(())
    }

    #[instrument(skip(self, request), fields(shipment = %id, caller = %caller))]
    async fn ingest_meta(
        &self,
        id: ShipmentId,
        caller: PartyId,
        request: MetaIngestion,
    ) -> Result<EncryptedMeta, TrackingError> {
        let mut registry = self.registry.write().await;

        let record = registry.get(id)?;
        self.require_party(record, caller).await?;
        if record.state.have_meta() {
            return Err(TrackingError::IllegalState {
                shipment: id,
                state: record.state.name(),
                action: "ingest meta",
            });
        }
        // Cheap pre-check before the expensive collaborator calls.
        request.validate()?;
        let participants = record.participants;

        let submitted = async {
            let cargo = self
                .compute
                .submit_external(request.cargo.value, &request.cargo.proof, CipherDomain::Word256)
                .await?;
            let route = self
                .compute
                .submit_external(request.route.value, &request.route.proof, CipherDomain::Word256)
                .await?;
            let deadline = self
                .compute
                .submit_external(
                    request.deadline.value,
                    &request.deadline.proof,
                    CipherDomain::Scalar64,
                )
                .await?;
            Ok::<_, TrackingError>((cargo, route, deadline))
        }
        .await;

        let (cargo, route, deadline) = match submitted {
            Ok(handles) => handles,
            Err(err) => {
                if matches!(err, TrackingError::AttestationRejected(_)) {
                    warn!("attestation rejected, aborting ingestion");
                    self.stats.write().await.attestations_rejected += 1;
                }
                return Err(err);
            }
        };

        let parties = participants.as_array();
        for handle in [cargo, route, deadline] {
            self.grant_handle(handle, &parties).await?;
        }

        let meta = EncryptedMeta {
            cargo_tag: CargoTagHandle::new(cargo),
            route_tag: RouteTagHandle::new(route),
            deadline: DeadlineHandle::new(deadline),
        };
        registry.get_mut(id)?.ingest_meta(meta)?;
        self.check_committed(&registry, id).await;

        self.stats.write().await.metas_ingested += 1;
        info!("encrypted meta ingested");

        self.emit(TrackingEvent::MetaIngested(MetaIngestedPayload {
            id,
            cargo_tag: self.compute.to_transport_bytes(cargo),
            route_tag: self.compute.to_transport_bytes(route),
            deadline: self.compute.to_transport_bytes(deadline),
        }))
        .await;
        Ok(meta)
    }

    #[instrument(skip(self), fields(shipment = %id, caller = %caller))]
    async fn mark_delivered(
        &self,
        id: ShipmentId,
        caller: PartyId,
    ) -> Result<DeliveryOutcome, TrackingError> {
        let mut registry = self.registry.write().await;

        let record = registry.get(id)?;
        self.require_party(record, caller).await?;
        let meta = match record.state {
            LifecycleState::MetaIngested { meta } => meta,
            LifecycleState::Created | LifecycleState::Delivered { .. } => {
                return Err(TrackingError::IllegalState {
                    shipment: id,
                    state: record.state.name(),
                    action: "mark delivered",
                });
            }
        };
        let participants = record.participants;

        // Trusted-input cast of the environment clock; not a user claim.
        let now = self.clock.now_unix();
        let delivered_at = self.compute.encrypt_trusted(now).await?;

        // The sole comparison semantics: non-strict ≤, equality is on-time.
        let sla_ok = self
            .compute
            .compare_le(delivered_at, meta.deadline.id())
            .await?;

        let parties = participants.as_array();
        self.grant_handle(delivered_at, &parties).await?;
        self.grant_handle(sla_ok, &parties).await?;

        // Only the verdict becomes publicly decryptable; the timestamp,
        // tags, and deadline stay view-restricted.
        self.compute.mark_public(sla_ok).await?;

        let outcome = DeliveryOutcome {
            delivered_at: DeliveredAtHandle::new(delivered_at),
            sla_ok: VerdictHandle::new(sla_ok),
        };
        registry.get_mut(id)?.mark_delivered(outcome)?;
        self.check_committed(&registry, id).await;

        self.stats.write().await.deliveries_marked += 1;
        info!("delivery marked, verdict derived");

        self.emit(TrackingEvent::DeliveryMarked(DeliveryMarkedPayload {
            id,
            delivered_at: self.compute.to_transport_bytes(delivered_at),
            sla_ok: self.compute.to_transport_bytes(sla_ok),
        }))
        .await;
        Ok(outcome)
    }

    #[instrument(skip(self), fields(shipment = %id, caller = %caller, viewer = %viewer))]
    async fn grant_viewer(
        &self,
        id: ShipmentId,
        caller: PartyId,
        viewer: PartyId,
    ) -> Result<(), TrackingError> {
        let mut registry = self.registry.write().await;

        let record = registry.get(id)?;
        self.require_party(record, caller).await?;
        if viewer.is_zero() {
            return Err(TrackingError::InvalidInput("viewer must be non-null"));
        }

        if let Some(meta) = record.state.meta() {
            for handle in [
                meta.cargo_tag.id(),
                meta.route_tag.id(),
                meta.deadline.id(),
            ] {
                self.compute.grant_view(handle, viewer).await?;
            }
        }
        if let Some(outcome) = record.state.outcome() {
            for handle in [outcome.delivered_at.id(), outcome.sla_ok.id()] {
                self.compute.grant_view(handle, viewer).await?;
            }
        }
        // A no-op grant on a freshly created record is legal, not an error.

        drop(registry);
        self.stats.write().await.viewers_granted += 1;
        info!("viewer granted");

        self.emit(TrackingEvent::ViewerGranted(ViewerGrantedPayload {
            id,
            viewer,
        }))
        .await;
        Ok(())
    }

    async fn get_participants(&self, id: ShipmentId) -> Result<ParticipantsView, TrackingError> {
        let registry = self.registry.read().await;
        let record = registry.get(id)?;
        Ok(ParticipantsView {
            shipper: record.participants.shipper,
            carrier: record.participants.carrier,
            consignee: record.participants.consignee,
            delivered: record.state.is_delivered(),
            have_meta: record.state.have_meta(),
        })
    }

    async fn get_encrypted_meta_handles(
        &self,
        id: ShipmentId,
    ) -> Result<Option<EncryptedMeta>, TrackingError> {
        let registry = self.registry.read().await;
        Ok(registry.get(id)?.state.meta().copied())
    }

    async fn get_result_handles(
        &self,
        id: ShipmentId,
    ) -> Result<ResultHandlesView, TrackingError> {
        let registry = self.registry.read().await;
        let record = registry.get(id)?;
        Ok(ResultHandlesView {
            delivered: record.state.is_delivered(),
            outcome: record.state.outcome().copied(),
        })
    }
}

// =============================================================================
// TEST SERVICE FACTORY
// =============================================================================

/// Create a service wired with the in-memory adapters, for tests.
#[must_use]
pub fn create_test_service() -> ShipmentTrackingService<
    crate::adapters::InMemoryCompute,
    crate::adapters::InMemoryEventLog,
    crate::adapters::FixedClock,
> {
    ShipmentTrackingService::new(
        crate::adapters::InMemoryCompute::new(),
        crate::adapters::InMemoryEventLog::new(),
        crate::adapters::FixedClock::new(1_000),
        ServiceConfig::default(),
    )
}

// =============================================================================
// TESTS
// =============================================================================
