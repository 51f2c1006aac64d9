//! # ACL & Visibility Tests
//!
//! Who can decrypt what, and when:
//!
//! 1. **Party visibility**: ingestion and delivery grant the three parties
//!    view rights over the new handles
//! 2. **Viewer grants**: monotonic, idempotent, state-dependent coverage
//! 3. **Public verdict**: the SLA verdict, and only the verdict, becomes
//!    readable by strangers
//! 4. **Confidentiality bounds**: nothing else ever leaves the ACL

#[cfg(test)]
mod tests {
    use crate::integration::{sealed_meta, test_service, CARRIER, CONSIGNEE, OUTSIDER, SHIPPER};
    use cf_shipment_tracking::prelude::*;

    const AUDITOR: PartyId = PartyId::new([0xAD; 20]);

    #[tokio::test]
    async fn test_parties_can_view_meta_after_ingestion() {
        let service = test_service();
        let id = ShipmentId::new(1);
        service
            .create(id, SHIPPER, CARRIER, CONSIGNEE)
            .await
            .unwrap();
        let meta = service
            .ingest_meta(id, SHIPPER, sealed_meta(5_000))
            .await
            .unwrap();

        let compute = service.compute();
        for party in [SHIPPER, CARRIER, CONSIGNEE] {
            assert!(compute.reveal_word(meta.cargo_tag.id(), party).is_ok());
            assert!(compute.reveal_word(meta.route_tag.id(), party).is_ok());
            assert_eq!(compute.reveal_u64(meta.deadline.id(), party).unwrap(), 5_000);
        }

        // An outsider holds no rights.
        assert!(compute.reveal_word(meta.cargo_tag.id(), OUTSIDER).is_err());
        assert!(compute.reveal_u64(meta.deadline.id(), OUTSIDER).is_err());
    }

    #[tokio::test]
    async fn test_granted_viewer_covers_current_state_only() {
        let service = test_service();
        let id = ShipmentId::new(2);
        service
            .create(id, SHIPPER, CARRIER, CONSIGNEE)
            .await
            .unwrap();
        let meta = service
            .ingest_meta(id, SHIPPER, sealed_meta(5_000))
            .await
            .unwrap();

        // Granted after ingestion: sees meta handles.
        service.grant_viewer(id, SHIPPER, AUDITOR).await.unwrap();
        let compute = service.compute();
        assert!(compute.reveal_word(meta.cargo_tag.id(), AUDITOR).is_ok());
        assert_eq!(compute.reveal_u64(meta.deadline.id(), AUDITOR).unwrap(), 5_000);

        // Delivery happens afterwards; the old grant does not extend to the
        // new handles until granted again.
        service.clock().set(4_000);
        let outcome = service.mark_delivered(id, CARRIER).await.unwrap();
        assert!(compute
            .reveal_u64(outcome.delivered_at.id(), AUDITOR)
            .is_err());

        // A fresh grant now covers the outcome handles as well.
        service.grant_viewer(id, CONSIGNEE, AUDITOR).await.unwrap();
        assert_eq!(
            compute.reveal_u64(outcome.delivered_at.id(), AUDITOR).unwrap(),
            4_000
        );
        assert!(compute.reveal_bool(outcome.sla_ok.id(), AUDITOR).unwrap());
    }

    #[tokio::test]
    async fn test_grant_is_idempotent_in_effect() {
        let service = test_service();
        let id = ShipmentId::new(3);
        service
            .create(id, SHIPPER, CARRIER, CONSIGNEE)
            .await
            .unwrap();
        let meta = service
            .ingest_meta(id, SHIPPER, sealed_meta(100))
            .await
            .unwrap();

        service.grant_viewer(id, SHIPPER, AUDITOR).await.unwrap();
        let compute = service.compute();
        let once = compute.view_rights(meta.cargo_tag.id()).unwrap();

        service.grant_viewer(id, CARRIER, AUDITOR).await.unwrap();
        service.grant_viewer(id, CONSIGNEE, AUDITOR).await.unwrap();
        let thrice = compute.view_rights(meta.cargo_tag.id()).unwrap();

        // Same final view-right set as granting once.
        assert_eq!(once, thrice);
    }

    #[tokio::test]
    async fn test_grants_survive_delivery_and_never_revoke() {
        let service = test_service();
        let id = ShipmentId::new(4);
        service
            .create(id, SHIPPER, CARRIER, CONSIGNEE)
            .await
            .unwrap();
        let meta = service
            .ingest_meta(id, SHIPPER, sealed_meta(100))
            .await
            .unwrap();
        service.grant_viewer(id, SHIPPER, AUDITOR).await.unwrap();
        service.mark_delivered(id, SHIPPER).await.unwrap();

        // ACL grants remain possible indefinitely after the terminal state,
        // and earlier grants are still in force.
        let late_viewer = PartyId::new([0xBB; 20]);
        service.grant_viewer(id, CARRIER, late_viewer).await.unwrap();

        let compute = service.compute();
        assert!(compute.reveal_word(meta.cargo_tag.id(), AUDITOR).is_ok());
        assert!(compute.reveal_word(meta.cargo_tag.id(), late_viewer).is_ok());
    }

    #[tokio::test]
    async fn test_public_verdict_stranger_reads_nothing_else() {
        let service = test_service();
        let id = ShipmentId::new(5);
        service
            .create(id, SHIPPER, CARRIER, CONSIGNEE)
            .await
            .unwrap();
        let meta = service
            .ingest_meta(id, SHIPPER, sealed_meta(5_000))
            .await
            .unwrap();
        service.clock().set(5_000);
        let outcome = service.mark_delivered(id, SHIPPER).await.unwrap();

        let compute = service.compute();
        let stranger = PartyId::new([0xFF; 20]);

        // Equality counts as on-time, and anyone can learn exactly that.
        assert!(compute.reveal_bool(outcome.sla_ok.id(), stranger).unwrap());

        // The timestamp, deadline, and tags stay sealed.
        assert!(compute
            .reveal_u64(outcome.delivered_at.id(), stranger)
            .is_err());
        assert!(compute.reveal_u64(meta.deadline.id(), stranger).is_err());
        assert!(compute.reveal_word(meta.cargo_tag.id(), stranger).is_err());
        assert!(compute.reveal_word(meta.route_tag.id(), stranger).is_err());
    }

    #[tokio::test]
    async fn test_noop_grant_emits_event() {
        let service = test_service();
        let id = ShipmentId::new(6);
        service
            .create(id, SHIPPER, CARRIER, CONSIGNEE)
            .await
            .unwrap();

        // Nothing ingested yet, so there is nothing to grant; still legal.
        service.grant_viewer(id, SHIPPER, AUDITOR).await.unwrap();

        let last = service.events().last().unwrap();
        match last.event {
            TrackingEvent::ViewerGranted(ref payload) => {
                assert_eq!(payload.id, id);
                assert_eq!(payload.viewer, AUDITOR);
            }
            ref other => panic!("expected ViewerGranted, got {other:?}"),
        }

        // Once meta lands, a repeat grant picks up the handles.
        let meta = service
            .ingest_meta(id, SHIPPER, sealed_meta(100))
            .await
            .unwrap();
        service.grant_viewer(id, SHIPPER, AUDITOR).await.unwrap();
        assert!(service
            .compute()
            .reveal_word(meta.cargo_tag.id(), AUDITOR)
            .is_ok());
    }
}
