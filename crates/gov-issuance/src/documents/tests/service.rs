use super::common::*;
use std::sync::Arc;

use crate::documents::builder::SERVICE_KEY_PARAM;
use crate::documents::catalog::sample_request;
use crate::documents::client::{IssuanceError, TransportError};
use crate::documents::kind::DocumentKind;
use crate::documents::payload::{DocumentRequest, LandLedgerRequest, PassportReissueRequest};
use crate::documents::registry::TransportMethod;
use crate::documents::service::IssuanceService;
use crate::documents::tracker::IssuanceStatus;

#[tokio::test]
async fn statuses_start_idle_for_every_kind() {
    let service = scripted_service(ScriptedTransport::default());
    for kind in DocumentKind::ordered() {
        assert_eq!(service.status(kind), IssuanceStatus::Idle);
    }
    assert!(service.last_result().is_none());
    assert!(service.last_error().is_none());
}

#[tokio::test]
async fn successful_issue_updates_status_and_last_result() {
    let service = scripted_service(ScriptedTransport::default());
    let payload = LandLedgerRequest {
        parcel_number: "123-45".to_string(),
        si_gun_gu_code: "41190".to_string(),
        eup_myeon_dong_code: "10300".to_string(),
    };

    let result = service
        .issue_payload(payload.clone())
        .await
        .expect("issued");

    match service.status(DocumentKind::LandLedger) {
        IssuanceStatus::Success(message) => assert_eq!(message, result.issued_at.to_rfc3339()),
        other => panic!("expected success, got {other:?}"),
    }
    let last = service.last_result().expect("last result");
    assert_eq!(last.document_kind, DocumentKind::LandLedger);
    assert_eq!(last.request_payload, DocumentRequest::from(payload));
    assert_eq!(last.raw["status"], "ISSUED");
}

#[tokio::test]
async fn failed_issue_sets_error_and_keeps_previous_result() {
    let service = scripted_service(ScriptedTransport::failing(
        DocumentKind::VehicleRegister,
        TransportError::Network("error sending request: connection refused".to_string()),
    ));

    service
        .issue(sample_request(DocumentKind::TaxPayment))
        .await
        .expect("tax payment issued");
    let before = service.last_result();

    let err = service
        .issue(vehicle("12가3456"))
        .await
        .expect_err("vehicle register fails");
    assert!(matches!(err, IssuanceError::Transport(_)));

    assert_eq!(
        service.status(DocumentKind::VehicleRegister),
        IssuanceStatus::Error("error sending request: connection refused".to_string())
    );
    assert_eq!(
        service.last_error().as_deref(),
        Some("error sending request: connection refused")
    );
    assert_eq!(service.last_result(), before);
}

#[tokio::test]
async fn new_attempt_clears_shared_error_detail() {
    let service = scripted_service(ScriptedTransport::failing(
        DocumentKind::VehicleRegister,
        TransportError::Timeout("operation timed out".to_string()),
    ));

    let _ = service.issue(vehicle("12가3456")).await;
    assert!(service.last_error().is_some());

    service
        .issue(sample_request(DocumentKind::BuildingLedger))
        .await
        .expect("building ledger issued");
    assert!(service.last_error().is_none());
    assert_eq!(
        service.status(DocumentKind::VehicleRegister).state(),
        "error",
        "a later success for another kind leaves this tile untouched"
    );
}

#[tokio::test]
async fn transport_receives_method_specific_placement() {
    let service = Arc::new(IssuanceService::new(
        request_builder(),
        ScriptedTransport::default(),
    ));

    service
        .issue_payload(PassportReissueRequest {
            passport_number: "M12345678".to_string(),
            applicant_name: "HONG GILDONG".to_string(),
            contact_number: "010-1234-5678".to_string(),
        })
        .await
        .expect("passport issued");
    service
        .issue(sample_request(DocumentKind::LocalTax))
        .await
        .expect("local tax issued");

    let panel = service.panel();
    assert!(panel.last_result.is_some());

    let definitions = service.known_kinds();
    assert_eq!(definitions.len(), DocumentKind::COUNT);

    let calls = service.transport().calls();
    assert_eq!(calls.len(), 2);

    assert_eq!(calls[0].method(), TransportMethod::Post);
    let body = calls[0].body().expect("post body");
    assert!(!body.contains_key(SERVICE_KEY_PARAM));
    assert_eq!(body.len(), 3);

    assert_eq!(calls[1].method(), TransportMethod::Get);
    let query = calls[1].query().expect("get query");
    assert_eq!(query[SERVICE_KEY_PARAM], API_KEY);
    assert_eq!(query["taxType"], "PROPERTY");
}
