use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::documents::client::TransportError;
use crate::documents::kind::DocumentKind;

fn issue_request(kind: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(format!("/api/v1/documents/{kind}/issue"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("issue request")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("get request")
}

#[tokio::test]
async fn lists_every_document_kind() {
    let router = router_with_service(scripted_service(ScriptedTransport::default()));

    let response = router
        .oneshot(get_request("/api/v1/documents"))
        .await
        .expect("list response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json_body(response).await;
    let entries = body.as_array().expect("definition list");
    assert_eq!(entries.len(), DocumentKind::COUNT);
    assert_eq!(entries[0]["kind"], "landLedger");
    assert_eq!(entries[0]["method"], "GET");
    assert_eq!(entries[0]["path"], "/documents/land-ledger");
    assert_eq!(entries[1]["method"], "POST");
}

#[tokio::test]
async fn issuing_updates_the_status_endpoint() {
    let service = scripted_service(ScriptedTransport::default());
    let router = router_with_service(service.clone());

    let response = router
        .clone()
        .oneshot(issue_request(
            "vehicle-register",
            json!({ "plateNumber": "12가3456", "ownerName": "홍길동" }),
        ))
        .await
        .expect("issue response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json_body(response).await;
    assert_eq!(body["documentKind"], "vehicleRegister");
    assert_eq!(
        body["requestPayload"],
        json!({ "plateNumber": "12가3456", "ownerName": "홍길동" })
    );
    assert_eq!(body["raw"]["status"], "ISSUED");

    let response = router
        .oneshot(get_request("/api/v1/documents/vehicleRegister/status"))
        .await
        .expect("status response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json_body(response).await;
    assert_eq!(body["label"], "발급 완료");
    assert_eq!(body["status"]["state"], "success");
    assert_eq!(service.transport().calls().len(), 1);
}

#[tokio::test]
async fn unknown_kind_is_not_found() {
    let service = scripted_service(ScriptedTransport::default());
    let router = router_with_service(service.clone());

    let response = router
        .oneshot(issue_request("marriage-certificate", json!({})))
        .await
        .expect("issue response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("marriage-certificate"));
    assert!(service.transport().calls().is_empty());
}

#[tokio::test]
async fn mismatched_payload_is_rejected_before_any_call() {
    let service = scripted_service(ScriptedTransport::default());
    let router = router_with_service(service.clone());

    let response = router
        .oneshot(issue_request(
            "landLedger",
            json!({ "plateNumber": "12가3456", "ownerName": "홍길동" }),
        ))
        .await
        .expect("issue response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json_body(response).await;
    assert_eq!(body["documentKind"], "landLedger");
    assert!(service.transport().calls().is_empty());
    assert_eq!(service.status(DocumentKind::LandLedger).state(), "idle");
}

#[tokio::test]
async fn transport_failure_maps_to_bad_gateway() {
    let service = scripted_service(ScriptedTransport::failing(
        DocumentKind::TaxPayment,
        TransportError::Status {
            status: 503,
            body: "maintenance".to_string(),
        },
    ));
    let router = router_with_service(service.clone());

    let response = router
        .clone()
        .oneshot(issue_request(
            "tax_payment",
            json!({ "businessId": "123-45-67890", "year": "2024", "half": "FIRST" }),
        ))
        .await
        .expect("issue response");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = read_json_body(response).await;
    assert_eq!(
        body["error"],
        "remote service responded with 503: maintenance"
    );

    let response = router
        .oneshot(get_request("/api/v1/issuance"))
        .await
        .expect("panel response");
    assert_eq!(response.status(), StatusCode::OK);

    let panel = read_json_body(response).await;
    let statuses = panel["statuses"].as_array().expect("status list");
    assert_eq!(statuses.len(), DocumentKind::COUNT);
    let tax = statuses
        .iter()
        .find(|entry| entry["kind"] == "taxPayment")
        .expect("tax payment tile");
    assert_eq!(tax["label"], "발급 실패");
    assert_eq!(
        panel["lastError"],
        "remote service responded with 503: maintenance"
    );
    assert!(panel["lastResult"].is_null());
}
