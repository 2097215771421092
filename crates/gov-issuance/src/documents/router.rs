use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use super::client::{IssuanceError, Transport};
use super::kind::DocumentKind;
use super::payload::DocumentRequest;
use super::service::IssuanceService;

/// Router builder exposing the catalog, issuance, and status endpoints.
pub fn document_router<T>(service: Arc<IssuanceService<T>>) -> Router
where
    T: Transport + 'static,
{
    Router::new()
        .route("/api/v1/documents", get(list_handler::<T>))
        .route("/api/v1/documents/:kind/issue", post(issue_handler::<T>))
        .route("/api/v1/documents/:kind/status", get(status_handler::<T>))
        .route("/api/v1/issuance", get(panel_handler::<T>))
        .with_state(service)
}

pub(crate) async fn list_handler<T>(State(service): State<Arc<IssuanceService<T>>>) -> Response
where
    T: Transport + 'static,
{
    (StatusCode::OK, Json(service.known_kinds())).into_response()
}

pub(crate) async fn issue_handler<T>(
    State(service): State<Arc<IssuanceService<T>>>,
    Path(kind): Path<String>,
    Json(payload): Json<Value>,
) -> Response
where
    T: Transport + 'static,
{
    let kind = match kind.parse::<DocumentKind>() {
        Ok(kind) => kind,
        Err(err) => return unknown_kind(err.to_string()),
    };

    let request = match DocumentRequest::from_json(kind, payload) {
        Ok(request) => request,
        Err(err) => {
            let payload = json!({ "documentKind": kind, "error": err.to_string() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match service.issue(request).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => {
            let status = match err {
                IssuanceError::Transport(_) => StatusCode::BAD_GATEWAY,
                IssuanceError::Build(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let payload = json!({ "documentKind": kind, "error": err.to_string() });
            (status, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<T>(
    State(service): State<Arc<IssuanceService<T>>>,
    Path(kind): Path<String>,
) -> Response
where
    T: Transport + 'static,
{
    match kind.parse::<DocumentKind>() {
        Ok(kind) => {
            let status = service.status(kind);
            let payload = json!({
                "documentKind": kind,
                "label": status.label(),
                "status": status,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => unknown_kind(err.to_string()),
    }
}

pub(crate) async fn panel_handler<T>(State(service): State<Arc<IssuanceService<T>>>) -> Response
where
    T: Transport + 'static,
{
    (StatusCode::OK, Json(service.panel())).into_response()
}

fn unknown_kind(message: String) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
}
