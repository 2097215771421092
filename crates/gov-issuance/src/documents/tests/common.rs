use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::documents::builder::{CallDescriptor, RequestBuilder};
use crate::documents::client::{Transport, TransportError};
use crate::documents::kind::DocumentKind;
use crate::documents::payload::{DocumentRequest, VehicleRegisterRequest};
use crate::documents::router::document_router;
use crate::documents::service::IssuanceService;

pub(super) const BASE_URL: &str = "http://gov24.test";
pub(super) const API_KEY: &str = "test-key";

pub(super) fn request_builder() -> RequestBuilder {
    RequestBuilder::new(BASE_URL, API_KEY)
}

/// Answers every call immediately, failing the kinds listed in `failures`.
#[derive(Default)]
pub(super) struct ScriptedTransport {
    pub(super) failures: HashMap<DocumentKind, TransportError>,
    pub(super) calls: Mutex<Vec<CallDescriptor>>,
}

impl ScriptedTransport {
    pub(super) fn failing(kind: DocumentKind, error: TransportError) -> Self {
        let mut failures = HashMap::new();
        failures.insert(kind, error);
        Self {
            failures,
            ..Self::default()
        }
    }

    pub(super) fn calls(&self) -> Vec<CallDescriptor> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn perform(&self, call: &CallDescriptor) -> Result<Value, TransportError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(call.clone());

        match self.failures.get(&call.kind()) {
            Some(err) => Err(err.clone()),
            None => Ok(json!({ "documentKind": call.kind(), "status": "ISSUED" })),
        }
    }
}

pub(super) type GateReply = Result<Value, TransportError>;

/// Parks each call until the test releases it, so resolution order can be
/// chosen independently of start order. Calls are matched to gates by the
/// value of `key_param` in their query or body.
pub(super) struct GatedTransport {
    key_param: &'static str,
    gates: Mutex<HashMap<String, oneshot::Receiver<GateReply>>>,
}

impl GatedTransport {
    pub(super) fn new(key_param: &'static str) -> Self {
        Self {
            key_param,
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub(super) fn gate(&self, key: &str) -> oneshot::Sender<GateReply> {
        let (sender, receiver) = oneshot::channel();
        self.gates
            .lock()
            .expect("gates mutex poisoned")
            .insert(key.to_string(), receiver);
        sender
    }

    /// True until the call carrying `key` has reached the transport.
    pub(super) fn is_gated(&self, key: &str) -> bool {
        self.gates
            .lock()
            .expect("gates mutex poisoned")
            .contains_key(key)
    }

    fn key_for(&self, call: &CallDescriptor) -> Option<String> {
        if let Some(query) = call.query() {
            return query.get(self.key_param).cloned();
        }
        call.body()
            .and_then(|body| body.get(self.key_param))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[async_trait]
impl Transport for GatedTransport {
    async fn perform(&self, call: &CallDescriptor) -> Result<Value, TransportError> {
        let key = self
            .key_for(call)
            .ok_or_else(|| TransportError::Network("call has no gate key".to_string()))?;
        let receiver = self
            .gates
            .lock()
            .expect("gates mutex poisoned")
            .remove(&key)
            .ok_or_else(|| TransportError::Network(format!("no gate registered for {key}")))?;

        receiver
            .await
            .unwrap_or_else(|_| Err(TransportError::Network("gate dropped".to_string())))
    }
}

pub(super) fn vehicle(plate_number: &str) -> DocumentRequest {
    VehicleRegisterRequest {
        plate_number: plate_number.to_string(),
        owner_name: "홍길동".to_string(),
    }
    .into()
}

pub(super) fn scripted_service(transport: ScriptedTransport) -> Arc<IssuanceService<ScriptedTransport>> {
    Arc::new(IssuanceService::new(request_builder(), transport))
}

pub(super) fn router_with_service(service: Arc<IssuanceService<ScriptedTransport>>) -> axum::Router {
    document_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
