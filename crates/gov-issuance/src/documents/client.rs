use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::builder::{BuildError, CallDescriptor, CallPayload, RequestBuilder};
use super::kind::DocumentKind;
use super::payload::{DocumentPayload, DocumentRequest};
use super::registry::TransportMethod;

/// Normalized envelope for one successful issuance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceResult {
    pub document_kind: DocumentKind,
    pub issued_at: DateTime<Utc>,
    #[serde(serialize_with = "DocumentRequest::serialize_payload")]
    pub request_payload: DocumentRequest,
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    Timeout(String),
    #[error("remote service responded with {status}: {body}")]
    Status { status: u16, body: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Failure of one issuance attempt. Display yields the underlying message
/// unchanged so it can be shown to the user as-is.
#[derive(Debug, thiserror::Error)]
pub enum IssuanceError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Sends a resolved call and returns the response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform(&self, call: &CallDescriptor) -> Result<Value, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::from)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform(&self, call: &CallDescriptor) -> Result<Value, TransportError> {
        let method = match call.method() {
            TransportMethod::Get => reqwest::Method::GET,
            TransportMethod::Post => reqwest::Method::POST,
        };

        let mut request = self.client.request(method, call.url());
        for (name, value) in call.headers() {
            request = request.header(name.as_str(), value.as_str());
        }
        request = match call.payload() {
            CallPayload::Query(query) => request.query(query),
            CallPayload::Json(body) => request.body(Value::Object(body.clone()).to_string()),
        };

        debug!(kind = %call.kind(), method = %call.method(), url = call.url(), "sending issuance request");

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        debug!(kind = %call.kind(), %status, "received issuance response");

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

/// Builds each call from the registry and runs it once; no retries, no cache.
#[derive(Debug)]
pub struct IssuanceClient<T> {
    builder: RequestBuilder,
    transport: T,
}

impl<T: Transport> IssuanceClient<T> {
    pub fn new(builder: RequestBuilder, transport: T) -> Self {
        Self { builder, transport }
    }

    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn issue(&self, request: DocumentRequest) -> Result<IssuanceResult, IssuanceError> {
        let call = self.builder.build(&request)?;
        let raw = self.transport.perform(&call).await?;

        Ok(IssuanceResult {
            document_kind: request.kind(),
            issued_at: Utc::now(),
            request_payload: request,
            raw,
        })
    }

    pub async fn issue_payload<P: DocumentPayload>(
        &self,
        payload: P,
    ) -> Result<IssuanceResult, IssuanceError> {
        self.issue(payload.into()).await
    }
}
