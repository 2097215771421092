use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::kind::DocumentKind;
use super::payload::{DocumentRequest, PayloadError};
use super::registry::{lookup, Params, TransportDescriptor, TransportMethod};
use crate::config::Gov24Config;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const SERVICE_KEY_PARAM: &str = "serviceKey";

/// Parameters travel either in the query string or as a JSON body, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "placement", content = "params", rename_all = "snake_case")]
pub enum CallPayload {
    Query(BTreeMap<String, String>),
    Json(Params),
}

/// A fully resolved request, ready for a [`Transport`](super::client::Transport).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallDescriptor {
    kind: DocumentKind,
    url: String,
    method: TransportMethod,
    headers: BTreeMap<String, String>,
    payload: CallPayload,
}

impl CallDescriptor {
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> TransportMethod {
        self.method
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn payload(&self) -> &CallPayload {
        &self.payload
    }

    pub fn query(&self) -> Option<&BTreeMap<String, String>> {
        match &self.payload {
            CallPayload::Query(query) => Some(query),
            CallPayload::Json(_) => None,
        }
    }

    pub fn body(&self) -> Option<&Params> {
        match &self.payload {
            CallPayload::Json(body) => Some(body),
            CallPayload::Query(_) => None,
        }
    }
}

/// Raised only for descriptors that contradict their payload shape.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("fixed parameter '{key}' for {kind} collides with a payload field")]
    FixedParamCollision { kind: DocumentKind, key: String },
    #[error("parameter '{key}' for {kind} is reserved for the service key")]
    ReservedParam { kind: DocumentKind, key: String },
}

#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    api_key: String,
}

impl RequestBuilder {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &Gov24Config) -> Self {
        Self::new(config.base_url.as_str(), config.api_key.as_str())
    }

    pub fn build(&self, request: &DocumentRequest) -> Result<CallDescriptor, BuildError> {
        self.build_with(&lookup(request.kind()), request)
    }

    /// Fixed parameters are merged first and may never be replaced by payload
    /// input; a shared key is reported as [`BuildError::FixedParamCollision`].
    pub fn build_with(
        &self,
        descriptor: &TransportDescriptor,
        request: &DocumentRequest,
    ) -> Result<CallDescriptor, BuildError> {
        let kind = request.kind();
        let mut params = request.params()?;

        for (key, value) in descriptor.fixed_params {
            if params.contains_key(*key) {
                return Err(BuildError::FixedParamCollision {
                    kind,
                    key: (*key).to_string(),
                });
            }
            params.insert((*key).to_string(), Value::String((*value).to_string()));
        }

        if let Some(transform) = descriptor.transform {
            params = transform(params);
        }

        // The auth key is placed by the builder alone, whatever the method.
        if params.contains_key(SERVICE_KEY_PARAM) {
            return Err(BuildError::ReservedParam {
                kind,
                key: SERVICE_KEY_PARAM.to_string(),
            });
        }

        let mut headers = BTreeMap::new();
        headers.insert(API_KEY_HEADER.to_string(), self.api_key.clone());

        let payload = match descriptor.method {
            TransportMethod::Get => {
                let mut query: BTreeMap<String, String> = params
                    .into_iter()
                    .map(|(key, value)| (key, query_value(value)))
                    .collect();
                query.insert(SERVICE_KEY_PARAM.to_string(), self.api_key.clone());
                CallPayload::Query(query)
            }
            TransportMethod::Post => {
                headers.insert(
                    CONTENT_TYPE_HEADER.to_string(),
                    JSON_CONTENT_TYPE.to_string(),
                );
                CallPayload::Json(params)
            }
        };

        Ok(CallDescriptor {
            kind,
            url: format!("{}{}", self.base_url, descriptor.path),
            method: descriptor.method,
            headers,
            payload,
        })
    }
}

fn query_value(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
