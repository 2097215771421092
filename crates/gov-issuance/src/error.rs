use crate::config::ConfigError;
use crate::documents::{IssuanceError, PayloadError, TransportError, UnknownDocumentKind};
use crate::sync::SyncError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Transport(TransportError),
    Issuance(IssuanceError),
    Payload(PayloadError),
    UnknownKind(UnknownDocumentKind),
    Sync(SyncError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Transport(err) => write!(f, "transport error: {}", err),
            // Shown to users as-is.
            AppError::Issuance(err) => write!(f, "{}", err),
            AppError::Payload(err) => write!(f, "{}", err),
            AppError::UnknownKind(err) => write!(f, "{}", err),
            AppError::Sync(err) => write!(f, "commit sync failed: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Transport(err) => Some(err),
            AppError::Issuance(err) => Some(err),
            AppError::Payload(err) => Some(err),
            AppError::UnknownKind(err) => Some(err),
            AppError::Sync(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Issuance(IssuanceError::Transport(_)) | AppError::Sync(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Payload(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownKind(_) => StatusCode::NOT_FOUND,
            AppError::Issuance(IssuanceError::Build(_))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<TransportError> for AppError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

impl From<IssuanceError> for AppError {
    fn from(value: IssuanceError) -> Self {
        Self::Issuance(value)
    }
}

impl From<PayloadError> for AppError {
    fn from(value: PayloadError) -> Self {
        Self::Payload(value)
    }
}

impl From<UnknownDocumentKind> for AppError {
    fn from(value: UnknownDocumentKind) -> Self {
        Self::UnknownKind(value)
    }
}

impl From<SyncError> for AppError {
    fn from(value: SyncError) -> Self {
        Self::Sync(value)
    }
}
