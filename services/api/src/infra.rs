use chrono::{DateTime, NaiveDate, Utc};
use gov_issuance::config::Gov24Config;
use gov_issuance::documents::{
    DocumentKind, HttpTransport, IssuanceService, RequestBuilder, ResolutionPolicy,
};
use gov_issuance::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type HttpIssuanceService = IssuanceService<HttpTransport>;

pub(crate) fn issuance_service(
    config: &Gov24Config,
    policy: ResolutionPolicy,
) -> Result<Arc<HttpIssuanceService>, AppError> {
    let transport = HttpTransport::new(config.timeout)?;
    Ok(Arc::new(IssuanceService::with_policy(
        RequestBuilder::from_config(config),
        transport,
        policy,
    )))
}

/// Call after telemetry is up so the warnings are not lost.
pub(crate) fn warn_on_defaults(config: &Gov24Config) {
    for name in &config.defaults_applied {
        warn!(variable = %name, "not set; using the demo default");
    }
}

pub(crate) fn parse_kind(raw: &str) -> Result<DocumentKind, String> {
    raw.parse::<DocumentKind>().map_err(|err| err.to_string())
}

pub(crate) fn parse_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|err| format!("payload is not valid JSON ({err})"))
}

/// Accepts RFC 3339 timestamps or plain dates (midnight UTC).
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| format!("failed to parse '{raw}' as YYYY-MM-DD or RFC 3339"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_accept_dates_and_rfc3339() {
        assert_eq!(
            parse_timestamp("2025-03-01").expect("date").to_rfc3339(),
            "2025-03-01T00:00:00+00:00"
        );
        assert_eq!(
            parse_timestamp("2025-03-01T18:00:00+09:00")
                .expect("timestamp")
                .to_rfc3339(),
            "2025-03-01T09:00:00+00:00"
        );
        assert!(parse_timestamp("March 1st").is_err());
    }

    #[test]
    fn payload_parser_reports_invalid_json() {
        assert!(parse_json(r#"{"year":"2024"}"#).is_ok());
        assert!(parse_json("{year}")
            .expect_err("invalid")
            .starts_with("payload is not valid JSON"));
    }
}
