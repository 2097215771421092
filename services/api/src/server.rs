use crate::cli::ServeArgs;
use crate::infra::{issuance_service, warn_on_defaults, AppState};
use crate::routes::with_document_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use gov_issuance::config::AppConfig;
use gov_issuance::documents::ResolutionPolicy;
use gov_issuance::error::AppError;
use gov_issuance::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;
    warn_on_defaults(&config.gov24);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let issuance = issuance_service(&config.gov24, ResolutionPolicy::default())?;

    let app = with_document_routes(issuance)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        gov24 = %config.gov24.base_url,
        "document issuance service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
