use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_compensation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use employment::compensation::{CompensationService, InMemoryRecordStore};
use employment::config::AppConfig;
use employment::error::AppError;
use employment::telemetry;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryRecordStore::new());
    let service = Arc::new(CompensationService::new(store, config.compensation));

    let app = with_compensation_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        month_window = config.compensation.month_window.label(),
        max_calls_per_request = config.compensation.max_calls_per_request,
        "compensation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
