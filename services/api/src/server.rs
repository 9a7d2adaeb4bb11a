use crate::cli::ServeArgs;
use crate::infra::{default_threshold_catalog, AppState, InMemoryCircuitRepository};
use crate::routes::with_schedule_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use eicr_schedule::config::AppConfig;
use eicr_schedule::error::AppError;
use eicr_schedule::schedule::ScheduleService;
use eicr_schedule::telemetry;
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

    let repository = Arc::new(InMemoryCircuitRepository::default());
    let service = Arc::new(ScheduleService::new(
        repository,
        default_threshold_catalog(),
    ));

    let app = with_schedule_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "schedule of tests service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
