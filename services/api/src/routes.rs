use crate::infra::{deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use eicr_schedule::error::AppError;
use eicr_schedule::schedule::{
    schedule_router, Circuit, CircuitId, CircuitRepository, CircuitStatusView, ComplianceEngine,
    Issue, ScheduleCsvImporter, ScheduleImportError, ScheduleOverview, ScheduleService,
    ThresholdCatalog,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct ScheduleReportRequest {
    #[serde(default)]
    pub(crate) circuits: Vec<Circuit>,
    #[serde(default)]
    pub(crate) schedule_csv: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) inspection_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScheduleReportResponse {
    pub(crate) inspection_date: NaiveDate,
    pub(crate) data_source: ScheduleDataSource,
    pub(crate) pass_count: usize,
    pub(crate) fail_count: usize,
    pub(crate) pending_count: usize,
    pub(crate) completion_percent: u8,
    pub(crate) total_issues: usize,
    pub(crate) issues: Vec<Issue>,
    pub(crate) circuits: Vec<CircuitStatusView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ScheduleDataSource {
    CsvImport,
    Inline,
}

pub(crate) fn with_schedule_routes<R>(service: Arc<ScheduleService<R>>) -> axum::Router
where
    R: CircuitRepository + 'static,
{
    schedule_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/schedule/report",
            axum::routing::post(schedule_report_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Stateless rollup over circuits supplied inline or as a pasted CSV export.
pub(crate) async fn schedule_report_endpoint(
    Json(payload): Json<ScheduleReportRequest>,
) -> Result<Json<ScheduleReportResponse>, AppError> {
    let ScheduleReportRequest {
        circuits,
        schedule_csv,
        inspection_date,
    } = payload;

    let (circuits, data_source) = if let Some(csv) = schedule_csv {
        let reader = Cursor::new(csv.into_bytes());
        let submissions = ScheduleCsvImporter::from_reader(reader)?;
        let circuits = submissions
            .into_iter()
            .enumerate()
            .map(|(index, submission)| {
                submission
                    .into_circuit(CircuitId(format!("row-{:03}", index + 1)))
                    .map_err(ScheduleImportError::from)
            })
            .collect::<Result<Vec<_>, _>>()?;
        (circuits, ScheduleDataSource::CsvImport)
    } else {
        (circuits, ScheduleDataSource::Inline)
    };

    let engine = ComplianceEngine::new(ThresholdCatalog::default());
    let overview = ScheduleOverview::build(&engine, &circuits);
    let inspection_date = inspection_date.unwrap_or_else(|| Local::now().date_naive());

    Ok(Json(ScheduleReportResponse {
        inspection_date,
        data_source,
        pass_count: overview.pass_count,
        fail_count: overview.fail_count,
        pending_count: overview.pending_count,
        completion_percent: overview.completion_percent,
        total_issues: overview.total_issues,
        issues: overview.issues,
        circuits: overview.circuits,
    }))
}
