use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CircuitId, CircuitSubmission, FieldId};
use super::repository::{CircuitRepository, RepositoryError};
use super::service::{ScheduleService, ScheduleServiceError};

/// Router builder exposing HTTP endpoints for the circuit schedule.
pub fn schedule_router<R>(service: Arc<ScheduleService<R>>) -> Router
where
    R: CircuitRepository + 'static,
{
    Router::new()
        .route("/api/v1/schedule/circuits", post(submit_handler::<R>))
        .route(
            "/api/v1/schedule/circuits/:circuit_id",
            get(status_handler::<R>),
        )
        .route(
            "/api/v1/schedule/circuits/:circuit_id/readings/:field",
            put(reading_handler::<R>),
        )
        .route("/api/v1/schedule/overview", get(overview_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReadingPayload {
    pub(crate) value: Option<String>,
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ScheduleService<R>>>,
    axum::Json(submission): axum::Json<CircuitSubmission>,
) -> Response
where
    R: CircuitRepository + 'static,
{
    match service.submit(submission) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(ScheduleServiceError::Submission(error)) => {
            let body = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response()
        }
        Err(ScheduleServiceError::Repository(RepositoryError::Conflict)) => {
            let body = json!({ "error": "circuit already exists" });
            (StatusCode::CONFLICT, axum::Json(body)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<ScheduleService<R>>>,
    Path(circuit_id): Path<String>,
) -> Response
where
    R: CircuitRepository + 'static,
{
    let id = CircuitId(circuit_id);
    match service.circuit_status(&id) {
        Ok(Some(view)) => (StatusCode::OK, axum::Json(view)).into_response(),
        Ok(None) => not_found(&id),
        Err(ScheduleServiceError::Repository(RepositoryError::NotFound)) => not_found(&id),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn reading_handler<R>(
    State(service): State<Arc<ScheduleService<R>>>,
    Path((circuit_id, field)): Path<(String, String)>,
    axum::Json(payload): axum::Json<ReadingPayload>,
) -> Response
where
    R: CircuitRepository + 'static,
{
    let Some(field) = FieldId::from_key(&field) else {
        let body = json!({ "error": format!("unknown field '{field}'") });
        return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
    };

    let id = CircuitId(circuit_id);
    match service.record_reading(&id, field, payload.value) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(ScheduleServiceError::Repository(RepositoryError::NotFound)) => not_found(&id),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn overview_handler<R>(
    State(service): State<Arc<ScheduleService<R>>>,
) -> Response
where
    R: CircuitRepository + 'static,
{
    match service.overview() {
        Ok(overview) => (StatusCode::OK, axum::Json(overview)).into_response(),
        Err(other) => internal_error(other),
    }
}

fn not_found(id: &CircuitId) -> Response {
    let body = json!({ "error": format!("circuit '{}' not found", id.0) });
    (StatusCode::NOT_FOUND, axum::Json(body)).into_response()
}

fn internal_error(error: ScheduleServiceError) -> Response {
    let body = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
}
