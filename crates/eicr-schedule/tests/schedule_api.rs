use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

use eicr_schedule::schedule::{
    schedule_router, Circuit, CircuitId, CircuitRepository, CircuitSubmission, ProtectiveDevice,
    RepositoryError, ScheduleService, TestReadings, ThresholdCatalog,
};

#[derive(Default)]
struct MemoryRepository {
    circuits: Mutex<Vec<Circuit>>,
    version: AtomicU64,
}

impl CircuitRepository for MemoryRepository {
    fn insert(&self, circuit: Circuit) -> Result<Circuit, RepositoryError> {
        let mut guard = self.circuits.lock().expect("repository mutex poisoned");
        if guard
            .iter()
            .any(|existing| existing.circuit_id == circuit.circuit_id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.push(circuit.clone());
        self.version.fetch_add(1, Ordering::Relaxed);
        Ok(circuit)
    }

    fn update(&self, circuit: Circuit) -> Result<(), RepositoryError> {
        let mut guard = self.circuits.lock().expect("repository mutex poisoned");
        match guard
            .iter_mut()
            .find(|existing| existing.circuit_id == circuit.circuit_id)
        {
            Some(slot) => {
                *slot = circuit;
                self.version.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &CircuitId) -> Result<Option<Circuit>, RepositoryError> {
        let guard = self.circuits.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .find(|circuit| &circuit.circuit_id == id)
            .cloned())
    }

    fn remove(&self, id: &CircuitId) -> Result<(), RepositoryError> {
        let mut guard = self.circuits.lock().expect("repository mutex poisoned");
        let before = guard.len();
        guard.retain(|circuit| &circuit.circuit_id != id);
        if guard.len() == before {
            return Err(RepositoryError::NotFound);
        }
        self.version.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn list(&self) -> Result<Vec<Circuit>, RepositoryError> {
        let guard = self.circuits.lock().expect("repository mutex poisoned");
        Ok(guard.clone())
    }

    fn version(&self) -> u64 {
        self.version.load(Ordering::Relaxed)
    }
}

fn router() -> axum::Router {
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(ScheduleService::new(repository, ThresholdCatalog::default()));
    schedule_router(service)
}

fn ring_final_submission() -> CircuitSubmission {
    CircuitSubmission {
        designation: "1A".to_string(),
        description: "Ring final sockets".to_string(),
        device: ProtectiveDevice {
            device_type: "RCBO Type B".to_string(),
            rcd_rating: Some("30mA".to_string()),
            bs_standard: Some("BS EN 61009".to_string()),
        },
        max_zs: Some(1.37),
        tested_on: None,
        readings: TestReadings::default(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn edit_workflow_drives_the_status_through_the_router() {
    let router = router();

    // Submit a new circuit.
    let response = router
        .clone()
        .oneshot(
            axum::http::Request::post("/api/v1/schedule/circuits")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&ring_final_submission()).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("submit executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let circuit_id = created
        .get("circuit_id")
        .and_then(Value::as_str)
        .expect("circuit id assigned")
        .to_string();
    assert_eq!(created.get("status_label"), Some(&json!("Not Started")));

    // Record a breaching loop-impedance reading.
    let response = router
        .clone()
        .oneshot(
            axum::http::Request::put(format!(
                "/api/v1/schedule/circuits/{circuit_id}/readings/zs"
            ))
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(
                serde_json::to_vec(&json!({ "value": "1.5" })).unwrap(),
            ))
            .unwrap(),
        )
        .await
        .expect("reading executes");
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated.get("level"), Some(&json!("error")));
    assert_eq!(updated.get("status_label"), Some(&json!("Zs Fail")));

    // The overview reflects the failing circuit and its issue.
    let response = router
        .clone()
        .oneshot(
            axum::http::Request::get("/api/v1/schedule/overview")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("overview executes");
    assert_eq!(response.status(), StatusCode::OK);
    let overview = body_json(response).await;
    assert_eq!(overview.get("fail_count"), Some(&json!(1)));
    let issues = overview
        .get("issues")
        .and_then(Value::as_array)
        .expect("issues present");
    assert_eq!(issues.len(), 1);
    assert_eq!(
        issues[0].get("message"),
        Some(&json!("Zs exceeds maximum (1.5Ω > 1.37Ω)"))
    );

    // Correcting the reading clears the failure.
    let response = router
        .clone()
        .oneshot(
            axum::http::Request::put(format!(
                "/api/v1/schedule/circuits/{circuit_id}/readings/zs"
            ))
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(
                serde_json::to_vec(&json!({ "value": "0.4" })).unwrap(),
            ))
            .unwrap(),
        )
        .await
        .expect("reading executes");
    assert_eq!(response.status(), StatusCode::OK);
    let corrected = body_json(response).await;
    assert_eq!(corrected.get("level"), Some(&json!("warning")));
    assert_eq!(corrected.get("status_label"), Some(&json!("In Progress")));
}

#[tokio::test]
async fn unknown_field_key_is_a_bad_request() {
    let router = router();

    let response = router
        .oneshot(
            axum::http::Request::put("/api/v1/schedule/circuits/cct-000001/readings/cableSize")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({ "value": "2.5" })).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
