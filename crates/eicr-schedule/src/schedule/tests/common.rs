use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::schedule::domain::{
    Circuit, CircuitId, CircuitSubmission, ProtectiveDevice, TestReadings,
};
use crate::schedule::evaluation::{ComplianceEngine, ThresholdCatalog};
use crate::schedule::repository::{CircuitRepository, RepositoryError};
use crate::schedule::service::ScheduleService;

pub(super) fn catalog() -> ThresholdCatalog {
    ThresholdCatalog::default()
}

pub(super) fn engine() -> ComplianceEngine {
    ComplianceEngine::new(catalog())
}

pub(super) fn circuit(id: &str, designation: &str) -> Circuit {
    Circuit {
        circuit_id: CircuitId(id.to_string()),
        designation: designation.to_string(),
        description: String::new(),
        device: ProtectiveDevice::default(),
        max_zs: None,
        tested_on: None,
        readings: TestReadings::default(),
    }
}

pub(super) fn rcbo_device() -> ProtectiveDevice {
    ProtectiveDevice {
        device_type: "RCBO Type B".to_string(),
        rcd_rating: Some("30mA".to_string()),
        bs_standard: Some("BS EN 61009".to_string()),
    }
}

/// Fully compliant circuit: all four essentials recorded and clear.
pub(super) fn compliant_circuit(id: &str) -> Circuit {
    let mut circuit = circuit(id, "1A");
    circuit.max_zs = Some(1.0);
    circuit.readings.zs = Some("0.5".to_string());
    circuit.readings.r1r2 = Some("0.3".to_string());
    circuit.readings.insulation_live_earth = Some(">200".to_string());
    circuit.readings.polarity = Some("Correct".to_string());
    circuit
}

/// Circuit whose only recorded reading breaches the Zs ceiling.
pub(super) fn failing_zs_circuit(id: &str) -> Circuit {
    let mut circuit = circuit(id, "2B");
    circuit.max_zs = Some(1.0);
    circuit.readings.zs = Some("1.3".to_string());
    circuit
}

pub(super) fn submission(designation: &str) -> CircuitSubmission {
    CircuitSubmission {
        designation: designation.to_string(),
        description: "Kitchen sockets".to_string(),
        device: rcbo_device(),
        max_zs: Some(1.37),
        tested_on: None,
        readings: TestReadings::default(),
    }
}

pub(super) fn build_service() -> (Arc<ScheduleService<MemoryRepository>>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(ScheduleService::new(repository.clone(), catalog()));
    (service, repository)
}

/// Insertion-ordered in-memory store; issue reporting depends on the order.
#[derive(Default)]
pub(super) struct MemoryRepository {
    circuits: Mutex<Vec<Circuit>>,
    version: AtomicU64,
    list_calls: AtomicUsize,
}

impl MemoryRepository {
    pub(super) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::Relaxed)
    }
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
        self.list_calls.fetch_add(1, Ordering::Relaxed);
        let guard = self.circuits.lock().expect("repository mutex poisoned");
        Ok(guard.clone())
    }

    fn version(&self) -> u64 {
        self.version.load(Ordering::Relaxed)
    }
}

pub(super) struct ConflictRepository;

impl CircuitRepository for ConflictRepository {
    fn insert(&self, _circuit: Circuit) -> Result<Circuit, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _circuit: Circuit) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &CircuitId) -> Result<Option<Circuit>, RepositoryError> {
        Ok(None)
    }

    fn remove(&self, _id: &CircuitId) -> Result<(), RepositoryError> {
        Err(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<Circuit>, RepositoryError> {
        Ok(Vec::new())
    }

    fn version(&self) -> u64 {
        0
    }
}

pub(super) struct UnavailableRepository;

impl CircuitRepository for UnavailableRepository {
    fn insert(&self, _circuit: Circuit) -> Result<Circuit, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _circuit: Circuit) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &CircuitId) -> Result<Option<Circuit>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _id: &CircuitId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Circuit>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn version(&self) -> u64 {
        0
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
