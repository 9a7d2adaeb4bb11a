use chrono::NaiveDate;
use eicr_schedule::schedule::{
    Circuit, CircuitId, CircuitRepository, RepositoryError, ThresholdCatalog,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Insertion-ordered store so dashboard issues keep schedule order.
#[derive(Default)]
pub(crate) struct InMemoryCircuitRepository {
    circuits: Mutex<Vec<Circuit>>,
    version: AtomicU64,
}

impl CircuitRepository for InMemoryCircuitRepository {
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

pub(crate) fn default_threshold_catalog() -> ThresholdCatalog {
    ThresholdCatalog::default()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
