use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::domain::{CircuitId, CircuitSubmission, FieldId, SubmissionError};
use super::evaluation::{ComplianceEngine, ThresholdCatalog};
use super::report::{collect_issues, CircuitStatusView, ScheduleOverview, ScheduleReport};
use super::repository::{CircuitRepository, RepositoryError};

/// Service composing intake, storage, and the compliance engine.
pub struct ScheduleService<R> {
    repository: Arc<R>,
    engine: Arc<ComplianceEngine>,
    report_cache: Mutex<Option<(u64, ScheduleReport)>>,
}

static CIRCUIT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_circuit_id() -> CircuitId {
    let id = CIRCUIT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CircuitId(format!("cct-{id:06}"))
}

impl<R> ScheduleService<R>
where
    R: CircuitRepository + 'static,
{
    pub fn new(repository: Arc<R>, catalog: ThresholdCatalog) -> Self {
        Self {
            repository,
            engine: Arc::new(ComplianceEngine::new(catalog)),
            report_cache: Mutex::new(None),
        }
    }

    pub fn engine(&self) -> &ComplianceEngine {
        &self.engine
    }

    /// Add a circuit to the schedule, assigning the next identifier.
    pub fn submit(
        &self,
        submission: CircuitSubmission,
    ) -> Result<CircuitStatusView, ScheduleServiceError> {
        let circuit = submission.into_circuit(next_circuit_id())?;
        let stored = self.repository.insert(circuit)?;
        Ok(CircuitStatusView::build(&self.engine, &stored))
    }

    /// Record one reading, the per-keystroke editor path. `None` clears it.
    pub fn record_reading(
        &self,
        id: &CircuitId,
        field: FieldId,
        value: Option<String>,
    ) -> Result<CircuitStatusView, ScheduleServiceError> {
        let mut circuit = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        circuit.readings.set(field, value);
        self.repository.update(circuit.clone())?;

        Ok(CircuitStatusView::build(&self.engine, &circuit))
    }

    /// Evaluated view of one circuit, `None` when it is not on the schedule.
    pub fn circuit_status(
        &self,
        id: &CircuitId,
    ) -> Result<Option<CircuitStatusView>, ScheduleServiceError> {
        let circuit = self.repository.fetch(id)?;
        Ok(circuit.map(|circuit| CircuitStatusView::build(&self.engine, &circuit)))
    }

    pub fn remove(&self, id: &CircuitId) -> Result<(), ScheduleServiceError> {
        self.repository.remove(id)?;
        Ok(())
    }

    /// Issue rollup, memoized against the repository version so dashboards
    /// polling between edits reuse the last computed report.
    pub fn report(&self) -> Result<ScheduleReport, ScheduleServiceError> {
        let version = self.repository.version();

        if let Some((cached_version, cached)) = self
            .report_cache
            .lock()
            .expect("report cache poisoned")
            .as_ref()
        {
            if *cached_version == version {
                return Ok(cached.clone());
            }
        }

        let circuits = self.repository.list()?;
        let report = collect_issues(&self.engine, &circuits);
        *self.report_cache.lock().expect("report cache poisoned") =
            Some((version, report.clone()));

        Ok(report)
    }

    /// Full dashboard payload: memoized rollup plus per-circuit cards.
    pub fn overview(&self) -> Result<ScheduleOverview, ScheduleServiceError> {
        let report = self.report()?;
        let circuits = self.repository.list()?;
        Ok(ScheduleOverview::from_report(&self.engine, report, &circuits))
    }
}

/// Error raised by the schedule service.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleServiceError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
