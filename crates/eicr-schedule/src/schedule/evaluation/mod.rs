pub(crate) mod catalog;
pub(crate) mod field;
pub(crate) mod status;

pub use catalog::{FieldRule, ThresholdCatalog, TokenSet, DEFAULT_LIMIT_OHMS, FAILURE_PRECEDENCE};
pub use status::TriageClass;

use crate::schedule::domain::{Circuit, FieldId};
use serde::{Deserialize, Serialize};

/// Per-field classification of a raw reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Empty,
    Pass,
    Warning,
    Fail,
}

/// One field's verdict. Holds no identity and is recreated on every
/// evaluation, never cached across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldVerdict {
    pub field: FieldId,
    pub verdict: Verdict,
}

/// Aggregate status level for a circuit card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    Success,
    Warning,
    Error,
    Pending,
}

/// Derived circuit summary: level, display label, essential-test completion,
/// and the headline failing field when the level is `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircuitStatus {
    pub level: StatusLevel,
    pub label: &'static str,
    pub completion_percent: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failing_field: Option<FieldId>,
}

/// Stateless evaluator applying the threshold catalog to circuits.
#[derive(Debug)]
pub struct ComplianceEngine {
    catalog: ThresholdCatalog,
}

impl ComplianceEngine {
    pub fn new(catalog: ThresholdCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ThresholdCatalog {
        &self.catalog
    }

    /// Classify one raw value the way an inline form editor needs it.
    pub fn evaluate(&self, field: FieldId, raw: Option<&str>, limit: Option<f64>) -> Verdict {
        field::evaluate_field(&self.catalog, field, raw, limit)
    }

    /// Verdicts for every applicable field on the circuit.
    pub fn verdicts(&self, circuit: &Circuit) -> Vec<FieldVerdict> {
        status::field_verdicts(&self.catalog, circuit)
    }

    /// Four-level card status for the circuit.
    pub fn status(&self, circuit: &Circuit) -> CircuitStatus {
        status::circuit_status(&self.verdicts(circuit))
    }

    /// Coarse dashboard classification for the circuit.
    pub fn triage(&self, circuit: &Circuit) -> TriageClass {
        status::triage(&self.verdicts(circuit))
    }
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new(ThresholdCatalog::default())
    }
}
