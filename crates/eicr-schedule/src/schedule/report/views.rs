use super::collector::{collect_issues, Issue, ScheduleReport};
use crate::schedule::domain::{Circuit, CircuitId, FieldId};
use crate::schedule::evaluation::{status, ComplianceEngine, StatusLevel, TriageClass};
use serde::Serialize;

/// Card-level view of one evaluated circuit. Both status projections come
/// from the same verdict set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitStatusView {
    pub circuit_id: CircuitId,
    pub designation: String,
    pub display_name: String,
    pub level: StatusLevel,
    pub status_label: &'static str,
    pub completion_percent: u8,
    pub triage: TriageClass,
    pub triage_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failing_field: Option<FieldId>,
}

impl CircuitStatusView {
    pub fn build(engine: &ComplianceEngine, circuit: &Circuit) -> Self {
        let verdicts = engine.verdicts(circuit);
        let card = status::circuit_status(&verdicts);
        let triage = status::triage(&verdicts);

        Self {
            circuit_id: circuit.circuit_id.clone(),
            designation: circuit.designation.clone(),
            display_name: circuit.display_name(),
            level: card.level,
            status_label: card.label,
            completion_percent: card.completion_percent,
            triage,
            triage_label: triage.label(),
            failing_field: card.failing_field,
        }
    }
}

/// Dashboard payload combining the rollup with per-circuit cards.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleOverview {
    pub pass_count: usize,
    pub fail_count: usize,
    pub pending_count: usize,
    pub completion_percent: u8,
    pub total_issues: usize,
    pub issues: Vec<Issue>,
    pub circuits: Vec<CircuitStatusView>,
}

impl ScheduleOverview {
    pub fn build(engine: &ComplianceEngine, circuits: &[Circuit]) -> Self {
        let report = collect_issues(engine, circuits);
        Self::from_report(engine, report, circuits)
    }

    /// Assemble the overview from a precomputed (possibly memoized) report.
    pub fn from_report(
        engine: &ComplianceEngine,
        report: ScheduleReport,
        circuits: &[Circuit],
    ) -> Self {
        let circuit_views = circuits
            .iter()
            .map(|circuit| CircuitStatusView::build(engine, circuit))
            .collect();

        Self {
            pass_count: report.pass_count,
            fail_count: report.fail_count,
            pending_count: report.pending_count,
            completion_percent: report.completion_percent,
            total_issues: report.total_issues,
            issues: report.issues,
            circuits: circuit_views,
        }
    }
}
