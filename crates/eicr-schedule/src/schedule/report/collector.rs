use crate::schedule::domain::{Circuit, CircuitId, FieldId};
use crate::schedule::evaluation::field::parse_measurement;
use crate::schedule::evaluation::{
    status, ComplianceEngine, FieldVerdict, ThresholdCatalog, TriageClass, Verdict,
};
use serde::Serialize;

/// Display cap carried over from the dashboard: the reported list keeps
/// encounter order and truncates after this many entries.
pub const ISSUE_DISPLAY_LIMIT: usize = 5;

/// Reported fields, in the fixed per-circuit order issues are synthesized.
const ISSUE_FIELDS: [FieldId; 6] = [
    FieldId::Zs,
    FieldId::RcdOneX,
    FieldId::InsulationLiveEarth,
    FieldId::InsulationLiveNeutral,
    FieldId::Polarity,
    FieldId::RcdTestButton,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// One reportable problem on one circuit. Ephemeral: recomputed on every
/// pass over the collection, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub circuit_id: CircuitId,
    pub circuit_name: String,
    pub field: FieldId,
    pub field_label: &'static str,
    pub severity: IssueSeverity,
    pub message: String,
}

/// Rollup over a circuit collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScheduleReport {
    pub issues: Vec<Issue>,
    pub total_issues: usize,
    pub pass_count: usize,
    pub fail_count: usize,
    pub pending_count: usize,
    pub completion_percent: u8,
}

/// Run the circuit evaluator across the collection and collate the counts
/// and the bounded issue list.
pub fn collect_issues(engine: &ComplianceEngine, circuits: &[Circuit]) -> ScheduleReport {
    if circuits.is_empty() {
        return ScheduleReport::default();
    }

    let mut report = ScheduleReport::default();
    let mut issues = Vec::new();

    for circuit in circuits {
        let verdicts = engine.verdicts(circuit);

        match status::triage(&verdicts) {
            TriageClass::Pass => report.pass_count += 1,
            TriageClass::Fail => report.fail_count += 1,
            TriageClass::Pending => report.pending_count += 1,
        }

        append_issues(engine.catalog(), circuit, &verdicts, &mut issues);
    }

    report.total_issues = issues.len();
    issues.truncate(ISSUE_DISPLAY_LIMIT);
    report.issues = issues;
    report.completion_percent = (((report.pass_count + report.fail_count) as f64
        / circuits.len() as f64)
        * 100.0)
        .round() as u8;

    report
}

fn append_issues(
    catalog: &ThresholdCatalog,
    circuit: &Circuit,
    verdicts: &[FieldVerdict],
    issues: &mut Vec<Issue>,
) {
    for field in ISSUE_FIELDS {
        let verdict = verdicts
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.verdict)
            .unwrap_or(Verdict::Empty);

        if let Some((severity, message)) = issue_for(catalog, circuit, field, verdict) {
            issues.push(Issue {
                circuit_id: circuit.circuit_id.clone(),
                circuit_name: circuit.display_name(),
                field,
                field_label: field.label(),
                severity,
                message,
            });
        }
    }
}

fn issue_for(
    catalog: &ThresholdCatalog,
    circuit: &Circuit,
    field: FieldId,
    verdict: Verdict,
) -> Option<(IssueSeverity, String)> {
    match field {
        FieldId::Zs => {
            let measured = measured_value(circuit, field)?;
            let limit = circuit.max_zs.unwrap_or(catalog.default_limit_ohms);
            match verdict {
                Verdict::Fail => Some((
                    IssueSeverity::Error,
                    format!("Zs exceeds maximum ({measured}Ω > {limit}Ω)"),
                )),
                Verdict::Warning => Some((
                    IssueSeverity::Warning,
                    format!("Zs approaching maximum ({measured}Ω of {limit}Ω)"),
                )),
                _ => None,
            }
        }
        FieldId::RcdOneX => {
            let measured = measured_value(circuit, field)?;
            let ceiling = catalog.rcd_trip_fail_ms;
            match verdict {
                Verdict::Fail => Some((
                    IssueSeverity::Error,
                    format!("RCD trip time at or above {ceiling}ms limit ({measured}ms)"),
                )),
                Verdict::Warning => Some((
                    IssueSeverity::Warning,
                    format!("RCD trip time approaching {ceiling}ms limit ({measured}ms)"),
                )),
                _ => None,
            }
        }
        FieldId::InsulationLiveEarth | FieldId::InsulationLiveNeutral => {
            let floor = catalog.insulation_warn_megohm;
            match verdict {
                Verdict::Fail => {
                    let measured = measured_value(circuit, field)?;
                    Some((
                        IssueSeverity::Error,
                        format!("{} below {floor}MΩ ({measured}MΩ)", field.label()),
                    ))
                }
                Verdict::Warning => {
                    let measured = measured_value(circuit, field)?;
                    Some((
                        IssueSeverity::Warning,
                        format!("{} marginal ({measured}MΩ, minimum {floor}MΩ)", field.label()),
                    ))
                }
                _ => None,
            }
        }
        FieldId::Polarity => match verdict {
            Verdict::Fail => Some((IssueSeverity::Error, "Polarity incorrect".to_string())),
            _ => None,
        },
        FieldId::RcdTestButton => match verdict {
            Verdict::Fail => Some((IssueSeverity::Error, "RCD test button failed".to_string())),
            _ => None,
        },
        _ => None,
    }
}

fn measured_value(circuit: &Circuit, field: FieldId) -> Option<f64> {
    circuit
        .readings
        .value(field)
        .and_then(parse_measurement)
        .map(|measurement| measurement.value)
}
