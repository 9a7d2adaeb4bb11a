use super::catalog::{ThresholdCatalog, FAILURE_PRECEDENCE};
use super::field::evaluate_field;
use super::{CircuitStatus, FieldVerdict, StatusLevel, Verdict};
use crate::schedule::domain::{Circuit, FieldId};
use serde::{Deserialize, Serialize};

/// RCD-protection fields skipped entirely (not merely empty) when the
/// device carries no RCD. AFDD is a separate device and always applies.
const RCD_FIELDS: [FieldId; 3] = [FieldId::RcdOneX, FieldId::RcdFiveX, FieldId::RcdTestButton];

/// Fields whose failure flips the coarse dashboard triage. Continuity and
/// RCD trip time stay out of this set: they surface through the card status
/// and the issue list instead.
const TRIAGE_FAIL_FIELDS: [FieldId; 7] = [
    FieldId::Polarity,
    FieldId::RcdTestButton,
    FieldId::AfddTest,
    FieldId::FunctionalTesting,
    FieldId::Zs,
    FieldId::InsulationLiveEarth,
    FieldId::InsulationLiveNeutral,
];

/// The essential tests backing the completion percentage: continuity, loop
/// impedance, insulation (either conductor pair), polarity.
const ESSENTIAL_COUNT: usize = 4;

/// Coarse pass/fail/pending classification used by dashboard rollups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageClass {
    Pass,
    Fail,
    Pending,
}

impl TriageClass {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
            Self::Pending => "Pending",
        }
    }
}

/// Evaluate every applicable field on the circuit.
pub(crate) fn field_verdicts(catalog: &ThresholdCatalog, circuit: &Circuit) -> Vec<FieldVerdict> {
    let has_rcd = circuit.device.has_rcd();

    FieldId::ordered()
        .into_iter()
        .filter(|field| has_rcd || !RCD_FIELDS.contains(field))
        .map(|field| FieldVerdict {
            field,
            verdict: evaluate_field(catalog, field, circuit.readings.value(field), circuit.max_zs),
        })
        .collect()
}

fn verdict_of(verdicts: &[FieldVerdict], field: FieldId) -> Verdict {
    verdicts
        .iter()
        .find(|entry| entry.field == field)
        .map(|entry| entry.verdict)
        .unwrap_or(Verdict::Empty)
}

pub(crate) fn completion_percent(verdicts: &[FieldVerdict]) -> u8 {
    let insulation_done = verdict_of(verdicts, FieldId::InsulationLiveEarth) != Verdict::Empty
        || verdict_of(verdicts, FieldId::InsulationLiveNeutral) != Verdict::Empty;

    let essentials = [
        verdict_of(verdicts, FieldId::R1R2) != Verdict::Empty,
        verdict_of(verdicts, FieldId::Zs) != Verdict::Empty,
        insulation_done,
        verdict_of(verdicts, FieldId::Polarity) != Verdict::Empty,
    ];

    let done = essentials.iter().filter(|complete| **complete).count();
    ((done * 100) / ESSENTIAL_COUNT) as u8
}

/// Aggregate precedence, first match wins: any concrete fail beats every
/// completion-based state, full completion beats partial, partial beats
/// untouched.
pub(crate) fn circuit_status(verdicts: &[FieldVerdict]) -> CircuitStatus {
    let completion = completion_percent(verdicts);

    if let Some(failed) = FAILURE_PRECEDENCE
        .iter()
        .copied()
        .find(|field| verdict_of(verdicts, *field) == Verdict::Fail)
    {
        return CircuitStatus {
            level: StatusLevel::Error,
            label: failed.failure_label(),
            completion_percent: completion,
            failing_field: Some(failed),
        };
    }

    if completion == 100 {
        CircuitStatus {
            level: StatusLevel::Success,
            label: "Complete",
            completion_percent: completion,
            failing_field: None,
        }
    } else if completion > 0 {
        CircuitStatus {
            level: StatusLevel::Warning,
            label: "In Progress",
            completion_percent: completion,
            failing_field: None,
        }
    } else {
        CircuitStatus {
            level: StatusLevel::Pending,
            label: "Not Started",
            completion_percent: completion,
            failing_field: None,
        }
    }
}

/// Project the same verdict set into the coarse dashboard class.
pub(crate) fn triage(verdicts: &[FieldVerdict]) -> TriageClass {
    if TRIAGE_FAIL_FIELDS
        .iter()
        .any(|field| verdict_of(verdicts, *field) == Verdict::Fail)
    {
        return TriageClass::Fail;
    }

    if completion_percent(verdicts) == 0 {
        return TriageClass::Pending;
    }

    TriageClass::Pass
}
