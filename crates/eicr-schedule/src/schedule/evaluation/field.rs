use super::catalog::{FieldRule, ThresholdCatalog};
use super::Verdict;
use crate::schedule::domain::FieldId;

/// A parsed measurement: optional comparator prefix plus the numeric body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Measurement {
    pub(crate) comparator: Option<char>,
    pub(crate) value: f64,
}

/// Strip one leading `>`/`<` and parse the remainder. Returns `None` for
/// blank or non-numeric text so a typo never turns into a verdict.
pub(crate) fn parse_measurement(raw: &str) -> Option<Measurement> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (comparator, body) = match trimmed.chars().next() {
        Some(prefix @ ('>' | '<')) => (Some(prefix), trimmed[prefix.len_utf8()..].trim_start()),
        _ => (None, trimmed),
    };

    body.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| Measurement { comparator, value })
}

/// Classify a single raw reading against its catalog rule.
pub(crate) fn evaluate_field(
    catalog: &ThresholdCatalog,
    field: FieldId,
    raw: Option<&str>,
    limit: Option<f64>,
) -> Verdict {
    let raw = match raw {
        Some(value) if !value.trim().is_empty() => value,
        _ => return Verdict::Empty,
    };

    let Some(rule) = catalog.rule(field) else {
        return Verdict::Empty;
    };

    match rule {
        FieldRule::Categorical(tokens) => match tokens.outcome(raw) {
            Some(true) => Verdict::Pass,
            Some(false) => Verdict::Fail,
            None => Verdict::Empty,
        },
        FieldRule::MinimumMegohm { pass_at, warn_at } => {
            let Some(measurement) = parse_measurement(raw) else {
                return Verdict::Empty;
            };
            // `>` marks an off-scale reading: at least this good, actual value unmeasured.
            if measurement.comparator == Some('>') {
                return Verdict::Pass;
            }
            if measurement.value >= pass_at {
                Verdict::Pass
            } else if measurement.value >= warn_at {
                Verdict::Warning
            } else {
                Verdict::Fail
            }
        }
        FieldRule::LimitFraction {
            pass_below,
            warn_below,
        } => {
            let Some(measurement) = parse_measurement(raw) else {
                return Verdict::Empty;
            };
            let ceiling = limit.unwrap_or(catalog.default_limit_ohms);
            if measurement.value <= ceiling * pass_below {
                Verdict::Pass
            } else if measurement.value <= ceiling * warn_below {
                Verdict::Warning
            } else {
                Verdict::Fail
            }
        }
        FieldRule::TripTime {
            pass_below,
            fail_at,
        } => {
            let Some(measurement) = parse_measurement(raw) else {
                return Verdict::Empty;
            };
            if measurement.value < pass_below {
                Verdict::Pass
            } else if measurement.value < fail_at {
                Verdict::Warning
            } else {
                Verdict::Fail
            }
        }
    }
}
