mod mapping;
mod parser;

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use super::domain::{CircuitSubmission, ProtectiveDevice, SubmissionError, TestReadings};

#[derive(Debug)]
pub enum ScheduleImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingDesignationColumn,
    Invalid(SubmissionError),
}

impl std::fmt::Display for ScheduleImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleImportError::Io(err) => write!(f, "failed to read schedule export: {}", err),
            ScheduleImportError::Csv(err) => write!(f, "invalid schedule CSV data: {}", err),
            ScheduleImportError::MissingDesignationColumn => {
                write!(f, "schedule export has no circuit designation column")
            }
            ScheduleImportError::Invalid(err) => {
                write!(f, "schedule row rejected at intake: {}", err)
            }
        }
    }
}

impl std::error::Error for ScheduleImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScheduleImportError::Io(err) => Some(err),
            ScheduleImportError::Csv(err) => Some(err),
            ScheduleImportError::MissingDesignationColumn => None,
            ScheduleImportError::Invalid(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ScheduleImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ScheduleImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<SubmissionError> for ScheduleImportError {
    fn from(err: SubmissionError) -> Self {
        Self::Invalid(err)
    }
}

/// Importer turning spreadsheet exports of a schedule of tests into circuit
/// submissions. Rows without a designation are skipped; duplicate
/// designations keep the first occurrence.
pub struct ScheduleCsvImporter;

impl ScheduleCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CircuitSubmission>, ScheduleImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CircuitSubmission>, ScheduleImportError> {
        let parsed = parser::parse_rows(reader)?;
        if !parsed.has_designation_column {
            return Err(ScheduleImportError::MissingDesignationColumn);
        }

        let mut submissions = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for row in parsed.rows {
            let Some(designation) = row.designation else {
                continue;
            };
            if !seen.insert(designation.to_lowercase()) {
                continue;
            }

            let mut readings = TestReadings::default();
            for (field, value) in row.readings {
                readings.set(field, Some(value));
            }

            submissions.push(CircuitSubmission {
                designation,
                description: row.description.unwrap_or_default(),
                device: ProtectiveDevice {
                    device_type: row.device_type.unwrap_or_default(),
                    rcd_rating: row.rcd_rating,
                    bs_standard: row.bs_standard,
                },
                max_zs: row.max_zs.as_deref().and_then(parse_limit),
                tested_on: row.tested_on.as_deref().and_then(parse_date),
                readings,
            });
        }

        Ok(submissions)
    }
}

/// Tolerant ceiling parse: strip a trailing unit, reject non-positive values.
fn parse_limit(raw: &str) -> Option<f64> {
    let trimmed = raw
        .trim()
        .trim_end_matches(|c| c == 'Ω' || c == 'ω')
        .trim();

    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .ok()
}
