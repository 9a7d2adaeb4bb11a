use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for circuits on the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CircuitId(pub String);

/// Measured test quantities the engine knows how to classify. Descriptive
/// columns (cable size, reference method, ...) are deliberately absent:
/// they are recorded elsewhere and never compliance-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    #[serde(rename = "r1r2")]
    R1R2,
    Zs,
    InsulationLiveEarth,
    InsulationLiveNeutral,
    Polarity,
    RcdOneX,
    RcdFiveX,
    RcdTestButton,
    AfddTest,
    FunctionalTesting,
}

impl FieldId {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::R1R2,
            Self::Zs,
            Self::InsulationLiveEarth,
            Self::InsulationLiveNeutral,
            Self::Polarity,
            Self::RcdOneX,
            Self::RcdFiveX,
            Self::RcdTestButton,
            Self::AfddTest,
            Self::FunctionalTesting,
        ]
    }

    /// Wire key matching the serialized representation.
    pub const fn key(self) -> &'static str {
        match self {
            Self::R1R2 => "r1r2",
            Self::Zs => "zs",
            Self::InsulationLiveEarth => "insulationLiveEarth",
            Self::InsulationLiveNeutral => "insulationLiveNeutral",
            Self::Polarity => "polarity",
            Self::RcdOneX => "rcdOneX",
            Self::RcdFiveX => "rcdFiveX",
            Self::RcdTestButton => "rcdTestButton",
            Self::AfddTest => "afddTest",
            Self::FunctionalTesting => "functionalTesting",
        }
    }

    pub fn from_key(raw: &str) -> Option<Self> {
        Self::ordered().into_iter().find(|field| field.key() == raw)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::R1R2 => "R1+R2",
            Self::Zs => "Zs",
            Self::InsulationLiveEarth => "Insulation L-E",
            Self::InsulationLiveNeutral => "Insulation L-N",
            Self::Polarity => "Polarity",
            Self::RcdOneX => "RCD 1x",
            Self::RcdFiveX => "RCD 5x",
            Self::RcdTestButton => "RCD Test Button",
            Self::AfddTest => "AFDD Test",
            Self::FunctionalTesting => "Functional Testing",
        }
    }

    /// Headline label shown when this field fronts a failed circuit.
    pub const fn failure_label(self) -> &'static str {
        match self {
            Self::Zs => "Zs Fail",
            Self::R1R2 => "Continuity Fail",
            Self::InsulationLiveEarth | Self::InsulationLiveNeutral => "Insulation Fail",
            Self::Polarity => "Polarity Fail",
            Self::RcdOneX | Self::RcdFiveX | Self::RcdTestButton => "RCD Fail",
            Self::AfddTest => "AFDD Fail",
            Self::FunctionalTesting => "Functional Test Fail",
        }
    }
}

/// Raw reading strings exactly as captured on the schedule. Comparator
/// prefixes (`>`, `<`) are preserved; interpretation happens at evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestReadings {
    pub r1r2: Option<String>,
    pub zs: Option<String>,
    pub insulation_live_earth: Option<String>,
    pub insulation_live_neutral: Option<String>,
    pub polarity: Option<String>,
    pub rcd_one_x: Option<String>,
    pub rcd_five_x: Option<String>,
    pub rcd_test_button: Option<String>,
    pub afdd_test: Option<String>,
    pub functional_testing: Option<String>,
}

impl TestReadings {
    pub fn value(&self, field: FieldId) -> Option<&str> {
        let slot = match field {
            FieldId::R1R2 => &self.r1r2,
            FieldId::Zs => &self.zs,
            FieldId::InsulationLiveEarth => &self.insulation_live_earth,
            FieldId::InsulationLiveNeutral => &self.insulation_live_neutral,
            FieldId::Polarity => &self.polarity,
            FieldId::RcdOneX => &self.rcd_one_x,
            FieldId::RcdFiveX => &self.rcd_five_x,
            FieldId::RcdTestButton => &self.rcd_test_button,
            FieldId::AfddTest => &self.afdd_test,
            FieldId::FunctionalTesting => &self.functional_testing,
        };
        slot.as_deref()
    }

    /// Store a reading; blank input clears the slot.
    pub fn set(&mut self, field: FieldId, value: Option<String>) {
        let slot = match field {
            FieldId::R1R2 => &mut self.r1r2,
            FieldId::Zs => &mut self.zs,
            FieldId::InsulationLiveEarth => &mut self.insulation_live_earth,
            FieldId::InsulationLiveNeutral => &mut self.insulation_live_neutral,
            FieldId::Polarity => &mut self.polarity,
            FieldId::RcdOneX => &mut self.rcd_one_x,
            FieldId::RcdFiveX => &mut self.rcd_five_x,
            FieldId::RcdTestButton => &mut self.rcd_test_button,
            FieldId::AfddTest => &mut self.afdd_test,
            FieldId::FunctionalTesting => &mut self.functional_testing,
        };
        *slot = value.filter(|raw| !raw.trim().is_empty());
    }
}

/// Protective-device snapshot captured per circuit. The `maxZs` ceiling is
/// computed upstream from device rating tables and carried on the circuit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtectiveDevice {
    pub device_type: String,
    pub rcd_rating: Option<String>,
    pub bs_standard: Option<String>,
}

impl ProtectiveDevice {
    /// Whether the circuit carries RCD/RCBO protection. This decides
    /// RCD-field applicability; a recorded trip time alone does not.
    pub fn has_rcd(&self) -> bool {
        let mentions_rcd = |raw: &str| {
            let lowered = raw.to_ascii_lowercase();
            lowered.contains("rcd") || lowered.contains("rcbo")
        };
        mentions_rcd(&self.device_type)
            || self.rcd_rating.as_deref().map(mentions_rcd).unwrap_or(false)
    }
}

/// One circuit row on the schedule of tests. The engine only ever reads a
/// circuit; edits flow through the service layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    pub circuit_id: CircuitId,
    pub designation: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub device: ProtectiveDevice,
    #[serde(default)]
    pub max_zs: Option<f64>,
    #[serde(default)]
    pub tested_on: Option<NaiveDate>,
    #[serde(default)]
    pub readings: TestReadings,
}

impl Circuit {
    pub fn display_name(&self) -> String {
        if self.description.trim().is_empty() {
            self.designation.clone()
        } else {
            format!("{} ({})", self.designation, self.description)
        }
    }
}

/// Inbound circuit payload before an identifier is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitSubmission {
    pub designation: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub device: ProtectiveDevice,
    #[serde(default)]
    pub max_zs: Option<f64>,
    #[serde(default)]
    pub tested_on: Option<NaiveDate>,
    #[serde(default)]
    pub readings: TestReadings,
}

/// Intake violations raised before a submission becomes a circuit.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("circuit designation must not be blank")]
    MissingDesignation,
    #[error("maxZs must be a finite value above zero (found {found})")]
    InvalidLimit { found: f64 },
}

impl CircuitSubmission {
    /// Validate and promote the submission into a schedule circuit.
    pub fn into_circuit(self, circuit_id: CircuitId) -> Result<Circuit, SubmissionError> {
        if self.designation.trim().is_empty() {
            return Err(SubmissionError::MissingDesignation);
        }

        if let Some(limit) = self.max_zs {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(SubmissionError::InvalidLimit { found: limit });
            }
        }

        Ok(Circuit {
            circuit_id,
            designation: self.designation,
            description: self.description,
            device: self.device,
            max_zs: self.max_zs,
            tested_on: self.tested_on,
            readings: self.readings,
        })
    }
}
