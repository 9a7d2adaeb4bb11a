use crate::schedule::domain::FieldId;
use serde::{Deserialize, Serialize};

/// Fallback ceiling applied when a limit-compared field arrives without a
/// configured `maxZs`.
pub const DEFAULT_LIMIT_OHMS: f64 = 999.0;

/// Fixed precedence used to pick the headline failure when several fields
/// fail at once. Earlier entries win.
pub const FAILURE_PRECEDENCE: [FieldId; 10] = [
    FieldId::Zs,
    FieldId::RcdOneX,
    FieldId::InsulationLiveEarth,
    FieldId::InsulationLiveNeutral,
    FieldId::R1R2,
    FieldId::Polarity,
    FieldId::RcdTestButton,
    FieldId::AfddTest,
    FieldId::FunctionalTesting,
    FieldId::RcdFiveX,
];

/// Token vocabulary for a categorical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSet {
    Polarity,
    CheckResult,
}

const POLARITY_PASS_TOKENS: &[&str] = &["correct", "satisfactory", "✓"];
const POLARITY_FAIL_TOKENS: &[&str] = &["incorrect", "✗"];
const CHECK_PASS_TOKENS: &[&str] = &["✓", "pass"];
const CHECK_FAIL_TOKENS: &[&str] = &["✗", "fail"];

impl TokenSet {
    /// Map a raw token to a satisfactory/unsatisfactory outcome. Unrecognized
    /// tokens map to `None` so a stray entry is never reported as a failure.
    pub(crate) fn outcome(self, raw: &str) -> Option<bool> {
        let token = raw.trim().to_lowercase();
        let (pass, fail) = match self {
            TokenSet::Polarity => (POLARITY_PASS_TOKENS, POLARITY_FAIL_TOKENS),
            TokenSet::CheckResult => (CHECK_PASS_TOKENS, CHECK_FAIL_TOKENS),
        };

        if pass.contains(&token.as_str()) {
            Some(true)
        } else if fail.contains(&token.as_str()) {
            Some(false)
        } else {
            None
        }
    }
}

/// Comparison rule for one measured field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRule {
    /// Lower is better, banded as fractions of a circuit-specific limit.
    LimitFraction { pass_below: f64, warn_below: f64 },
    /// Higher is better, in MΩ. A leading `>` reads as off-scale good.
    MinimumMegohm { pass_at: f64, warn_at: f64 },
    /// Lower is better, in ms, against a fixed regulatory ceiling.
    TripTime { pass_below: f64, fail_at: f64 },
    /// Token-mapped outcome with no numeric comparison.
    Categorical(TokenSet),
}

/// Single source of truth for every compliance threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdCatalog {
    pub continuity_pass_fraction: f64,
    pub continuity_warn_fraction: f64,
    pub zs_pass_fraction: f64,
    pub zs_warn_fraction: f64,
    pub insulation_pass_megohm: f64,
    pub insulation_warn_megohm: f64,
    pub rcd_trip_pass_ms: f64,
    pub rcd_trip_fail_ms: f64,
    pub default_limit_ohms: f64,
}

impl Default for ThresholdCatalog {
    fn default() -> Self {
        Self {
            continuity_pass_fraction: 0.5,
            continuity_warn_fraction: 1.0,
            zs_pass_fraction: 0.8,
            zs_warn_fraction: 1.0,
            insulation_pass_megohm: 200.0,
            insulation_warn_megohm: 1.0,
            rcd_trip_pass_ms: 200.0,
            rcd_trip_fail_ms: 300.0,
            default_limit_ohms: DEFAULT_LIMIT_OHMS,
        }
    }
}

impl ThresholdCatalog {
    /// Look up the comparison rule for a field. Fields without an entry
    /// (`rcdFiveX`) are recorded on the schedule but never checked.
    pub fn rule(&self, field: FieldId) -> Option<FieldRule> {
        match field {
            FieldId::R1R2 => Some(FieldRule::LimitFraction {
                pass_below: self.continuity_pass_fraction,
                warn_below: self.continuity_warn_fraction,
            }),
            FieldId::Zs => Some(FieldRule::LimitFraction {
                pass_below: self.zs_pass_fraction,
                warn_below: self.zs_warn_fraction,
            }),
            FieldId::InsulationLiveEarth | FieldId::InsulationLiveNeutral => {
                Some(FieldRule::MinimumMegohm {
                    pass_at: self.insulation_pass_megohm,
                    warn_at: self.insulation_warn_megohm,
                })
            }
            FieldId::Polarity => Some(FieldRule::Categorical(TokenSet::Polarity)),
            FieldId::RcdOneX => Some(FieldRule::TripTime {
                pass_below: self.rcd_trip_pass_ms,
                fail_at: self.rcd_trip_fail_ms,
            }),
            FieldId::RcdTestButton | FieldId::AfddTest | FieldId::FunctionalTesting => {
                Some(FieldRule::Categorical(TokenSet::CheckResult))
            }
            FieldId::RcdFiveX => None,
        }
    }
}
