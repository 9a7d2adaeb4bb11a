//! Circuit schedule domain: the compliance evaluation engine plus the
//! intake, storage, reporting, and HTTP surfaces built around it.

pub mod domain;
mod evaluation;
pub mod import;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Circuit, CircuitId, CircuitSubmission, FieldId, ProtectiveDevice, SubmissionError,
    TestReadings,
};
pub use evaluation::{
    CircuitStatus, ComplianceEngine, FieldRule, FieldVerdict, StatusLevel, ThresholdCatalog,
    TokenSet, TriageClass, Verdict, DEFAULT_LIMIT_OHMS, FAILURE_PRECEDENCE,
};
pub use import::{ScheduleCsvImporter, ScheduleImportError};
pub use report::{
    collect_issues, CircuitStatusView, Issue, IssueSeverity, ScheduleOverview, ScheduleReport,
    ISSUE_DISPLAY_LIMIT,
};
pub use repository::{CircuitRepository, RepositoryError};
pub use router::schedule_router;
pub use service::{ScheduleService, ScheduleServiceError};
