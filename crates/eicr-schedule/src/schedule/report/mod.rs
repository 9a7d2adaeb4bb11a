mod collector;
mod views;

pub use collector::{collect_issues, Issue, IssueSeverity, ScheduleReport, ISSUE_DISPLAY_LIMIT};
pub use views::{CircuitStatusView, ScheduleOverview};
