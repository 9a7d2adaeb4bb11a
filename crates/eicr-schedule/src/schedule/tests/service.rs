use std::sync::Arc;

use super::common::*;
use crate::schedule::domain::{CircuitId, FieldId, SubmissionError};
use crate::schedule::evaluation::StatusLevel;
use crate::schedule::service::{ScheduleService, ScheduleServiceError};
use crate::schedule::repository::RepositoryError;

#[test]
fn submit_assigns_a_sequential_identifier() {
    let (service, _repository) = build_service();

    let first = service.submit(submission("1A")).expect("submission accepted");
    let second = service.submit(submission("2B")).expect("submission accepted");

    assert!(first.circuit_id.0.starts_with("cct-"));
    assert!(second.circuit_id.0.starts_with("cct-"));
    assert_ne!(first.circuit_id, second.circuit_id);
    assert_eq!(first.designation, "1A");
    assert_eq!(first.status_label, "Not Started");
}

#[test]
fn submit_rejects_blank_designations() {
    let (service, _repository) = build_service();

    let error = service
        .submit(submission("   "))
        .expect_err("blank designation rejected");

    assert!(matches!(
        error,
        ScheduleServiceError::Submission(SubmissionError::MissingDesignation)
    ));
}

#[test]
fn submit_rejects_non_positive_limits() {
    let (service, _repository) = build_service();

    let mut bad = submission("3C");
    bad.max_zs = Some(0.0);
    let error = service.submit(bad).expect_err("limit rejected");

    assert!(matches!(
        error,
        ScheduleServiceError::Submission(SubmissionError::InvalidLimit { .. })
    ));
}

#[test]
fn record_reading_reevaluates_the_circuit() {
    let (service, _repository) = build_service();
    let created = service.submit(submission("1A")).expect("submission accepted");

    let view = service
        .record_reading(
            &created.circuit_id,
            FieldId::Zs,
            Some("1.5".to_string()),
        )
        .expect("reading recorded");
    assert_eq!(view.level, StatusLevel::Error);
    assert_eq!(view.status_label, "Zs Fail");

    let view = service
        .record_reading(&created.circuit_id, FieldId::Zs, None)
        .expect("reading cleared");
    assert_eq!(view.level, StatusLevel::Pending);
}

#[test]
fn record_reading_for_unknown_circuit_is_not_found() {
    let (service, _repository) = build_service();

    let error = service
        .record_reading(
            &CircuitId("cct-unknown".to_string()),
            FieldId::Zs,
            Some("0.4".to_string()),
        )
        .expect_err("unknown circuit rejected");

    assert!(matches!(
        error,
        ScheduleServiceError::Repository(RepositoryError::NotFound)
    ));
}

#[test]
fn report_is_memoized_until_a_write_invalidates_it() {
    let (service, repository) = build_service();
    let created = service.submit(submission("1A")).expect("submission accepted");

    let first = service.report().expect("report builds");
    let calls_after_first = repository.list_calls();
    let second = service.report().expect("report builds");

    assert_eq!(first, second);
    assert_eq!(
        repository.list_calls(),
        calls_after_first,
        "cached report must not re-read the repository"
    );

    service
        .record_reading(&created.circuit_id, FieldId::Zs, Some("9.9".to_string()))
        .expect("reading recorded");

    let third = service.report().expect("report builds");
    assert!(repository.list_calls() > calls_after_first);
    assert_ne!(first, third);
    assert_eq!(third.fail_count, 1);
}

#[test]
fn overview_reflects_repository_order() {
    let (service, _repository) = build_service();
    service.submit(submission("1A")).expect("submission accepted");
    service.submit(submission("2B")).expect("submission accepted");

    let overview = service.overview().expect("overview builds");

    let designations: Vec<&str> = overview
        .circuits
        .iter()
        .map(|view| view.designation.as_str())
        .collect();
    assert_eq!(designations, vec!["1A", "2B"]);
}

#[test]
fn unavailable_repository_surfaces_as_service_error() {
    let service = ScheduleService::new(Arc::new(UnavailableRepository), catalog());

    let error = service.report().expect_err("repository offline");

    assert!(matches!(
        error,
        ScheduleServiceError::Repository(RepositoryError::Unavailable(_))
    ));
}

#[test]
fn remove_drops_the_circuit_from_the_schedule() {
    let (service, _repository) = build_service();
    let created = service.submit(submission("1A")).expect("submission accepted");

    service.remove(&created.circuit_id).expect("circuit removed");

    let status = service
        .circuit_status(&created.circuit_id)
        .expect("lookup succeeds");
    assert!(status.is_none());
}
