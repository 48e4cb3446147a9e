use assert_matches::assert_matches;

use scheduling_cell::models::{AppointmentStatus, SchedulingError};
use scheduling_cell::services::LifecycleService;

#[test]
fn scheduled_permits_check_in_cancel_and_no_show() {
    let lifecycle = LifecycleService::new();

    for next in [
        AppointmentStatus::CheckedIn,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
    ] {
        assert!(lifecycle
            .validate_status_transition(AppointmentStatus::Scheduled, next)
            .is_ok());
    }
}

#[test]
fn checked_in_permits_complete_and_cancel_only() {
    let lifecycle = LifecycleService::new();

    assert!(lifecycle
        .validate_status_transition(AppointmentStatus::CheckedIn, AppointmentStatus::Completed)
        .is_ok());
    assert!(lifecycle
        .validate_status_transition(AppointmentStatus::CheckedIn, AppointmentStatus::Cancelled)
        .is_ok());
    assert_matches!(
        lifecycle.validate_status_transition(AppointmentStatus::CheckedIn, AppointmentStatus::NoShow),
        Err(SchedulingError::InvalidStatusTransition {
            from: AppointmentStatus::CheckedIn,
            to: AppointmentStatus::NoShow,
        })
    );
}

#[test]
fn scheduled_cannot_jump_straight_to_completed() {
    let lifecycle = LifecycleService::new();

    assert_matches!(
        lifecycle.validate_status_transition(AppointmentStatus::Scheduled, AppointmentStatus::Completed),
        Err(SchedulingError::InvalidStatusTransition { .. })
    );
}

#[test]
fn terminal_statuses_permit_no_transition() {
    let lifecycle = LifecycleService::new();

    for terminal in [
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
    ] {
        assert!(lifecycle.valid_transitions(terminal).is_empty());
        assert_matches!(
            lifecycle.validate_status_transition(terminal, AppointmentStatus::Scheduled),
            Err(SchedulingError::InvalidStatusTransition { .. })
        );
    }
}

#[test]
fn no_status_transitions_to_itself() {
    let lifecycle = LifecycleService::new();

    for status in [
        AppointmentStatus::Scheduled,
        AppointmentStatus::CheckedIn,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
    ] {
        assert!(!lifecycle.valid_transitions(status).contains(&status));
    }
}
