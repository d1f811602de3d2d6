//! Tests for the appointment status machine and the cancellation window.

use barber_slots::config::BusinessConfig;
use barber_slots::lifecycle::can_cancel;
use barber_slots::schedule::{Appointment, AppointmentStatus};
use barber_slots::ScheduleError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use AppointmentStatus::{Cancelled, Completed, Confirmed, Scheduled};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    day().and_time(t(h, m))
}

fn appt(id: &str, start: NaiveTime, status: AppointmentStatus) -> Appointment {
    Appointment {
        id: id.to_string(),
        barber_id: "b1".to_string(),
        client_id: "c".to_string(),
        date: day(),
        start,
        service_key: "adulto".to_string(),
        duration_minutes: Some(30),
        status,
        price: Some(15000),
        notes: None,
        paid: false,
    }
}

// ── Transitions ─────────────────────────────────────────────────────────────

#[test]
fn normal_path_is_allowed() {
    assert!(Scheduled.can_transition_to(Confirmed));
    assert!(Confirmed.can_transition_to(Completed));
    assert!(Scheduled.can_transition_to(Cancelled));
    assert!(Confirmed.can_transition_to(Cancelled));
}

#[test]
fn completed_is_terminal() {
    assert!(Completed.is_terminal());
    assert!(!Completed.can_transition_to(Cancelled));
    assert!(!Completed.can_transition_to(Scheduled));
    assert!(Completed.can_transition_to(Completed));
}

#[test]
fn cancelled_cannot_jump_to_completed() {
    assert!(!Cancelled.can_transition_to(Completed));
}

#[test]
fn forbidden_transition_leaves_record_untouched() {
    let config = BusinessConfig::default();
    let mut done = appt("a", t(9, 0), Completed);
    let before = done.clone();

    let err = done.transition(Scheduled, &[], &config).unwrap_err();

    assert!(matches!(err, ScheduleError::InvalidTransition { .. }));
    assert_eq!(done, before);
}

#[test]
fn confirm_then_complete() {
    let config = BusinessConfig::default();
    let mut a = appt("a", t(9, 0), Scheduled);

    a.transition(Confirmed, &[], &config).unwrap();
    a.transition(Completed, &[], &config).unwrap();
    assert_eq!(a.status, Completed);
}

// ── Reactivation ────────────────────────────────────────────────────────────

#[test]
fn reactivation_rejected_when_slot_was_taken() {
    let config = BusinessConfig::default();
    let mut cancelled = appt("a", t(9, 0), Cancelled);
    let before = cancelled.clone();
    let others = vec![cancelled.clone(), appt("b", t(9, 15), Confirmed)];

    let err = cancelled.transition(Scheduled, &others, &config).unwrap_err();

    assert!(matches!(err, ScheduleError::SlotTaken { ref conflicting_id, .. } if conflicting_id == "b"));
    assert_eq!(cancelled, before, "record must stay cancelled");
}

#[test]
fn reactivation_accepted_when_slot_is_free() {
    let config = BusinessConfig::default();
    let mut cancelled = appt("a", t(9, 0), Cancelled);
    let others = vec![appt("b", t(9, 30), Confirmed)];

    cancelled.transition(Confirmed, &others, &config).unwrap();
    assert_eq!(cancelled.status, Confirmed);
}

#[test]
fn reactivation_ignores_other_cancelled_bookings() {
    let config = BusinessConfig::default();
    let mut cancelled = appt("a", t(9, 0), Cancelled);
    let others = vec![appt("b", t(9, 0), Cancelled)];

    assert!(cancelled.transition(Scheduled, &others, &config).is_ok());
}

// ── Cancellation window ─────────────────────────────────────────────────────

#[test]
fn cancel_allowed_outside_notice_period() {
    let config = BusinessConfig::default();
    let a = appt("a", t(15, 0), Scheduled);

    assert!(can_cancel(&a, at(12, 59), &config));
    assert!(!can_cancel(&a, at(13, 0), &config), "exactly two hours before is too late");
    assert!(!can_cancel(&a, at(14, 0), &config));
}

#[test]
fn cannot_cancel_finished_or_cancelled_work() {
    let config = BusinessConfig::default();
    assert!(!can_cancel(&appt("a", t(15, 0), Completed), at(8, 0), &config));
    assert!(!can_cancel(&appt("b", t(15, 0), Cancelled), at(8, 0), &config));
}

#[test]
fn notice_period_comes_from_config() {
    let config = BusinessConfig {
        cancellation_notice_minutes: 0,
        ..BusinessConfig::default()
    };
    let a = appt("a", t(15, 0), Confirmed);
    assert!(can_cancel(&a, at(14, 59), &config));
}
