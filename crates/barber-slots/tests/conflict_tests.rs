//! Tests for submit-time overlap detection.

use barber_slots::conflict::{
    ensure_no_conflict, find_conflicts, intervals_overlap, overlap_minutes, overlaps,
};
use barber_slots::config::BusinessConfig;
use barber_slots::schedule::{Appointment, AppointmentStatus};
use barber_slots::ScheduleError;
use chrono::{NaiveDate, NaiveTime};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn appt(id: &str, barber: &str, start: NaiveTime, duration: u32) -> Appointment {
    Appointment {
        id: id.to_string(),
        barber_id: barber.to_string(),
        client_id: "c".to_string(),
        date: day(),
        start,
        service_key: "adulto".to_string(),
        duration_minutes: Some(duration),
        status: AppointmentStatus::Confirmed,
        price: None,
        notes: None,
        paid: false,
    }
}

// ── overlaps() ──────────────────────────────────────────────────────────────

#[test]
fn identical_intervals_overlap() {
    assert!(overlaps("09:00", 30, "09:00", 30));
    assert!(overlaps("14:15", 60, "14:15", 60));
}

#[test]
fn back_to_back_intervals_do_not_overlap() {
    assert!(!overlaps("09:00", 30, "09:30", 30));
    assert!(!overlaps("09:30", 30, "09:00", 30));
}

#[test]
fn nested_interval_overlaps() {
    assert!(overlaps("09:00", 60, "09:30", 30));
    assert!(overlaps("09:30", 30, "09:00", 60));
}

#[test]
fn partial_overlap_detected_both_ways() {
    assert!(overlaps("09:00", 30, "09:15", 30));
    assert!(overlaps("09:15", 30, "09:00", 30));
}

#[test]
fn distant_intervals_do_not_overlap() {
    assert!(!overlaps("09:00", 30, "11:00", 30));
}

#[test]
fn seconds_in_stored_times_are_ignored() {
    assert!(overlaps("09:00:00", 30, "09:15", 30));
    assert!(!overlaps("09:00:00", 30, "09:30:00", 30));
}

#[test]
fn unparseable_time_fails_closed() {
    assert!(overlaps("nine", 30, "15:00", 30));
    assert!(overlaps("09:00", 30, "", 30));
    assert!(overlaps("25:99", 30, "25:99", 30));
}

#[test]
fn same_start_with_zero_duration_still_conflicts() {
    assert!(intervals_overlap(t(9, 0), 0, t(9, 0), 30));
}

// ── find_conflicts() ────────────────────────────────────────────────────────

#[test]
fn conflict_reports_overlap_minutes() {
    let config = BusinessConfig::default();
    let candidate = appt("new", "b1", t(9, 30), 60);
    let existing = vec![appt("old", "b1", t(9, 0), 60)];

    let conflicts = find_conflicts(&candidate, &existing, &config);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].existing.id, "old");
    assert_eq!(conflicts[0].overlap_minutes, 30);
}

#[test]
fn fully_contained_overlap_is_the_shorter_duration() {
    let config = BusinessConfig::default();
    let candidate = appt("new", "b1", t(9, 0), 120);
    let existing = vec![appt("old", "b1", t(9, 30), 30)];

    let conflicts = find_conflicts(&candidate, &existing, &config);
    assert_eq!(conflicts[0].overlap_minutes, 30);
}

#[test]
fn ignores_self_cancelled_and_other_barbers() {
    let config = BusinessConfig::default();
    let candidate = appt("x", "b1", t(9, 0), 30);
    let mut cancelled = appt("c", "b1", t(9, 0), 30);
    cancelled.status = AppointmentStatus::Cancelled;
    let mut other_day = appt("d", "b1", t(9, 0), 30);
    other_day.date = day().succ_opt().unwrap();
    let existing = vec![
        candidate.clone(),
        cancelled,
        other_day,
        appt("o", "b2", t(9, 0), 30),
    ];

    assert!(find_conflicts(&candidate, &existing, &config).is_empty());
    assert!(ensure_no_conflict(&candidate, &existing, &config).is_ok());
}

#[test]
fn every_conflict_is_listed() {
    let config = BusinessConfig::default();
    let candidate = appt("new", "b1", t(9, 0), 90);
    let existing = vec![
        appt("a", "b1", t(9, 0), 30),
        appt("b", "b1", t(10, 0), 30),
        appt("c", "b1", t(10, 30), 30),
    ];

    let ids: Vec<String> = find_conflicts(&candidate, &existing, &config)
        .into_iter()
        .map(|c| c.existing.id)
        .collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn ensure_no_conflict_names_the_blocking_appointment() {
    let config = BusinessConfig::default();
    let candidate = appt("new", "b1", t(9, 15), 30);
    let existing = vec![appt("old", "b1", t(9, 0), 30)];

    let err = ensure_no_conflict(&candidate, &existing, &config).unwrap_err();
    assert!(err.to_string().contains("no longer available"));
    match err {
        ScheduleError::SlotTaken {
            barber_id,
            time,
            conflicting_id,
            ..
        } => {
            assert_eq!(barber_id, "b1");
            assert_eq!(time, t(9, 15));
            assert_eq!(conflicting_id, "old");
        }
        other => panic!("expected SlotTaken, got {:?}", other),
    }
}

// ── Very long durations ─────────────────────────────────────────────────────

#[test]
fn maximal_duration_covers_everything_after_its_start() {
    assert!(overlaps("09:00", u32::MAX, "10:00", 30));
    assert!(overlaps("10:00", 30, "09:00", u32::MAX));
    assert!(intervals_overlap(t(9, 0), u32::MAX, t(23, 59), u32::MAX));
    assert!(!overlaps("10:00", u32::MAX, "09:00", 30));
}

#[test]
fn overlap_minutes_with_maximal_duration_is_the_shorter_interval() {
    assert_eq!(overlap_minutes(t(9, 0), u32::MAX, t(10, 0), 30), 30);
    assert_eq!(overlap_minutes(t(10, 0), 30, t(9, 0), u32::MAX), 30);
    assert_eq!(overlap_minutes(t(9, 0), 30, t(10, 0), u32::MAX), 0);
}

#[test]
fn stored_maximal_duration_blocks_later_candidates() {
    let config = BusinessConfig::default();
    let candidate = appt("new", "b1", t(17, 0), 30);
    let existing = vec![appt("huge", "b1", t(9, 0), u32::MAX)];

    let conflicts = find_conflicts(&candidate, &existing, &config);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].overlap_minutes, 30);
}
