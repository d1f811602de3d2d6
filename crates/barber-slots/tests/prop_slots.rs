//! Property-based tests for the slot grid and the availability filter.
//!
//! These hold for any sane business-hours config and any set of bookings,
//! not just the fixed examples in `slots_tests.rs` and `availability_tests.rs`.

use barber_slots::availability::{available_starts, AvailabilityQuery};
use barber_slots::booking::validate_booking;
use barber_slots::config::{BusinessConfig, LunchBreak};
use barber_slots::conflict::{intervals_overlap, overlaps};
use barber_slots::schedule::{Appointment, AppointmentStatus, Barber, BookingDraft};
use barber_slots::{clock, generate_slots};
use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn hm(minutes: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap()
}

/// Opening 06:00-10:45 and closing 15:00-22:00, any minute.
fn arb_hours() -> impl Strategy<Value = (u32, u32)> {
    (360u32..=645, 900u32..=1320)
}

/// Optional lunch starting 11:00-13:45 and lasting 15-90 minutes, any minute.
fn arb_lunch() -> impl Strategy<Value = Option<(u32, u32)>> {
    prop::option::of((660u32..=825, 15u32..=90))
}

fn arb_config() -> impl Strategy<Value = BusinessConfig> {
    (arb_hours(), arb_lunch()).prop_map(|((open, close), lunch)| BusinessConfig {
        opens_at: hm(open),
        closes_at: hm(close),
        lunch: lunch.map(|(start, len)| LunchBreak {
            start: hm(start),
            end: hm(start + len),
        }),
        ..BusinessConfig::default()
    })
}

/// Bookings for barber `b1` starting 08:00-18:00 at any minute. Lengths run
/// from a few minutes to past midnight.
fn arb_bookings() -> impl Strategy<Value = Vec<(u32, u32, bool)>> {
    let duration = prop_oneof![
        8 => 5u32..=90,
        1 => 91u32..=2000,
        1 => Just(u32::MAX),
    ];
    prop::collection::vec((480u32..=1080, duration, any::<bool>()), 0..8)
}

fn arb_hhmm() -> impl Strategy<Value = String> {
    (0u32..24, 0u32..60).prop_map(|(h, m)| format!("{:02}:{:02}", h, m))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn bookings(raw: &[(u32, u32, bool)]) -> Vec<Appointment> {
    raw.iter()
        .enumerate()
        .map(|(i, &(start, duration, cancelled))| Appointment {
            id: format!("a{}", i),
            barber_id: "b1".to_string(),
            client_id: String::new(),
            date: monday(),
            start: hm(start),
            service_key: "adulto".to_string(),
            duration_minutes: Some(duration),
            status: if cancelled {
                AppointmentStatus::Cancelled
            } else {
                AppointmentStatus::Scheduled
            },
            price: None,
            notes: None,
            paid: false,
        })
        .collect()
}

fn roster() -> Vec<Barber> {
    vec![Barber {
        id: "b1".to_string(),
        name: "Uno".to_string(),
        specialty: None,
        active: true,
    }]
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: the grid is strictly ascending, ticks from opening, inside hours, outside lunch
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn grid_is_well_formed(cfg in arb_config()) {
        let slots = generate_slots(&cfg);
        let valid = cfg.validate().is_ok();

        for pair in slots.windows(2) {
            prop_assert!(pair[0] < pair[1], "not strictly ascending: {:?}", pair);
        }
        if valid {
            for slot in &slots {
                prop_assert!(*slot >= cfg.opens_at && *slot <= cfg.closes_at);
                prop_assert!(!cfg.in_lunch(*slot), "{} falls in lunch", slot);
                let since_open = clock::minute_of_day(*slot) - clock::minute_of_day(cfg.opens_at);
                prop_assert_eq!(since_open % clock::TICK_MINUTES, 0);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: an offered start never overlaps an active booking
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn offered_starts_never_double_book(
        cfg in arb_config(),
        raw in arb_bookings(),
        service in prop_oneof![Just("adulto"), Just("combo")],
    ) {
        let appointments = bookings(&raw);
        let duration = cfg.service_duration(service);
        let query = AvailabilityQuery::new(monday(), service).with_barber("b1");

        for start in available_starts(&query, &cfg, &appointments, &roster()) {
            for a in appointments.iter().filter(|a| a.is_active()) {
                prop_assert!(
                    !intervals_overlap(start, duration, a.start, a.effective_duration(&cfg)),
                    "{} overlaps {}",
                    start,
                    a.id
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: availability is deterministic and a subset of the grid
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn availability_is_idempotent(cfg in arb_config(), raw in arb_bookings()) {
        let appointments = bookings(&raw);
        let query = AvailabilityQuery::new(monday(), "adulto");

        let first = available_starts(&query, &cfg, &appointments, &roster());
        let second = available_starts(&query, &cfg, &appointments, &roster());
        prop_assert_eq!(&first, &second);

        let grid = generate_slots(&cfg);
        for start in &first {
            prop_assert!(grid.contains(start));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: overlap is symmetric and reflexive for positive durations
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn overlap_is_symmetric(
        a in arb_hhmm(),
        b in arb_hhmm(),
        da in 1u32..=120,
        db in 1u32..=120,
    ) {
        prop_assert_eq!(overlaps(&a, da, &b, db), overlaps(&b, db, &a, da));
        prop_assert!(overlaps(&a, da, &a, da));
    }
}

// ---------------------------------------------------------------------------
// Property 5: every offered start is accepted by the booking validator
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn offered_starts_pass_validation(
        cfg in arb_config(),
        raw in arb_bookings(),
        service in prop_oneof![Just("adulto"), Just("combo")],
    ) {
        let appointments = bookings(&raw);
        let query = AvailabilityQuery::new(monday(), service).with_barber("b1");

        for start in available_starts(&query, &cfg, &appointments, &roster()) {
            let draft = BookingDraft {
                id: "new".to_string(),
                barber_id: "b1".to_string(),
                client_id: "c".to_string(),
                date: monday(),
                start,
                service_key: service.to_string(),
                notes: None,
            };
            let candidate = Appointment::book(draft, &cfg);
            let verdict = validate_booking(&candidate, &cfg, &appointments);
            prop_assert!(verdict.is_ok(), "{} offered but rejected: {:?}", start, verdict);
        }
    }
}
