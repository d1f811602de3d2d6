//! Which grid cells of a day are already held by active appointments.
//!
//! Each active appointment claims every [`TICK_MINUTES`](crate::clock::TICK_MINUTES)
//! cell its `[start, start + duration)` interval touches, so a 60-minute combo
//! blocks four consecutive cells and a 30-minute cut cannot squeeze into the
//! second half of it. Cells are aligned with the day's first slot. The set is
//! rebuilt on every query.
//!
//! Cells are what the calendar shows. [`OccupiedSet::is_free`] tests the
//! intervals underneath them, with the same rule as the submit-time overlap
//! check, so an offered start is never rejected on submit.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};

use crate::clock;
use crate::config::BusinessConfig;
use crate::conflict;
use crate::schedule::Appointment;
use crate::slots;

/// Grid cells taken on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupiedSet {
    origin: NaiveTime,
    ticks: BTreeSet<NaiveTime>,
    intervals: Vec<(NaiveTime, u32)>,
}

impl OccupiedSet {
    /// Empty set whose cells are aligned with `origin`.
    pub fn new(origin: NaiveTime) -> Self {
        Self {
            origin,
            ticks: BTreeSet::new(),
            intervals: Vec::new(),
        }
    }

    /// Mark every cell touched by `[start, start + duration)`.
    pub fn insert_interval(&mut self, start: NaiveTime, duration_minutes: u32) {
        self.ticks
            .extend(clock::covered_ticks(self.origin, start, duration_minutes));
        self.intervals.push((start, duration_minutes));
    }

    pub fn contains(&self, tick: NaiveTime) -> bool {
        self.ticks.contains(&tick)
    }

    /// True when `[start, start + duration)` overlaps none of the inserted intervals.
    pub fn is_free(&self, start: NaiveTime, duration_minutes: u32) -> bool {
        !self.intervals.iter().any(|&(taken, taken_minutes)| {
            conflict::intervals_overlap(start, duration_minutes, taken, taken_minutes)
        })
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Taken cells in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveTime> + '_ {
        self.ticks.iter().copied()
    }

    /// Taken cells as `"HH:MM"` labels, ascending.
    pub fn labels(&self) -> Vec<String> {
        self.iter().map(clock::format_time).collect()
    }
}

/// Cells held on `date` by non-cancelled appointments, optionally for one barber only.
///
/// Stored durations win; appointments without one fall back to the catalogue
/// duration of their service.
pub fn occupied_ticks(
    date: NaiveDate,
    appointments: &[Appointment],
    config: &BusinessConfig,
    barber_id: Option<&str>,
) -> OccupiedSet {
    occupied_ticks_excluding(date, appointments, config, barber_id, None)
}

/// Same as [`occupied_ticks`], ignoring the appointment with id `exclude_id`.
///
/// Used while editing, so an appointment never blocks itself.
pub fn occupied_ticks_excluding(
    date: NaiveDate,
    appointments: &[Appointment],
    config: &BusinessConfig,
    barber_id: Option<&str>,
    exclude_id: Option<&str>,
) -> OccupiedSet {
    let mut set = OccupiedSet::new(slots::grid_hours(config).opens_at);

    for appt in appointments {
        if appt.date != date || !appt.is_active() {
            continue;
        }
        if barber_id.is_some_and(|b| appt.barber_id != b) {
            continue;
        }
        if exclude_id.is_some_and(|id| appt.id == id) {
            continue;
        }
        set.insert_interval(appt.start, appt.effective_duration(config));
    }

    set
}
