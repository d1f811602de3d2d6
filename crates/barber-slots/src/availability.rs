//! Start times that can take a new appointment of a given service.
//!
//! Combines the slot grid with per-barber occupancy. A candidate is accepted
//! only when the *whole* new service fits: it overlaps no active booking, it
//! does not run into lunch, and it ends by closing time. Checking the start
//! cell alone would let a long service overrun the next booking.

use chrono::{NaiveDate, NaiveTime};

use crate::config::BusinessConfig;
use crate::occupancy::{self, OccupiedSet};
use crate::schedule::{Appointment, Barber};
use crate::slots;

/// What the caller wants to book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityQuery<'a> {
    pub date: NaiveDate,
    pub service_key: &'a str,
    /// `None` books with whichever active barber is free.
    pub barber_id: Option<&'a str>,
    /// The appointment being edited, if any. Its own cells never block it.
    pub exclude_appointment_id: Option<&'a str>,
}

impl<'a> AvailabilityQuery<'a> {
    pub fn new(date: NaiveDate, service_key: &'a str) -> Self {
        Self {
            date,
            service_key,
            barber_id: None,
            exclude_appointment_id: None,
        }
    }

    pub fn with_barber(mut self, barber_id: &'a str) -> Self {
        self.barber_id = Some(barber_id);
        self
    }

    pub fn editing(mut self, appointment_id: &'a str) -> Self {
        self.exclude_appointment_id = Some(appointment_id);
        self
    }
}

/// Start times on `query.date` that can hold the requested service, ascending.
///
/// With a barber selected only that barber's bookings count. Without one, a
/// start is offered when at least one active barber in `barbers` is free for
/// the full service; an empty roster treats the shop as a single chair.
///
/// When editing, the edited appointment's current start is always included so
/// an unchanged time can be kept.
pub fn available_starts(
    query: &AvailabilityQuery<'_>,
    config: &BusinessConfig,
    appointments: &[Appointment],
    barbers: &[Barber],
) -> Vec<NaiveTime> {
    let mut starts = Vec::new();

    if config.is_date_available(query.date) {
        let duration = config.service_duration(query.service_key);
        let chairs = chair_occupancy(query, config, appointments, barbers);

        starts = slots::generate_slots(config)
            .into_iter()
            .filter(|t| fits_business_day(config, *t, duration))
            .filter(|t| chairs.iter().any(|occ| occ.is_free(*t, duration)))
            .collect();
    }

    if let Some(own_start) = edited_start(query, appointments) {
        if let Err(pos) = starts.binary_search(&own_start) {
            starts.insert(pos, own_start);
        }
    }

    starts
}

/// Active barbers able to take `[start, start + duration)` on `date`, in roster order.
pub fn free_barbers_at<'b>(
    date: NaiveDate,
    start: NaiveTime,
    duration_minutes: u32,
    config: &BusinessConfig,
    appointments: &[Appointment],
    barbers: &'b [Barber],
) -> Vec<&'b Barber> {
    barbers
        .iter()
        .filter(|b| b.active)
        .filter(|b| {
            occupancy::occupied_ticks(date, appointments, config, Some(&b.id))
                .is_free(start, duration_minutes)
        })
        .collect()
}

/// Whether `[start, start + duration)` ends by closing time and stays clear of lunch.
///
/// A config that fails validation is measured against the fallback day the
/// fallback grid comes from.
pub fn fits_business_day(config: &BusinessConfig, start: NaiveTime, duration_minutes: u32) -> bool {
    slots::grid_hours(config).fits(start, duration_minutes)
}

/// One occupancy set per chair the query may book into.
fn chair_occupancy(
    query: &AvailabilityQuery<'_>,
    config: &BusinessConfig,
    appointments: &[Appointment],
    barbers: &[Barber],
) -> Vec<OccupiedSet> {
    let for_barber = |barber_id: Option<&str>| {
        occupancy::occupied_ticks_excluding(
            query.date,
            appointments,
            config,
            barber_id,
            query.exclude_appointment_id,
        )
    };

    if let Some(barber_id) = query.barber_id {
        return vec![for_barber(Some(barber_id))];
    }

    let roster: Vec<&Barber> = barbers.iter().filter(|b| b.active).collect();
    if roster.is_empty() {
        return vec![for_barber(None)];
    }
    roster.iter().map(|b| for_barber(Some(&b.id))).collect()
}

fn edited_start(query: &AvailabilityQuery<'_>, appointments: &[Appointment]) -> Option<NaiveTime> {
    let id = query.exclude_appointment_id?;
    appointments
        .iter()
        .find(|a| a.id == id && a.date == query.date)
        .map(|a| a.start)
}
