//! Booking writes guarded by a fresh conflict check.
//!
//! The data-access layer sits behind [`ScheduleStore`]. Its one hard
//! requirement: an appointment saved through it must be visible to the very next
//! [`ScheduleStore::load_appointments`]. [`BookingDesk`] relies on that to turn
//! two concurrent submissions for the same slot into one success and one
//! [`ScheduleError::SlotTaken`]: every write re-reads the barber's day right
//! before validating.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::availability;
use crate::clock;
use crate::config::{self, BusinessConfig, ShopRecord};
use crate::conflict;
use crate::error::{Result, ScheduleError};
use crate::schedule::{Appointment, AppointmentStatus, Barber, BookingDraft, DateRange};
use crate::slots;

/// Read/write access to the shop's persisted scheduling data.
pub trait ScheduleStore {
    fn load_shop(&self) -> Result<ShopRecord>;

    fn load_barbers(&self) -> Result<Vec<Barber>>;

    /// Appointments whose date falls in `range`, optionally for one barber.
    fn load_appointments(
        &self,
        range: DateRange,
        barber_id: Option<&str>,
    ) -> Result<Vec<Appointment>>;

    fn find_appointment(&self, id: &str) -> Result<Option<Appointment>>;

    /// Insert or replace by id.
    fn save_appointment(&mut self, appointment: &Appointment) -> Result<()>;
}

/// Everything needed to answer scheduling questions for one shop, as one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopSnapshot {
    pub shop: ShopRecord,
    pub barbers: Vec<Barber>,
    pub appointments: Vec<Appointment>,
}

/// In-process [`ScheduleStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shop: ShopRecord,
    barbers: Vec<Barber>,
    appointments: Vec<Appointment>,
}

impl MemoryStore {
    pub fn new(shop: ShopRecord, barbers: Vec<Barber>) -> Self {
        Self {
            shop,
            barbers,
            appointments: Vec::new(),
        }
    }

    pub fn from_snapshot(snapshot: ShopSnapshot) -> Self {
        Self {
            shop: snapshot.shop,
            barbers: snapshot.barbers,
            appointments: snapshot.appointments,
        }
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }
}

impl ScheduleStore for MemoryStore {
    fn load_shop(&self) -> Result<ShopRecord> {
        Ok(self.shop.clone())
    }

    fn load_barbers(&self) -> Result<Vec<Barber>> {
        Ok(self.barbers.clone())
    }

    fn load_appointments(
        &self,
        range: DateRange,
        barber_id: Option<&str>,
    ) -> Result<Vec<Appointment>> {
        Ok(self
            .appointments
            .iter()
            .filter(|a| range.contains(a.date))
            .filter(|a| barber_id.is_none_or(|b| a.barber_id == b))
            .cloned()
            .collect())
    }

    fn find_appointment(&self, id: &str) -> Result<Option<Appointment>> {
        Ok(self.appointments.iter().find(|a| a.id == id).cloned())
    }

    fn save_appointment(&mut self, appointment: &Appointment) -> Result<()> {
        match self.appointments.iter_mut().find(|a| a.id == appointment.id) {
            Some(slot) => *slot = appointment.clone(),
            None => self.appointments.push(appointment.clone()),
        }
        Ok(())
    }
}

/// Check that `candidate` may be persisted next to `existing`.
///
/// Cancelled candidates always pass. Active ones must fall on a working day,
/// start on the slot grid, fit between opening and closing without touching
/// lunch, and not overlap another active appointment of the same barber.
///
/// # Errors
/// The first failing rule: `ClosedDay`, `InvalidTime` (off-grid start),
/// `OutsideHours`, `LunchBreak` or `SlotTaken`.
pub fn validate_booking(
    candidate: &Appointment,
    config: &BusinessConfig,
    existing: &[Appointment],
) -> Result<()> {
    if !candidate.is_active() {
        return Ok(());
    }

    if !config.is_date_available(candidate.date) {
        return Err(ScheduleError::ClosedDay {
            date: candidate.date,
            weekday: config::weekday_label(candidate.date.weekday()).to_string(),
        });
    }

    if !slots::generate_slots(config).contains(&candidate.start) {
        return Err(ScheduleError::InvalidTime(format!(
            "{} is not a bookable start time",
            clock::format_time(candidate.start)
        )));
    }

    let duration = candidate.effective_duration(config);
    if !availability::fits_business_day(config, candidate.start, duration) {
        let runs_into_lunch = slots::grid_hours(config)
            .lunch
            .is_some_and(|l| l.intersects(candidate.start, duration));
        return Err(if runs_into_lunch {
            ScheduleError::LunchBreak {
                time: candidate.start,
            }
        } else {
            ScheduleError::OutsideHours {
                time: candidate.start,
            }
        });
    }

    conflict::ensure_no_conflict(candidate, existing, config)
}

/// Write path for appointments: load, validate, save.
pub struct BookingDesk<S> {
    store: S,
}

impl<S: ScheduleStore> BookingDesk<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Current config, or the defaults if the shop row cannot be loaded.
    pub fn config(&self) -> BusinessConfig {
        match self.store.load_shop() {
            Ok(record) => BusinessConfig::from_record(&record),
            Err(e) => {
                tracing::warn!(error = %e, "shop config unavailable, using defaults");
                BusinessConfig::default()
            }
        }
    }

    /// Book a new appointment.
    ///
    /// An empty `draft.barber_id` books with the first active barber free for
    /// the whole service. Edits go through [`BookingDesk::update`]: a draft
    /// reusing a stored id fails with `DuplicateId`.
    pub fn book(&mut self, mut draft: BookingDraft) -> Result<Appointment> {
        if self.store.find_appointment(&draft.id)?.is_some() {
            return Err(ScheduleError::DuplicateId(draft.id));
        }
        let config = self.config();

        if draft.barber_id.is_empty() {
            draft.barber_id = self.pick_barber(&draft, &config)?;
        }

        let appointment = Appointment::book(draft, &config);
        let existing = self.store.load_appointments(
            DateRange::day(appointment.date),
            Some(&appointment.barber_id),
        )?;
        validate_booking(&appointment, &config, &existing)?;

        self.store.save_appointment(&appointment)?;
        tracing::debug!(
            id = %appointment.id,
            barber = %appointment.barber_id,
            date = %appointment.date,
            start = %clock::format_time(appointment.start),
            "appointment booked"
        );
        Ok(appointment)
    }

    /// Save an edited appointment.
    ///
    /// A changed service re-snapshots duration and price. An appointment whose
    /// date, time, barber and service are unchanged keeps its slot even if the
    /// rules have moved since; it is still checked for overlaps.
    pub fn update(&mut self, mut appointment: Appointment) -> Result<Appointment> {
        let config = self.config();
        let previous = self
            .store
            .find_appointment(&appointment.id)?
            .ok_or_else(|| ScheduleError::NotFound(format!("appointment {}", appointment.id)))?;

        if !previous.status.can_transition_to(appointment.status) {
            return Err(ScheduleError::InvalidTransition {
                from: previous.status.to_string(),
                to: appointment.status.to_string(),
            });
        }

        if appointment.service_key != previous.service_key {
            let key = appointment.service_key.clone();
            appointment.change_service(&key, &config);
        }

        let existing = self.store.load_appointments(
            DateRange::day(appointment.date),
            Some(&appointment.barber_id),
        )?;

        let unchanged_slot = appointment.date == previous.date
            && appointment.start == previous.start
            && appointment.barber_id == previous.barber_id
            && appointment.service_key == previous.service_key;
        if unchanged_slot && appointment.is_active() {
            conflict::ensure_no_conflict(&appointment, &existing, &config)?;
        } else {
            validate_booking(&appointment, &config, &existing)?;
        }

        self.store.save_appointment(&appointment)?;
        Ok(appointment)
    }

    /// Change only the status of a stored appointment.
    pub fn set_status(&mut self, id: &str, to: AppointmentStatus) -> Result<Appointment> {
        let config = self.config();
        let mut appointment = self
            .store
            .find_appointment(id)?
            .ok_or_else(|| ScheduleError::NotFound(format!("appointment {}", id)))?;

        let others = self.store.load_appointments(
            DateRange::day(appointment.date),
            Some(&appointment.barber_id),
        )?;
        appointment.transition(to, &others, &config)?;

        self.store.save_appointment(&appointment)?;
        Ok(appointment)
    }

    fn pick_barber(&self, draft: &BookingDraft, config: &BusinessConfig) -> Result<String> {
        let barbers = self.store.load_barbers()?;
        let day = self.store.load_appointments(DateRange::day(draft.date), None)?;
        let duration = config.service_duration(&draft.service_key);

        availability::free_barbers_at(draft.date, draft.start, duration, config, &day, &barbers)
            .first()
            .map(|b| b.id.clone())
            .ok_or(ScheduleError::NoBarberAvailable {
                date: draft.date,
                time: draft.start,
            })
    }
}
