//! # barber-slots
//!
//! Deterministic slot availability and booking-conflict checks for barbershop
//! scheduling.
//!
//! Given a shop's business hours, lunch break, service durations and the
//! appointments already on the books, the crate answers which start times can
//! still take a new booking and whether a submitted booking collides with
//! anything. All functions are pure: callers load a consistent snapshot of
//! config and appointments, then ask.
//!
//! ## Modules
//!
//! - [`clock`] — `HH:MM` parsing/normalization and the 15-minute tick grid
//! - [`config`] — Validated business-hours config built from a raw shop row
//! - [`schedule`] — Appointment, barber and status types
//! - [`slots`] — Candidate start times for a day
//! - [`occupancy`] — Grid cells already held by active appointments
//! - [`availability`] — Starts that fit a whole new service
//! - [`conflict`] — Submit-time overlap checks (fail closed)
//! - [`lifecycle`] — Status state machine and cancellation window
//! - [`booking`] — Store trait and the validated write path
//! - [`digest`] — WhatsApp message text (availability, reminders, confirmations)
//! - [`billing`] — Pending payments, settlement and price formatting
//! - [`calendar`] — Month grid with per-day counts
//! - [`error`] — Error types

pub mod availability;
pub mod billing;
pub mod booking;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod conflict;
pub mod digest;
pub mod error;
pub mod lifecycle;
pub mod occupancy;
pub mod schedule;
pub mod slots;

pub use availability::{available_starts, AvailabilityQuery};
pub use booking::{validate_booking, BookingDesk, MemoryStore, ScheduleStore, ShopSnapshot};
pub use config::{BusinessConfig, ShopProfile, ShopRecord};
pub use conflict::{find_conflicts, overlaps};
pub use error::ScheduleError;
pub use occupancy::{occupied_ticks, OccupiedSet};
pub use schedule::{Appointment, AppointmentStatus, Barber, BookingDraft};
pub use slots::generate_slots;

use chrono::NaiveDate;

/// Whether the shop opens on `date`.
pub fn is_date_available(date: NaiveDate, config: &BusinessConfig) -> bool {
    config.is_date_available(date)
}
