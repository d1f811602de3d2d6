//! Error types for barber-slots operations.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The requested date falls on a day the shop does not open.
    #[error("The shop is closed on {weekday} ({date})")]
    ClosedDay { date: NaiveDate, weekday: String },

    /// The requested start (or the service it carries) does not fit the opening hours.
    #[error("{time} is outside business hours")]
    OutsideHours { time: NaiveTime },

    #[error("{time} overlaps the lunch break")]
    LunchBreak { time: NaiveTime },

    /// Another active appointment for the same barber already holds the slot.
    #[error("This time is no longer available: {time} on {date} is taken by appointment {conflicting_id}")]
    SlotTaken {
        barber_id: String,
        date: NaiveDate,
        time: NaiveTime,
        conflicting_id: String,
    },

    /// "Any barber" booking found nobody free for the whole service.
    #[error("No barber is free at {time} on {date}")]
    NoBarberAvailable { date: NaiveDate, time: NaiveTime },

    #[error("Cannot move appointment from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Not found: {0}")]
    NotFound(String),

    /// A new booking reused the id of a stored appointment.
    #[error("Appointment {0} already exists")]
    DuplicateId(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
