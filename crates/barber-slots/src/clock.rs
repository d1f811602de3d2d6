//! Time-of-day and calendar-date helpers shared by every scheduling module.
//!
//! Raw storage hands times back as `"13:00:00"` and dates occasionally as
//! `"15/09/2025"`. Everything is normalized here, at the boundary, so the rest
//! of the crate only ever sees `NaiveTime` / `NaiveDate`.
//!
//! Occupancy is reported on a grid of [`TICK_MINUTES`]-minute cells aligned
//! with the slot grid, i.e. with opening time.

use crate::error::{Result, ScheduleError};
use chrono::{NaiveDate, NaiveTime, Timelike};

/// Granularity of the slot grid and of occupancy tracking, in minutes.
pub const TICK_MINUTES: u32 = 15;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parse `"HH:MM"` or `"HH:MM:SS"` into a time of day. Seconds are dropped.
///
/// # Errors
/// Returns `ScheduleError::InvalidTime` for anything else.
pub fn parse_time(raw: &str) -> Result<NaiveTime> {
    let trimmed = raw.trim();
    let parsed = NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| ScheduleError::InvalidTime(raw.to_string()))?;
    // Seconds never carry meaning in a booking.
    Ok(parsed.with_second(0).unwrap_or(parsed))
}

/// Format a time of day as `"HH:MM"`.
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Normalize a raw stored time string to `"HH:MM"`.
pub fn normalize_time(raw: &str) -> Result<String> {
    parse_time(raw).map(format_time)
}

/// Parse `"YYYY-MM-DD"` (canonical) or `"DD/MM/YYYY"` (legacy rows).
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .map_err(|_| ScheduleError::InvalidDate(raw.to_string()))
}

/// Minutes elapsed since midnight.
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// The time of day `minutes` after midnight, or `None` past the end of the day.
pub fn time_at(minutes: u32) -> Option<NaiveTime> {
    if minutes >= MINUTES_PER_DAY {
        return None;
    }
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// Every grid cell touched by the half-open interval `[start, start + duration)`.
///
/// Cells are [`TICK_MINUTES`] wide and aligned with `origin`, the first slot of
/// the day. An interval that starts on the grid expands tick by tick from its
/// start; one that starts off-grid still claims the cell it starts in. The
/// sliver before the first aligned cell is labelled `00:00`. Cells past
/// midnight are dropped.
pub fn covered_ticks(origin: NaiveTime, start: NaiveTime, duration_minutes: u32) -> Vec<NaiveTime> {
    let start_min = minute_of_day(start);
    let end_min = start_min.saturating_add(duration_minutes).min(MINUTES_PER_DAY);
    if start_min >= end_min {
        return Vec::new();
    }

    let phase = minute_of_day(origin) % TICK_MINUTES;
    let offset = (start_min + TICK_MINUTES - phase) % TICK_MINUTES;

    let mut ticks = Vec::new();
    let mut cell = match start_min.checked_sub(offset) {
        Some(cell) => cell,
        None => {
            ticks.push(NaiveTime::MIN);
            phase
        }
    };
    while cell < end_min {
        if let Some(t) = time_at(cell) {
            ticks.push(t);
        }
        cell += TICK_MINUTES;
    }
    ticks
}

/// Serde adapter for times stored as `"HH:MM"` / `"HH:MM:SS"`, always written as `"HH:MM"`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for dates stored as `"YYYY-MM-DD"` or `"DD/MM/YYYY"`.
pub mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(serde::de::Error::custom)
    }
}
