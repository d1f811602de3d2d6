//! Month view data: Monday-first weeks with per-day appointment counts.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::config::BusinessConfig;
use crate::error::{Result, ScheduleError};
use crate::schedule::{Appointment, AppointmentStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub scheduled: usize,
    pub confirmed: usize,
    pub cancelled: usize,
    pub completed: usize,
}

impl StatusCounts {
    fn record(&mut self, status: AppointmentStatus) {
        match status {
            AppointmentStatus::Scheduled => self.scheduled += 1,
            AppointmentStatus::Confirmed => self.confirmed += 1,
            AppointmentStatus::Cancelled => self.cancelled += 1,
            AppointmentStatus::Completed => self.completed += 1,
        }
    }

    /// Appointments that still hold a chair.
    pub fn active(&self) -> usize {
        self.scheduled + self.confirmed + self.completed
    }

    pub fn total(&self) -> usize {
        self.active() + self.cancelled
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for the leading/trailing days borrowed from adjacent months.
    pub in_month: bool,
    pub working_day: bool,
    pub appointments: StatusCounts,
}

/// Whole weeks (Monday to Sunday) covering `month` of `year`.
///
/// # Errors
/// Returns `ScheduleError::InvalidDate` if the year/month pair does not exist.
pub fn month_grid(
    year: i32,
    month: u32,
    config: &BusinessConfig,
    appointments: &[Appointment],
) -> Result<Vec<CalendarDay>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ScheduleError::InvalidDate(format!("{:04}-{:02}", year, month)))?;
    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| ScheduleError::InvalidDate(format!("{:04}-{:02}", year, month)))?;
    let last = next_month_first - Duration::days(1);

    let grid_start = first - Duration::days(i64::from(first.weekday().num_days_from_monday()));
    let grid_end = last + Duration::days(i64::from(6 - last.weekday().num_days_from_monday()));

    Ok(grid_start
        .iter_days()
        .take_while(|d| *d <= grid_end)
        .map(|date| {
            let mut counts = StatusCounts::default();
            appointments
                .iter()
                .filter(|a| a.date == date)
                .for_each(|a| counts.record(a.status));
            CalendarDay {
                date,
                in_month: date.month() == month,
                working_day: config.is_date_available(date),
                appointments: counts,
            }
        })
        .collect())
}
