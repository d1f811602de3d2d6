//! Appointment status transitions.
//!
//! ```text
//! scheduled ──> confirmed ──> completed
//!     │             │
//!     └──> cancelled <┘
//!              │
//!              └──> scheduled | confirmed   (only if the slot is still free)
//! ```
//!
//! Clients may cancel on their own only up to the shop's notice period, see
//! [`can_cancel`].

use chrono::{Duration, NaiveDateTime};

use crate::config::BusinessConfig;
use crate::conflict;
use crate::error::{Result, ScheduleError};
use crate::schedule::{Appointment, AppointmentStatus};

impl AppointmentStatus {
    /// Whether the state machine has an edge from `self` to `to`.
    ///
    /// Staying in the same state is always allowed. Reactivation edges out of
    /// `Cancelled` are listed here but still need a conflict check, see
    /// [`Appointment::transition`].
    pub fn can_transition_to(self, to: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, to),
            (Scheduled, Confirmed)
                | (Confirmed, Completed)
                | (Scheduled, Cancelled)
                | (Confirmed, Cancelled)
                | (Cancelled, Scheduled)
                | (Cancelled, Confirmed)
        ) || self == to
    }

    pub fn is_terminal(self) -> bool {
        self == AppointmentStatus::Completed
    }
}

impl Appointment {
    /// Move to status `to`, leaving `self` untouched on any error.
    ///
    /// Reactivating a cancelled appointment re-checks `others` (the barber's
    /// current bookings) and fails if the slot has since been taken.
    ///
    /// # Errors
    /// - `ScheduleError::InvalidTransition` if the state machine forbids the move.
    /// - `ScheduleError::SlotTaken` if reactivation would double-book the barber.
    pub fn transition(
        &mut self,
        to: AppointmentStatus,
        others: &[Appointment],
        config: &BusinessConfig,
    ) -> Result<()> {
        if self.status == to {
            return Ok(());
        }
        if !self.status.can_transition_to(to) {
            return Err(ScheduleError::InvalidTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }

        if self.status == AppointmentStatus::Cancelled && to.is_active() {
            let mut reactivated = self.clone();
            reactivated.status = to;
            conflict::ensure_no_conflict(&reactivated, others, config)?;
        }

        tracing::debug!(id = %self.id, from = %self.status, to = %to, "status changed");
        self.status = to;
        Ok(())
    }
}

/// Whether a client may still cancel `appointment` at `now`.
///
/// Only scheduled or confirmed appointments can be cancelled, and only while
/// the start is strictly later than `now` plus the shop's notice period.
pub fn can_cancel(appointment: &Appointment, now: NaiveDateTime, config: &BusinessConfig) -> bool {
    if !matches!(
        appointment.status,
        AppointmentStatus::Scheduled | AppointmentStatus::Confirmed
    ) {
        return false;
    }
    let starts_at = appointment.date.and_time(appointment.start);
    let deadline = now + Duration::minutes(i64::from(config.cancellation_notice_minutes));
    starts_at > deadline
}
