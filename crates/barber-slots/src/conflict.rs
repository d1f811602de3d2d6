//! Submit-time overlap checks between appointments.
//!
//! The slot list a user picked from can be stale by the time they submit, so
//! every save re-runs these checks against freshly loaded appointments.
//! Back-to-back appointments (one ends exactly when the next starts) do not
//! conflict. Anything that cannot be parsed is reported as a conflict.

use chrono::NaiveTime;

use crate::clock;
use crate::config::BusinessConfig;
use crate::error::{Result, ScheduleError};
use crate::schedule::Appointment;

/// An existing appointment colliding with a candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub existing: Appointment,
    pub overlap_minutes: u32,
}

/// Whether two `"HH:MM"` intervals `[start, start + duration)` overlap.
///
/// Fails closed: if either start cannot be parsed the answer is `true`, since a
/// spurious conflict can be retried and a missed one double-books a barber.
pub fn overlaps(start_a: &str, duration_a: u32, start_b: &str, duration_b: u32) -> bool {
    match (clock::parse_time(start_a), clock::parse_time(start_b)) {
        (Ok(a), Ok(b)) => intervals_overlap(a, duration_a, b, duration_b),
        _ => {
            tracing::warn!(start_a, start_b, "unparseable start time, treating as conflict");
            true
        }
    }
}

/// Typed form of [`overlaps`].
///
/// Two intervals overlap when their starts coincide or either start falls
/// strictly inside the other interval.
pub fn intervals_overlap(a: NaiveTime, duration_a: u32, b: NaiveTime, duration_b: u32) -> bool {
    let a_start = clock::minute_of_day(a);
    let b_start = clock::minute_of_day(b);
    let a_end = a_start.saturating_add(duration_a);
    let b_end = b_start.saturating_add(duration_b);

    a_start == b_start
        || (a_start > b_start && a_start < b_end)
        || (b_start > a_start && b_start < a_end)
}

/// Minutes shared by two intervals (0 when disjoint).
pub fn overlap_minutes(a: NaiveTime, duration_a: u32, b: NaiveTime, duration_b: u32) -> u32 {
    let a_start = clock::minute_of_day(a);
    let b_start = clock::minute_of_day(b);
    let start = a_start.max(b_start);
    let end = a_start
        .saturating_add(duration_a)
        .min(b_start.saturating_add(duration_b));
    end.saturating_sub(start)
}

/// Every active appointment of the candidate's barber and date that overlaps it.
///
/// The candidate itself (same id) and cancelled appointments are ignored.
pub fn find_conflicts(
    candidate: &Appointment,
    existing: &[Appointment],
    config: &BusinessConfig,
) -> Vec<Conflict> {
    let duration = candidate.effective_duration(config);

    existing
        .iter()
        .filter(|other| other.id != candidate.id)
        .filter(|other| other.is_active())
        .filter(|other| other.barber_id == candidate.barber_id && other.date == candidate.date)
        .filter_map(|other| {
            let other_duration = other.effective_duration(config);
            intervals_overlap(candidate.start, duration, other.start, other_duration).then(|| {
                Conflict {
                    existing: other.clone(),
                    overlap_minutes: overlap_minutes(
                        candidate.start,
                        duration,
                        other.start,
                        other_duration,
                    ),
                }
            })
        })
        .collect()
}

/// Reject `candidate` if it collides with any active appointment of its barber.
///
/// # Errors
/// Returns `ScheduleError::SlotTaken` naming the first conflicting appointment.
pub fn ensure_no_conflict(
    candidate: &Appointment,
    existing: &[Appointment],
    config: &BusinessConfig,
) -> Result<()> {
    match find_conflicts(candidate, existing, config).into_iter().next() {
        None => Ok(()),
        Some(conflict) => {
            tracing::debug!(
                candidate = %candidate.id,
                existing = %conflict.existing.id,
                overlap_minutes = conflict.overlap_minutes,
                "booking rejected"
            );
            Err(ScheduleError::SlotTaken {
                barber_id: candidate.barber_id.clone(),
                date: candidate.date,
                time: candidate.start,
                conflicting_id: conflict.existing.id,
            })
        }
    }
}
