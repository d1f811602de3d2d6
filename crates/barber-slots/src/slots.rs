//! The grid of candidate start times for a working day.

use chrono::NaiveTime;

use crate::clock::{self, TICK_MINUTES};
use crate::config::{BusinessConfig, LunchBreak};

/// Start times handed out when the config cannot produce a grid:
/// 08:00-11:30 and 13:00-17:30, every 30 minutes.
const FALLBACK_SLOTS: [(u32, u32); 18] = [
    (8, 0),
    (8, 30),
    (9, 0),
    (9, 30),
    (10, 0),
    (10, 30),
    (11, 0),
    (11, 30),
    (13, 0),
    (13, 30),
    (14, 0),
    (14, 30),
    (15, 0),
    (15, 30),
    (16, 0),
    (16, 30),
    (17, 0),
    (17, 30),
];

/// Day the fallback slots are cut from.
const FALLBACK_OPENS_AT: (u32, u32) = (8, 0);
const FALLBACK_CLOSES_AT: (u32, u32) = (18, 0);
const FALLBACK_LUNCH: ((u32, u32), (u32, u32)) = ((12, 0), (13, 0));

/// Opening hours the slot grid is actually built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridHours {
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    pub lunch: Option<LunchBreak>,
}

impl GridHours {
    /// Whether `[start, start + duration)` starts after opening, ends by
    /// closing and stays clear of lunch.
    pub fn fits(&self, start: NaiveTime, duration_minutes: u32) -> bool {
        let end = clock::minute_of_day(start).saturating_add(duration_minutes);
        if start < self.opens_at || end > clock::minute_of_day(self.closes_at) {
            return false;
        }
        !self
            .lunch
            .is_some_and(|l| l.intersects(start, duration_minutes))
    }
}

/// The config's own hours, or the fallback day (08:00-18:00, lunch 12:00-13:00)
/// when the config is inconsistent.
pub fn grid_hours(config: &BusinessConfig) -> GridHours {
    if config.validate().is_ok() {
        return GridHours {
            opens_at: config.opens_at,
            closes_at: config.closes_at,
            lunch: config.lunch,
        };
    }
    let hm = |(h, m): (u32, u32)| NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN);
    GridHours {
        opens_at: hm(FALLBACK_OPENS_AT),
        closes_at: hm(FALLBACK_CLOSES_AT),
        lunch: Some(LunchBreak {
            start: hm(FALLBACK_LUNCH.0),
            end: hm(FALLBACK_LUNCH.1),
        }),
    }
}

/// All candidate start times for a day, ascending and without duplicates.
///
/// Steps through the day in [`TICK_MINUTES`] increments from `opens_at` up to
/// and including `closes_at`, skipping every tick in `[lunch.start, lunch.end)`.
/// A config that breaks its own invariants yields [`fallback_slots`] instead of
/// an error.
pub fn generate_slots(config: &BusinessConfig) -> Vec<NaiveTime> {
    if let Err(e) = config.validate() {
        tracing::warn!(error = %e, "cannot build slot grid, using fallback slots");
        return fallback_slots();
    }

    let open = clock::minute_of_day(config.opens_at);
    let close = clock::minute_of_day(config.closes_at);

    (open..=close)
        .step_by(TICK_MINUTES as usize)
        .filter_map(clock::time_at)
        .filter(|t| !config.in_lunch(*t))
        .collect()
}

/// The fixed grid used when configuration is unusable.
pub fn fallback_slots() -> Vec<NaiveTime> {
    FALLBACK_SLOTS
        .iter()
        .filter_map(|&(h, m)| NaiveTime::from_hms_opt(h, m, 0))
        .collect()
}

/// Render slot times as `"HH:MM"` labels.
pub fn labels(slots: &[NaiveTime]) -> Vec<String> {
    slots.iter().map(|t| clock::format_time(*t)).collect()
}
