//! Business-hours configuration.
//!
//! The stored shop row ([`ShopRecord`]) is loosely typed: every field is
//! optional, times are strings that may carry seconds, weekday names are free
//! text. [`BusinessConfig::from_record`] is the one place that turns it into a
//! validated value, applying defaults as it goes. Consumers never re-default.
//!
//! A broken lunch window is dropped rather than reported: scheduling without a
//! lunch exclusion is preferable to no scheduling at all.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::clock;
use crate::error::{Result, ScheduleError};

const DEFAULT_OPENS_AT: (u32, u32) = (8, 0);
const DEFAULT_CLOSES_AT: (u32, u32) = (18, 0);
const DEFAULT_LUNCH: ((u32, u32), (u32, u32)) = ((12, 0), (13, 0));
const DEFAULT_DURATION_MINUTES: u32 = 30;
const DEFAULT_CANCELLATION_NOTICE_MINUTES: u32 = 120;

const DEFAULT_PRICE_ADULT_CUT: u32 = 15_000;
const DEFAULT_PRICE_CHILD_CUT: u32 = 10_000;
const DEFAULT_PRICE_BEARD: u32 = 8_000;
const DEFAULT_PRICE_COMBO: u32 = 20_000;

/// A bookable service with its own duration and price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceType {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub price: u32,
}

/// Midday closure removed from the bookable grid. Always `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunchBreak {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl LunchBreak {
    /// Inclusive of `start`, exclusive of `end`.
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether `[start, start + duration)` runs into the break at all.
    pub fn intersects(&self, start: NaiveTime, duration_minutes: u32) -> bool {
        let s = clock::minute_of_day(start);
        let e = s.saturating_add(duration_minutes);
        s < clock::minute_of_day(self.end) && clock::minute_of_day(self.start) < e
    }
}

/// Validated scheduling rules for one shop.
///
/// Build it with [`BusinessConfig::from_record`] at the data-access boundary, or
/// take [`BusinessConfig::default`]. Fields are public so callers can tweak a
/// snapshot; [`BusinessConfig::validate`] re-checks the invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessConfig {
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    /// `None` when the shop works straight through.
    pub lunch: Option<LunchBreak>,
    pub working_days: Vec<Weekday>,
    /// Used for services with no duration of their own and unknown service keys.
    pub default_duration_minutes: u32,
    /// Ordered catalogue. The first entry is the fallback for unknown keys.
    pub services: Vec<ServiceType>,
    /// How long before the appointment a client may still cancel.
    pub cancellation_notice_minutes: u32,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        let (lunch_start, lunch_end) = DEFAULT_LUNCH;
        Self {
            opens_at: hm(DEFAULT_OPENS_AT),
            closes_at: hm(DEFAULT_CLOSES_AT),
            lunch: Some(LunchBreak {
                start: hm(lunch_start),
                end: hm(lunch_end),
            }),
            working_days: default_working_days(),
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
            services: default_catalogue(&PriceColumns::default(), DEFAULT_DURATION_MINUTES),
            cancellation_notice_minutes: DEFAULT_CANCELLATION_NOTICE_MINUTES,
        }
    }
}

impl BusinessConfig {
    /// Build a validated config from a raw shop row, defaulting anything missing or malformed.
    pub fn from_record(record: &ShopRecord) -> Self {
        let defaults = Self::default();

        let mut opens_at = time_or(record.opens_at.as_deref(), defaults.opens_at, "opens_at");
        let mut closes_at = time_or(record.closes_at.as_deref(), defaults.closes_at, "closes_at");
        if opens_at >= closes_at {
            tracing::warn!(
                opens_at = %clock::format_time(opens_at),
                closes_at = %clock::format_time(closes_at),
                "opening hours are inverted, using defaults"
            );
            opens_at = defaults.opens_at;
            closes_at = defaults.closes_at;
        }

        let lunch = lunch_from_record(record, opens_at, closes_at);
        let working_days = working_days_from_record(record.working_days.as_deref());

        let default_duration_minutes = match record.default_duration_minutes {
            Some(d) if d > 0 => d,
            _ => DEFAULT_DURATION_MINUTES,
        };

        let services = match &record.services {
            Some(list) if !list.is_empty() => list
                .iter()
                .map(|s| ServiceType {
                    duration_minutes: if s.duration_minutes > 0 {
                        s.duration_minutes
                    } else {
                        default_duration_minutes
                    },
                    ..s.clone()
                })
                .collect(),
            _ => default_catalogue(&PriceColumns::from_record(record), default_duration_minutes),
        };

        let cancellation_notice_minutes = record
            .cancellation_notice_minutes
            .unwrap_or(DEFAULT_CANCELLATION_NOTICE_MINUTES);

        Self {
            opens_at,
            closes_at,
            lunch,
            working_days,
            default_duration_minutes,
            services,
            cancellation_notice_minutes,
        }
    }

    /// Check `opens_at < closes_at` and `opens_at < lunch.start < lunch.end < closes_at`.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidConfig` naming the first broken invariant.
    pub fn validate(&self) -> Result<()> {
        if self.opens_at >= self.closes_at {
            return Err(ScheduleError::InvalidConfig(format!(
                "opening time {} is not before closing time {}",
                clock::format_time(self.opens_at),
                clock::format_time(self.closes_at)
            )));
        }
        if let Some(lunch) = &self.lunch {
            let ordered = self.opens_at < lunch.start
                && lunch.start < lunch.end
                && lunch.end < self.closes_at;
            if !ordered {
                return Err(ScheduleError::InvalidConfig(format!(
                    "lunch {}-{} must sit strictly inside {}-{}",
                    clock::format_time(lunch.start),
                    clock::format_time(lunch.end),
                    clock::format_time(self.opens_at),
                    clock::format_time(self.closes_at)
                )));
            }
        }
        if self.default_duration_minutes == 0 {
            return Err(ScheduleError::InvalidConfig(
                "default duration must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Look up a service by key. Legacy keys (`corte`, `corte_barba`) resolve to
    /// their catalogue equivalents.
    pub fn service(&self, key: &str) -> Option<&ServiceType> {
        let wanted = canonical_service_key(key);
        self.services
            .iter()
            .find(|s| s.key == key)
            .or_else(|| self.services.iter().find(|s| s.key == wanted))
    }

    /// Duration of a service in minutes, falling back to the default duration.
    pub fn service_duration(&self, key: &str) -> u32 {
        self.service(key)
            .map(|s| s.duration_minutes)
            .filter(|d| *d > 0)
            .unwrap_or(self.default_duration_minutes)
    }

    /// Price of a service, falling back to the first catalogue entry.
    pub fn service_price(&self, key: &str) -> u32 {
        self.service(key)
            .or_else(|| self.services.first())
            .map(|s| s.price)
            .unwrap_or(0)
    }

    /// Key of the service used when a caller does not name one.
    pub fn default_service_key(&self) -> &str {
        self.services.first().map(|s| s.key.as_str()).unwrap_or("")
    }

    pub fn is_working_day(&self, weekday: Weekday) -> bool {
        self.working_days.contains(&weekday)
    }

    /// Whether the shop opens on `date` at all.
    pub fn is_date_available(&self, date: NaiveDate) -> bool {
        self.is_working_day(date.weekday())
    }

    /// Whether `time` falls inside the lunch break (inclusive start, exclusive end).
    pub fn in_lunch(&self, time: NaiveTime) -> bool {
        self.lunch.is_some_and(|l| l.contains(time))
    }
}

/// Customer-facing shop details used when composing messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopProfile {
    pub name: String,
    pub address: Option<String>,
    pub whatsapp_number: Option<String>,
}

impl ShopProfile {
    pub fn from_record(record: &ShopRecord) -> Self {
        Self {
            name: record
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Barbería".to_string()),
            address: record.address.clone().filter(|a| !a.trim().is_empty()),
            whatsapp_number: record
                .whatsapp_number
                .clone()
                .filter(|n| !n.trim().is_empty()),
        }
    }
}

/// The shop row as stored. Field aliases accept the storage column names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopRecord {
    pub id: Option<String>,
    #[serde(alias = "nombre")]
    pub name: Option<String>,
    #[serde(alias = "direccion")]
    pub address: Option<String>,
    #[serde(alias = "hora_apertura")]
    pub opens_at: Option<String>,
    #[serde(alias = "hora_cierre")]
    pub closes_at: Option<String>,
    #[serde(alias = "almuerzo_activo")]
    pub lunch_active: Option<bool>,
    #[serde(alias = "hora_almuerzo_inicio")]
    pub lunch_start: Option<String>,
    #[serde(alias = "hora_almuerzo_fin")]
    pub lunch_end: Option<String>,
    #[serde(alias = "dias_laborales")]
    pub working_days: Option<Vec<String>>,
    #[serde(alias = "duracion_cita")]
    pub default_duration_minutes: Option<u32>,
    #[serde(alias = "precio_corte_adulto")]
    pub price_adult_cut: Option<f64>,
    #[serde(alias = "precio_corte_nino")]
    pub price_child_cut: Option<f64>,
    #[serde(alias = "precio_barba")]
    pub price_beard: Option<f64>,
    #[serde(alias = "precio_combo")]
    pub price_combo: Option<f64>,
    /// Explicit catalogue; replaces the price columns when present.
    pub services: Option<Vec<ServiceType>>,
    #[serde(alias = "tiempo_cancelacion")]
    pub cancellation_notice_minutes: Option<u32>,
    #[serde(alias = "whatsapp_numero")]
    pub whatsapp_number: Option<String>,
}

/// Parse a weekday name. Accepts Spanish (with or without accents) and English.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let lowered = name.trim().to_lowercase();
    let folded: String = lowered
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            other => other,
        })
        .collect();
    match folded.as_str() {
        "lunes" | "monday" | "mon" => Some(Weekday::Mon),
        "martes" | "tuesday" | "tue" => Some(Weekday::Tue),
        "miercoles" | "wednesday" | "wed" => Some(Weekday::Wed),
        "jueves" | "thursday" | "thu" => Some(Weekday::Thu),
        "viernes" | "friday" | "fri" => Some(Weekday::Fri),
        "sabado" | "saturday" | "sat" => Some(Weekday::Sat),
        "domingo" | "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Spanish display name, capitalized (`"Lunes"`, `"Miércoles"`).
pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Lunes",
        Weekday::Tue => "Martes",
        Weekday::Wed => "Miércoles",
        Weekday::Thu => "Jueves",
        Weekday::Fri => "Viernes",
        Weekday::Sat => "Sábado",
        Weekday::Sun => "Domingo",
    }
}

fn canonical_service_key(key: &str) -> &str {
    match key {
        "corte" => "adulto",
        "corte_barba" => "combo",
        other => other,
    }
}

fn hm((h, m): (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

fn default_working_days() -> Vec<Weekday> {
    vec![
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ]
}

fn time_or(raw: Option<&str>, fallback: NaiveTime, field: &str) -> NaiveTime {
    match raw {
        None => fallback,
        Some(s) if s.trim().is_empty() => fallback,
        Some(s) => clock::parse_time(s).unwrap_or_else(|_| {
            tracing::warn!(field, value = s, "malformed time in shop config, using default");
            fallback
        }),
    }
}

fn lunch_from_record(
    record: &ShopRecord,
    opens_at: NaiveTime,
    closes_at: NaiveTime,
) -> Option<LunchBreak> {
    if record.lunch_active == Some(false) {
        return None;
    }
    let (default_start, default_end) = DEFAULT_LUNCH;
    let start = match record.lunch_start.as_deref() {
        Some(s) => clock::parse_time(s).ok(),
        None => Some(hm(default_start)),
    };
    let end = match record.lunch_end.as_deref() {
        Some(s) => clock::parse_time(s).ok(),
        None => Some(hm(default_end)),
    };

    let (Some(start), Some(end)) = (start, end) else {
        tracing::warn!(
            lunch_start = ?record.lunch_start,
            lunch_end = ?record.lunch_end,
            "malformed lunch window, lunch break disabled"
        );
        return None;
    };

    if !(opens_at < start && start < end && end < closes_at) {
        tracing::warn!(
            lunch_start = %clock::format_time(start),
            lunch_end = %clock::format_time(end),
            "lunch window outside business hours, lunch break disabled"
        );
        return None;
    }

    Some(LunchBreak { start, end })
}

fn working_days_from_record(raw: Option<&[String]>) -> Vec<Weekday> {
    let Some(names) = raw else {
        return default_working_days();
    };

    let mut days: Vec<Weekday> = Vec::new();
    for name in names {
        match parse_weekday(name) {
            Some(day) if !days.contains(&day) => days.push(day),
            Some(_) => {}
            None => tracing::warn!(day = %name, "unknown weekday name ignored"),
        }
    }

    // Names were given but none made sense: the row is corrupt, not a closed shop.
    if days.is_empty() && !names.is_empty() {
        return default_working_days();
    }
    days.sort_by_key(|d| d.num_days_from_monday());
    days
}

#[derive(Default)]
struct PriceColumns {
    adult_cut: Option<f64>,
    child_cut: Option<f64>,
    beard: Option<f64>,
    combo: Option<f64>,
}

impl PriceColumns {
    fn from_record(record: &ShopRecord) -> Self {
        Self {
            adult_cut: record.price_adult_cut,
            child_cut: record.price_child_cut,
            beard: record.price_beard,
            combo: record.price_combo,
        }
    }
}

fn price_or(raw: Option<f64>, fallback: u32) -> u32 {
    match raw {
        Some(p) if p.is_finite() && p > 0.0 => p.round() as u32,
        _ => fallback,
    }
}

fn default_catalogue(prices: &PriceColumns, base_duration: u32) -> Vec<ServiceType> {
    vec![
        ServiceType {
            key: "adulto".to_string(),
            label: "Corte adulto".to_string(),
            duration_minutes: base_duration,
            price: price_or(prices.adult_cut, DEFAULT_PRICE_ADULT_CUT),
        },
        ServiceType {
            key: "nino".to_string(),
            label: "Corte niño".to_string(),
            duration_minutes: base_duration,
            price: price_or(prices.child_cut, DEFAULT_PRICE_CHILD_CUT),
        },
        ServiceType {
            key: "barba".to_string(),
            label: "Barba".to_string(),
            duration_minutes: base_duration,
            price: price_or(prices.beard, DEFAULT_PRICE_BEARD),
        },
        ServiceType {
            key: "combo".to_string(),
            label: "Corte + barba".to_string(),
            duration_minutes: base_duration * 2,
            price: price_or(prices.combo, DEFAULT_PRICE_COMBO),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accents_and_english_names_parse() {
        assert_eq!(parse_weekday("Miércoles"), Some(Weekday::Wed));
        assert_eq!(parse_weekday("sabado"), Some(Weekday::Sat));
        assert_eq!(parse_weekday("friday"), Some(Weekday::Fri));
        assert_eq!(parse_weekday("someday"), None);
    }

    #[test]
    fn duplicate_days_collapse() {
        let names = vec!["lunes".to_string(), "Lunes".to_string(), "martes".to_string()];
        assert_eq!(
            working_days_from_record(Some(&names)),
            vec![Weekday::Mon, Weekday::Tue]
        );
    }

    #[test]
    fn explicitly_empty_days_mean_closed() {
        assert!(working_days_from_record(Some(&[])).is_empty());
    }

    #[test]
    fn fractional_prices_round() {
        assert_eq!(price_or(Some(14999.6), 1), 15000);
        assert_eq!(price_or(Some(-3.0), 7), 7);
        assert_eq!(price_or(Some(f64::NAN), 7), 7);
    }
}
