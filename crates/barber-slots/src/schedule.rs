//! Appointment, barber and status types as persisted by the scheduling store.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::clock;
use crate::config::BusinessConfig;

/// Appointment lifecycle state. Serialized with the storage names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[default]
    #[serde(rename = "programada", alias = "scheduled")]
    Scheduled,
    #[serde(rename = "confirmada", alias = "confirmed")]
    Confirmed,
    #[serde(rename = "cancelada", alias = "cancelled")]
    Cancelled,
    #[serde(rename = "completada", alias = "completed")]
    Completed,
}

impl AppointmentStatus {
    /// Cancelled appointments free their slot; every other state holds it.
    pub fn is_active(self) -> bool {
        self != AppointmentStatus::Cancelled
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booked appointment.
///
/// `duration_minutes` and `price` are snapshots taken when the appointment was
/// booked (or its service changed). Later catalogue edits do not move them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub barber_id: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(alias = "fecha", with = "clock::lenient_date")]
    pub date: NaiveDate,
    #[serde(rename = "start_time", alias = "hora", with = "clock::hhmm")]
    pub start: NaiveTime,
    #[serde(alias = "tipo_servicio", default)]
    pub service_key: String,
    #[serde(alias = "duracion_minutos", default)]
    pub duration_minutes: Option<u32>,
    #[serde(alias = "estado", default)]
    pub status: AppointmentStatus,
    #[serde(alias = "precio", default)]
    pub price: Option<u32>,
    #[serde(alias = "notas", default)]
    pub notes: Option<String>,
    #[serde(alias = "pagado", default, deserialize_with = "null_as_false")]
    pub paid: bool,
}

/// What a caller supplies to book a new appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub id: String,
    pub barber_id: String,
    pub client_id: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub service_key: String,
    pub notes: Option<String>,
}

impl Appointment {
    /// Create a scheduled appointment, snapshotting duration and price from `config`.
    pub fn book(draft: BookingDraft, config: &BusinessConfig) -> Self {
        let duration = config.service_duration(&draft.service_key);
        let price = config.service_price(&draft.service_key);
        Self {
            id: draft.id,
            barber_id: draft.barber_id,
            client_id: draft.client_id,
            date: draft.date,
            start: draft.start,
            service_key: draft.service_key,
            duration_minutes: Some(duration),
            status: AppointmentStatus::Scheduled,
            price: Some(price),
            notes: draft.notes,
            paid: false,
        }
    }

    /// Switch to another service and re-snapshot its duration and price.
    pub fn change_service(&mut self, service_key: &str, config: &BusinessConfig) {
        self.service_key = service_key.to_string();
        self.duration_minutes = Some(config.service_duration(service_key));
        self.price = Some(config.service_price(service_key));
    }

    /// Stored duration when present, otherwise the service's catalogue duration.
    pub fn effective_duration(&self, config: &BusinessConfig) -> u32 {
        match self.duration_minutes {
            Some(d) if d > 0 => d,
            _ => config.service_duration(&self.service_key),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Price to charge: the snapshot, or the catalogue price when none was stored.
    pub fn effective_price(&self, config: &BusinessConfig) -> u32 {
        self.price.unwrap_or_else(|| config.service_price(&self.service_key))
    }
}

/// A staff member who takes appointments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barber {
    pub id: String,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(alias = "especialidad", default)]
    pub specialty: Option<String>,
    #[serde(alias = "activo", default = "default_true")]
    pub active: bool,
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

fn default_true() -> bool {
    true
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
