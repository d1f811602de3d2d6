//! WASM bindings for barber-slots.
//!
//! Exposes the slot grid, availability, overlap checks and the availability
//! message to the web dashboard via `wasm-bindgen`. Structured inputs cross
//! the boundary as JSON strings shaped like the CLI's shop snapshot
//! (`shop`, `barbers`, `appointments`), plus per-call fields.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p barber-slots-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/wasm/ \
//!   target/wasm32-unknown-unknown/release/barber_slots_wasm.wasm
//! ```

use barber_slots::booking::validate_booking;
use barber_slots::digest::{self, DigestRequest};
use barber_slots::schedule::DateRange;
use barber_slots::{
    available_starts, clock, conflict, generate_slots, slots, Appointment, AvailabilityQuery,
    Barber, BusinessConfig, ScheduleError, ShopProfile, ShopRecord,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input of `availableStarts`.
#[derive(Deserialize)]
struct AvailabilityInput {
    #[serde(default)]
    shop: ShopRecord,
    #[serde(default)]
    barbers: Vec<Barber>,
    #[serde(default)]
    appointments: Vec<Appointment>,
    date: String,
    service: Option<String>,
    barber_id: Option<String>,
    exclude_id: Option<String>,
}

/// Input of `availabilityMessage`.
#[derive(Deserialize)]
struct DigestInput {
    #[serde(default)]
    shop: ShopRecord,
    #[serde(default)]
    barbers: Vec<Barber>,
    #[serde(default)]
    appointments: Vec<Appointment>,
    from: String,
    #[serde(default = "default_days")]
    days: u32,
    /// `YYYY-MM-DDTHH:MM[:SS]`; the browser passes its own clock.
    now: String,
    service: Option<String>,
    barber_id: Option<String>,
}

/// Input of `checkBooking`.
#[derive(Deserialize)]
struct BookingCheckInput {
    #[serde(default)]
    shop: ShopRecord,
    #[serde(default)]
    appointments: Vec<Appointment>,
    candidate: Appointment,
}

#[derive(Serialize)]
struct BookingCheckDto {
    ok: bool,
    /// Machine-readable rejection kind, e.g. `"slot_taken"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
    /// User-facing message.
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

fn default_days() -> u32 {
    7
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_json<'a, T: Deserialize<'a>>(json: &'a str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn parse_now(raw: &str) -> Result<NaiveDateTime, String> {
    let trimmed = raw.trim();
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M"))
        .map_err(|e| format!("Invalid datetime '{}': {}", raw, e))
}

fn rejection_reason(err: &ScheduleError) -> &'static str {
    match err {
        ScheduleError::ClosedDay { .. } => "closed_day",
        ScheduleError::OutsideHours { .. } => "outside_hours",
        ScheduleError::LunchBreak { .. } => "lunch_break",
        ScheduleError::SlotTaken { .. } => "slot_taken",
        ScheduleError::InvalidTime(_) => "invalid_time",
        _ => "invalid",
    }
}

fn generate_slots_json(shop_json: &str) -> Result<String, String> {
    let record: ShopRecord = parse_json(shop_json, "shop")?;
    let config = BusinessConfig::from_record(&record);
    to_json(&slots::labels(&generate_slots(&config)))
}

fn available_starts_json(request_json: &str) -> Result<String, String> {
    let input: AvailabilityInput = parse_json(request_json, "availability request")?;
    let date = clock::parse_date(&input.date).map_err(|e| e.to_string())?;
    let config = BusinessConfig::from_record(&input.shop);
    let service_key = input
        .service
        .unwrap_or_else(|| config.default_service_key().to_string());

    let mut query = AvailabilityQuery::new(date, &service_key);
    query.barber_id = input.barber_id.as_deref();
    query.exclude_appointment_id = input.exclude_id.as_deref();

    let starts = available_starts(&query, &config, &input.appointments, &input.barbers);
    to_json(&slots::labels(&starts))
}

fn is_date_available_json(date: &str, shop_json: &str) -> Result<bool, String> {
    let date = clock::parse_date(date).map_err(|e| e.to_string())?;
    let record: ShopRecord = parse_json(shop_json, "shop")?;
    Ok(BusinessConfig::from_record(&record).is_date_available(date))
}

fn availability_message_text(request_json: &str) -> Result<String, String> {
    let input: DigestInput = parse_json(request_json, "digest request")?;
    let from = clock::parse_date(&input.from).map_err(|e| e.to_string())?;
    let now = parse_now(&input.now)?;
    let config = BusinessConfig::from_record(&input.shop);
    let shop = ShopProfile::from_record(&input.shop);

    let barber = match input.barber_id.as_deref() {
        Some(id) => Some(
            input
                .barbers
                .iter()
                .find(|b| b.id == id)
                .ok_or_else(|| format!("Unknown barber: {}", id))?,
        ),
        None => None,
    };

    let request = DigestRequest {
        from,
        days: input.days,
        now,
        service_key: input.service.as_deref(),
        barber_id: input.barber_id.as_deref(),
    };
    let open = digest::open_days(&request, &config, &input.appointments, &input.barbers);
    Ok(digest::render_availability(&shop, &open, input.days, barber))
}

fn check_booking_json(request_json: &str) -> Result<String, String> {
    let input: BookingCheckInput = parse_json(request_json, "booking check")?;
    let config = BusinessConfig::from_record(&input.shop);
    let candidate = &input.candidate;

    let day = DateRange::day(candidate.date);
    let existing: Vec<Appointment> = input
        .appointments
        .into_iter()
        .filter(|a| day.contains(a.date) && a.barber_id == candidate.barber_id)
        .collect();

    let dto = match validate_booking(candidate, &config, &existing) {
        Ok(()) => BookingCheckDto {
            ok: true,
            reason: None,
            message: None,
        },
        Err(e) => BookingCheckDto {
            ok: false,
            reason: Some(rejection_reason(&e)),
            message: Some(e.to_string()),
        },
    };
    to_json(&dto)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Candidate start times for the shop's business hours.
///
/// `shopJson` is the raw shop row (any missing or malformed field falls back
/// to the defaults). Returns a JSON array of `"HH:MM"` strings.
#[wasm_bindgen(js_name = "generateSlots")]
pub fn generate_slots_wasm(shop_json: &str) -> Result<String, JsValue> {
    generate_slots_json(shop_json).map_err(|e| JsValue::from_str(&e))
}

/// Starts that can still take a booking of the requested service.
///
/// `requestJson`: `{shop, barbers, appointments, date, service?, barber_id?,
/// exclude_id?}`. Leave `barber_id` out for the "any barber" path; set
/// `exclude_id` when editing an appointment.
#[wasm_bindgen(js_name = "availableStarts")]
pub fn available_starts_wasm(request_json: &str) -> Result<String, JsValue> {
    available_starts_json(request_json).map_err(|e| JsValue::from_str(&e))
}

/// Whether `[startA, startA + durationA)` and `[startB, startB + durationB)` overlap.
///
/// Unparseable times count as a conflict.
#[wasm_bindgen(js_name = "overlaps")]
pub fn overlaps_wasm(start_a: &str, duration_a: u32, start_b: &str, duration_b: u32) -> bool {
    conflict::overlaps(start_a, duration_a, start_b, duration_b)
}

#[wasm_bindgen(js_name = "isDateAvailable")]
pub fn is_date_available_wasm(date: &str, shop_json: &str) -> Result<bool, JsValue> {
    is_date_available_json(date, shop_json).map_err(|e| JsValue::from_str(&e))
}

/// The WhatsApp availability message.
///
/// `requestJson`: `{shop, barbers, appointments, from, days?, now, service?,
/// barber_id?}`.
#[wasm_bindgen(js_name = "availabilityMessage")]
pub fn availability_message_wasm(request_json: &str) -> Result<String, JsValue> {
    availability_message_text(request_json).map_err(|e| JsValue::from_str(&e))
}

/// Submit-time re-check of a booking against freshly loaded appointments.
///
/// `requestJson`: `{shop, appointments, candidate}`. Returns
/// `{"ok": true}` or `{"ok": false, "reason": "...", "message": "..."}`.
#[wasm_bindgen(js_name = "checkBooking")]
pub fn check_booking_wasm(request_json: &str) -> Result<String, JsValue> {
    check_booking_json(request_json).map_err(|e| JsValue::from_str(&e))
}
