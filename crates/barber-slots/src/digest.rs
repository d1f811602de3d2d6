//! Customer-facing WhatsApp message text.
//!
//! Only composes strings. Delivering them is somebody else's job.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::availability::{self, AvailabilityQuery};
use crate::billing;
use crate::clock;
use crate::config::{self, BusinessConfig, ShopProfile};
use crate::schedule::{Appointment, Barber};
use crate::slots;

const COSTA_RICA_PREFIX: &str = "+506";

/// Parameters for an availability digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestRequest<'a> {
    /// First day covered.
    pub from: NaiveDate,
    /// Number of consecutive days covered, starting at `from`.
    pub days: u32,
    /// Starts at or before this instant are not offered.
    pub now: NaiveDateTime,
    /// Service to size slots for; the config's default service when `None`.
    pub service_key: Option<&'a str>,
    /// Restrict to one barber; any active barber when `None`.
    pub barber_id: Option<&'a str>,
}

/// Bookable starts on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub starts: Vec<NaiveTime>,
}

/// Appointment details quoted in reminders and confirmations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentNotice<'a> {
    pub client_name: &'a str,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub barber_name: &'a str,
    pub service_label: &'a str,
    pub price: Option<u32>,
}

/// Working days in the request window that still have bookable starts.
pub fn open_days(
    request: &DigestRequest<'_>,
    config: &BusinessConfig,
    appointments: &[Appointment],
    barbers: &[Barber],
) -> Vec<DayAvailability> {
    let service_key = request
        .service_key
        .unwrap_or_else(|| config.default_service_key());

    (0..request.days)
        .filter_map(|offset| request.from.checked_add_signed(Duration::days(i64::from(offset))))
        .filter(|date| config.is_date_available(*date))
        .filter_map(|date| {
            let mut query = AvailabilityQuery::new(date, service_key);
            query.barber_id = request.barber_id;
            let starts: Vec<NaiveTime> =
                availability::available_starts(&query, config, appointments, barbers)
                    .into_iter()
                    .filter(|t| date.and_time(*t) > request.now)
                    .collect();
            (!starts.is_empty()).then_some(DayAvailability { date, starts })
        })
        .collect()
}

/// The availability broadcast listing open starts per day.
pub fn render_availability(
    shop: &ShopProfile,
    days: &[DayAvailability],
    horizon_days: u32,
    barber: Option<&Barber>,
) -> String {
    let mut message = format!("🪒 *{}* 🪒\n\n", shop.name);
    message.push_str(&format!(
        "📅 *DISPONIBILIDAD PRÓXIMOS {} DÍAS*\n\n",
        horizon_days
    ));

    if let Some(barber) = barber {
        message.push_str(&format!("👨‍💼 Barbero: *{}*\n", barber.name));
        if let Some(specialty) = barber.specialty.as_deref().filter(|s| !s.is_empty()) {
            message.push_str(&format!("🎯 Especialidad: {}\n", specialty));
        }
        message.push('\n');
    }

    if days.is_empty() {
        message.push_str(&format!(
            "❌ No hay disponibilidad en los próximos {} días.\n\n",
            horizon_days
        ));
        message.push_str("📞 Contáctanos para coordinar una cita en fechas posteriores.");
        return message;
    }

    let day_blocks: Vec<String> = days
        .iter()
        .map(|day| {
            format!(
                "📆 *{} {}*\n🕒 {}\n",
                config::weekday_label(day.date.weekday()),
                day.date.format("%d/%m"),
                slots::labels(&day.starts).join(" | ")
            )
        })
        .collect();
    message.push_str(&day_blocks.join("\n"));

    message.push_str("\n\n💬 *Para agendar tu cita:*\n");
    message.push_str("Responde con:\n");
    message.push_str("\"CITA [DÍA] [HORA]\"\n");
    message.push_str("Ejemplo: \"CITA Lunes 09:00\"\n\n");
    message.push_str(&format!(
        "📍 {}\n",
        shop.address
            .as_deref()
            .unwrap_or("Dirección disponible al agendar")
    ));
    if let Some(number) = &shop.whatsapp_number {
        message.push_str(&format!("📱 WhatsApp: {}\n", number));
    }

    message
}

/// Day-before style reminder.
pub fn reminder_message(shop: &ShopProfile, notice: &AppointmentNotice<'_>) -> String {
    format!(
        "🪒 *{shop}*\n\n\
         Hola {client}! 👋\n\n\
         ⏰ Te recordamos tu cita:\n\
         📅 {date}\n\
         🕒 {time}\n\
         👨‍💼 Barbero: {barber}\n\n\
         ¡Te esperamos! 💈\n\n\
         Para cancelar o cambiar tu cita, responde a este mensaje.",
        shop = shop.name,
        client = notice.client_name,
        date = long_date(notice.date),
        time = clock::format_time(notice.time),
        barber = notice.barber_name,
    )
}

/// Sent once a booking is confirmed. The price line is omitted when unknown.
pub fn confirmation_message(shop: &ShopProfile, notice: &AppointmentNotice<'_>) -> String {
    let mut message = format!(
        "🎉 *Cita Confirmada*\n\n\
         {shop}\n\n\
         Hola {client}!\n\n\
         Tu cita ha sido confirmada:\n\
         📅 {date}\n\
         🕒 {time}\n\
         👨‍💼 Barbero: {barber}\n\
         ✂️ Servicio: {service}\n",
        shop = shop.name,
        client = notice.client_name,
        date = long_date(notice.date),
        time = clock::format_time(notice.time),
        barber = notice.barber_name,
        service = notice.service_label,
    );
    if let Some(price) = notice.price.filter(|p| *p > 0) {
        message.push_str(&format!("💰 Precio: {}\n", billing::format_price(price)));
    }
    message.push_str("\n¡Nos vemos pronto! 💈\n\nPara cualquier cambio, responde a este mensaje.");
    message
}

pub fn promotional_message(shop: &ShopProfile, client_name: &str, promotion: &str) -> String {
    format!(
        "🎯 *Promoción Especial*\n\n\
         Hola {client}!\n\n\
         {shop} tiene algo especial para ti:\n\n\
         {promotion}\n\n\
         ¡No te lo pierdas! Agenda tu cita respondiendo a este mensaje.\n\n\
         💈 {shop}",
        shop = shop.name,
        client = client_name,
        promotion = promotion.trim(),
    )
}

/// Strip spacing and punctuation; bare 8-digit local numbers get the `+506` prefix.
pub fn format_phone_number(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();

    if !cleaned.starts_with('+') && !cleaned.starts_with("506") && cleaned.chars().count() == 8 {
        return format!("{}{}", COSTA_RICA_PREFIX, cleaned);
    }
    cleaned
}

/// `+506` followed by exactly eight digits, after [`format_phone_number`].
pub fn validate_phone_number(raw: &str) -> bool {
    let formatted = format_phone_number(raw);
    formatted
        .strip_prefix(COSTA_RICA_PREFIX)
        .is_some_and(|rest| rest.len() == 8 && rest.chars().all(|c| c.is_ascii_digit()))
}

fn long_date(date: NaiveDate) -> String {
    format!(
        "{} {}",
        config::weekday_label(date.weekday()),
        date.format("%d/%m/%Y")
    )
}
