//! Tests for customer-facing message text.

use barber_slots::config::{BusinessConfig, ShopProfile};
use barber_slots::digest::{
    confirmation_message, open_days, promotional_message, reminder_message, render_availability,
    AppointmentNotice, DayAvailability, DigestRequest,
};
use barber_slots::schedule::{Appointment, AppointmentStatus, Barber};
use chrono::{NaiveDate, NaiveTime};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

fn shop() -> ShopProfile {
    ShopProfile {
        name: "Barbería El Roble".to_string(),
        address: Some("San José, Barrio Escalante".to_string()),
        whatsapp_number: Some("+50688881234".to_string()),
    }
}

fn barber(id: &str) -> Barber {
    Barber {
        id: id.to_string(),
        name: "Carlos".to_string(),
        specialty: Some("Fade".to_string()),
        active: true,
    }
}

fn notice(price: Option<u32>) -> AppointmentNotice<'static> {
    AppointmentNotice {
        client_name: "Ana",
        date: d(16),
        time: t(9, 0),
        barber_name: "Carlos",
        service_label: "Corte adulto",
        price,
    }
}

// ── open_days ───────────────────────────────────────────────────────────────

#[test]
fn open_days_skips_closed_days_and_past_starts() {
    let config = BusinessConfig::default();
    // Saturday 14 through Monday 16; Sunday is closed.
    let request = DigestRequest {
        from: d(14),
        days: 3,
        now: d(14).and_time(t(17, 0)),
        service_key: None,
        barber_id: None,
    };

    let days = open_days(&request, &config, &[], &[barber("b1")]);

    let dates: Vec<NaiveDate> = days.iter().map(|day| day.date).collect();
    assert_eq!(dates, vec![d(14), d(16)]);
    assert_eq!(days[0].starts, vec![t(17, 15), t(17, 30)]);
    assert_eq!(days[1].starts.len(), 34);
}

#[test]
fn open_days_omits_fully_booked_days() {
    let config = BusinessConfig::default();
    let request = DigestRequest {
        from: d(16),
        days: 1,
        now: d(16).and_time(t(16, 0)),
        service_key: Some("adulto"),
        barber_id: Some("b1"),
    };
    let busy = Appointment {
        id: "late".to_string(),
        barber_id: "b1".to_string(),
        client_id: String::new(),
        date: d(16),
        start: t(16, 15),
        service_key: "adulto".to_string(),
        duration_minutes: Some(105),
        status: AppointmentStatus::Confirmed,
        price: None,
        notes: None,
        paid: false,
    };

    assert!(open_days(&request, &config, &[busy], &[barber("b1")]).is_empty());
}

// ── Availability broadcast ──────────────────────────────────────────────────

#[test]
fn availability_lists_each_day() {
    let days = vec![
        DayAvailability {
            date: d(16),
            starts: vec![t(9, 0), t(9, 30)],
        },
        DayAvailability {
            date: d(17),
            starts: vec![t(14, 0)],
        },
    ];

    let text = render_availability(&shop(), &days, 7, Some(&barber("b1")));

    assert!(text.starts_with("🪒 *Barbería El Roble* 🪒"));
    assert!(text.contains("📅 *DISPONIBILIDAD PRÓXIMOS 7 DÍAS*"));
    assert!(text.contains("👨‍💼 Barbero: *Carlos*"));
    assert!(text.contains("🎯 Especialidad: Fade"));
    assert!(text.contains("📆 *Lunes 16/03*\n🕒 09:00 | 09:30"));
    assert!(text.contains("📆 *Martes 17/03*\n🕒 14:00"));
    assert!(text.contains("📍 San José, Barrio Escalante"));
    assert!(text.contains("📱 WhatsApp: +50688881234"));
}

#[test]
fn availability_without_openings() {
    let text = render_availability(&ShopProfile::default(), &[], 5, None);

    assert!(text.contains("❌ No hay disponibilidad en los próximos 5 días."));
    assert!(text.contains("📞 Contáctanos"));
    assert!(!text.contains("📆"));
    assert!(!text.contains("Barbero:"));
}

#[test]
fn availability_without_address_says_so() {
    let profile = ShopProfile {
        address: None,
        whatsapp_number: None,
        ..shop()
    };
    let days = vec![DayAvailability {
        date: d(16),
        starts: vec![t(9, 0)],
    }];

    let text = render_availability(&profile, &days, 1, None);
    assert!(text.contains("📍 Dirección disponible al agendar"));
    assert!(!text.contains("WhatsApp"));
}

// ── Reminders, confirmations, promotions ────────────────────────────────────

#[test]
fn reminder_quotes_the_appointment() {
    let text = reminder_message(&shop(), &notice(None));
    assert!(text.contains("Hola Ana!"));
    assert!(text.contains("📅 Lunes 16/03/2026"));
    assert!(text.contains("🕒 09:00"));
    assert!(text.contains("👨‍💼 Barbero: Carlos"));
}

#[test]
fn confirmation_price_line_only_when_known() {
    let with_price = confirmation_message(&shop(), &notice(Some(15_000)));
    assert!(with_price.contains("✂️ Servicio: Corte adulto"));
    assert!(with_price.contains("💰 Precio: ₡15 000"));

    let without = confirmation_message(&shop(), &notice(None));
    assert!(!without.contains("Precio"));
    let zero = confirmation_message(&shop(), &notice(Some(0)));
    assert!(!zero.contains("Precio"));
}

#[test]
fn promotion_is_trimmed_and_signed() {
    let text = promotional_message(&shop(), "Luis", "  2x1 en barba los martes \n");
    assert!(text.contains("\n2x1 en barba los martes\n"));
    assert!(text.ends_with("💈 Barbería El Roble"));
}
