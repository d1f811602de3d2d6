//! Payment tracking for completed and upcoming work.
//!
//! Unpaid appointments are bucketed by how urgently they need collecting,
//! relative to a caller-supplied `today`.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::config::BusinessConfig;
use crate::schedule::{Appointment, AppointmentStatus};

/// Appointments older than this many days drop out of the pending list.
const LOOKBACK_DAYS: i64 = 7;
/// Anything up to this many days ahead counts as "this week".
const THIS_WEEK_DAYS: i64 = 7;

/// How soon an unpaid appointment should be collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PaymentPriority {
    Overdue,
    Today,
    Tomorrow,
    ThisWeek,
    Upcoming,
}

impl PaymentPriority {
    pub fn classify(date: NaiveDate, today: NaiveDate) -> Self {
        let days_ahead = (date - today).num_days();
        match days_ahead {
            d if d < 0 => PaymentPriority::Overdue,
            0 => PaymentPriority::Today,
            1 => PaymentPriority::Tomorrow,
            d if d <= THIS_WEEK_DAYS => PaymentPriority::ThisWeek,
            _ => PaymentPriority::Upcoming,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentPriority::Overdue => "VENCIDA",
            PaymentPriority::Today => "HOY",
            PaymentPriority::Tomorrow => "MAÑANA",
            PaymentPriority::ThisWeek => "ESTA SEMANA",
            PaymentPriority::Upcoming => "PRÓXIMA",
        }
    }
}

impl fmt::Display for PaymentPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An appointment still waiting for payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingPayment {
    pub appointment_id: String,
    pub barber_id: String,
    pub client_id: String,
    pub date: NaiveDate,
    #[serde(with = "crate::clock::hhmm")]
    pub start: NaiveTime,
    pub service_key: String,
    pub amount: u32,
    pub priority: PaymentPriority,
}

/// Counts and totals per priority bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PendingSummary {
    pub buckets: Vec<BucketTotal>,
    pub total_count: usize,
    pub total_amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketTotal {
    pub priority: PaymentPriority,
    pub count: usize,
    pub amount: u64,
}

/// Outcome of settling an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentReceipt {
    /// What the client owes for the service after the discount.
    pub charged: u32,
    pub discount: u32,
    pub tip: u32,
    /// `charged + tip`.
    pub collected: u32,
}

/// Unpaid scheduled/confirmed appointments from the last week onwards, by date and time.
///
/// Amounts come from the current catalogue price of the service; appointments
/// whose service is no longer in the catalogue keep their stored price.
pub fn pending_payments(
    appointments: &[Appointment],
    config: &BusinessConfig,
    today: NaiveDate,
) -> Vec<PendingPayment> {
    let cutoff = today - Duration::days(LOOKBACK_DAYS);

    let mut pending: Vec<PendingPayment> = appointments
        .iter()
        .filter(|a| {
            matches!(
                a.status,
                AppointmentStatus::Scheduled | AppointmentStatus::Confirmed
            )
        })
        .filter(|a| !a.paid && a.date >= cutoff)
        .map(|a| PendingPayment {
            appointment_id: a.id.clone(),
            barber_id: a.barber_id.clone(),
            client_id: a.client_id.clone(),
            date: a.date,
            start: a.start,
            service_key: a.service_key.clone(),
            amount: match config.service(&a.service_key) {
                Some(service) => service.price,
                None => a.effective_price(config),
            },
            priority: PaymentPriority::classify(a.date, today),
        })
        .collect();

    pending.sort_by(|x, y| (x.date, x.start).cmp(&(y.date, y.start)));
    pending
}

/// Totals per priority, in priority order. Empty buckets are included.
pub fn summarize(pending: &[PendingPayment]) -> PendingSummary {
    let priorities = [
        PaymentPriority::Overdue,
        PaymentPriority::Today,
        PaymentPriority::Tomorrow,
        PaymentPriority::ThisWeek,
        PaymentPriority::Upcoming,
    ];

    let buckets: Vec<BucketTotal> = priorities
        .iter()
        .map(|&priority| {
            let in_bucket = pending.iter().filter(|p| p.priority == priority);
            BucketTotal {
                priority,
                count: in_bucket.clone().count(),
                amount: in_bucket.map(|p| u64::from(p.amount)).sum(),
            }
        })
        .collect();

    PendingSummary {
        total_count: pending.len(),
        total_amount: pending.iter().map(|p| u64::from(p.amount)).sum(),
        buckets,
    }
}

/// Settle a payment: `(paid_amount or price) - discount`, never below zero.
pub fn settle(price: u32, paid_amount: Option<u32>, discount: u32, tip: u32) -> PaymentReceipt {
    let base = paid_amount.filter(|p| *p > 0).unwrap_or(price);
    let charged = base.saturating_sub(discount);
    PaymentReceipt {
        charged,
        discount,
        tip,
        collected: charged.saturating_add(tip),
    }
}

/// Colón amount with space-grouped thousands: `₡15 000`.
pub fn format_price(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    format!("₡{}", grouped)
}
