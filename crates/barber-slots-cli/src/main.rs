//! `barber-slots` CLI — slot grids, availability, conflict checks and
//! WhatsApp digests from a shop snapshot.
//!
//! ## Usage
//!
//! ```sh
//! # Slot grid for the shop's business hours
//! barber-slots slots -i shop.json
//!
//! # Starts that still fit a combo with barber b1 on a given day
//! barber-slots available --date 2026-03-16 --service combo --barber b1 -i shop.json
//!
//! # Do two intervals overlap?
//! barber-slots check 09:00 30 09:15 30
//!
//! # Availability message for the next week (snapshot on stdin)
//! cat shop.json | barber-slots digest --from 2026-03-16 --days 7
//!
//! # Unpaid appointments by collection priority
//! barber-slots pending --today 2026-03-16 -i shop.json
//! ```
//!
//! The snapshot is a JSON document `{ "shop": {...}, "barbers": [...],
//! "appointments": [...] }`; every section is optional.

use anyhow::{Context, Result};
use barber_slots::billing;
use barber_slots::digest::{self, DigestRequest};
use barber_slots::{
    available_starts, clock, conflict, generate_slots, slots, AvailabilityQuery, BusinessConfig,
    ShopProfile, ShopSnapshot,
};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "barber-slots",
    version,
    about = "Barbershop slot availability and booking-conflict checks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log scheduling decisions to stderr (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the day's candidate start times
    Slots {
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print the starts that can still take a new booking
    Available {
        /// Day to check (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(long)]
        date: String,
        /// Service key; the shop's first service if omitted
        #[arg(long)]
        service: Option<String>,
        /// Only this barber; any active barber if omitted
        #[arg(long)]
        barber: Option<String>,
        /// Appointment being edited: its own slot counts as free
        #[arg(long)]
        exclude: Option<String>,
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Check whether two HH:MM intervals overlap
    Check {
        start_a: String,
        duration_a: u32,
        start_b: String,
        duration_b: u32,
    },
    /// Compose the WhatsApp availability message
    Digest {
        /// First day covered
        #[arg(long)]
        from: String,
        /// Number of days covered
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Only this barber; any active barber if omitted
        #[arg(long)]
        barber: Option<String>,
        /// Hide starts at or before this instant (YYYY-MM-DDTHH:MM); defaults to now
        #[arg(long)]
        now: Option<String>,
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List unpaid appointments by collection priority
    Pending {
        /// Reference day for the priorities
        #[arg(long)]
        today: String,
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Slots { input } => {
            let snapshot = read_snapshot(input.as_deref())?;
            let config = BusinessConfig::from_record(&snapshot.shop);
            print_lines(&slots::labels(&generate_slots(&config)));
        }
        Commands::Available {
            date,
            service,
            barber,
            exclude,
            input,
        } => {
            let date = parse_date(&date)?;
            let snapshot = read_snapshot(input.as_deref())?;
            let config = BusinessConfig::from_record(&snapshot.shop);
            let service_key = service.unwrap_or_else(|| config.default_service_key().to_string());

            let mut query = AvailabilityQuery::new(date, &service_key);
            query.barber_id = barber.as_deref();
            query.exclude_appointment_id = exclude.as_deref();

            let starts = available_starts(&query, &config, &snapshot.appointments, &snapshot.barbers);
            print_lines(&slots::labels(&starts));
        }
        Commands::Check {
            start_a,
            duration_a,
            start_b,
            duration_b,
        } => {
            let verdict = if conflict::overlaps(&start_a, duration_a, &start_b, duration_b) {
                "conflict"
            } else {
                "free"
            };
            println!("{}", verdict);
        }
        Commands::Digest {
            from,
            days,
            barber,
            now,
            input,
        } => {
            let from = parse_date(&from)?;
            let now = match now {
                Some(raw) => parse_datetime(&raw)?,
                None => chrono::Local::now().naive_local(),
            };
            let snapshot = read_snapshot(input.as_deref())?;
            let config = BusinessConfig::from_record(&snapshot.shop);
            let shop = ShopProfile::from_record(&snapshot.shop);

            let selected = match barber.as_deref() {
                Some(id) => Some(
                    snapshot
                        .barbers
                        .iter()
                        .find(|b| b.id == id)
                        .with_context(|| format!("Unknown barber: {}", id))?,
                ),
                None => None,
            };

            let request = DigestRequest {
                from,
                days,
                now,
                service_key: None,
                barber_id: barber.as_deref(),
            };
            let open = digest::open_days(&request, &config, &snapshot.appointments, &snapshot.barbers);
            println!("{}", digest::render_availability(&shop, &open, days, selected));
        }
        Commands::Pending { today, input } => {
            let today = parse_date(&today)?;
            let snapshot = read_snapshot(input.as_deref())?;
            let config = BusinessConfig::from_record(&snapshot.shop);

            let pending = billing::pending_payments(&snapshot.appointments, &config, today);
            let summary = billing::summarize(&pending);

            for bucket in summary.buckets.iter().filter(|b| b.count > 0) {
                println!(
                    "{} ({}, {})",
                    bucket.priority,
                    bucket.count,
                    billing::format_price(saturate(bucket.amount))
                );
                for p in pending.iter().filter(|p| p.priority == bucket.priority) {
                    println!(
                        "  {} {}  {:<12} {}",
                        p.date,
                        clock::format_time(p.start),
                        p.appointment_id,
                        billing::format_price(p.amount)
                    );
                }
            }
            println!(
                "Total: {} pending, {}",
                summary.total_count,
                billing::format_price(saturate(summary.total_amount))
            );
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `-v`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,barber_slots=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn read_snapshot(path: Option<&str>) -> Result<ShopSnapshot> {
    let raw = read_input(path)?;
    if raw.trim().is_empty() {
        return Ok(ShopSnapshot::default());
    }
    serde_json::from_str(&raw).context("Failed to parse shop snapshot JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    clock::parse_date(raw).with_context(|| format!("Invalid date: {}", raw))
}

fn parse_datetime(raw: &str) -> Result<NaiveDateTime> {
    let trimmed = raw.trim();
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .with_context(|| format!("Invalid date-time: {}", raw))
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn saturate(amount: u64) -> u32 {
    u32::try_from(amount).unwrap_or(u32::MAX)
}
