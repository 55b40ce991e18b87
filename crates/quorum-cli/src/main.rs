//! `quorum` CLI - find common meeting times across attendee calendars.
//!
//! ## Usage
//!
//! ```sh
//! # Top 5 half-hour slots for alice and bob in the week of 2024-02-12
//! quorum resolve -c calendars.json -a alice -a bob -d 30 --from 2024-02-12 --to 2024-02-16
//!
//! # Custom business hours / timezone
//! quorum resolve -c calendars.json -a alice -a bob -d 60 --from 2024-02-12 --to 2024-02-16 \
//!     --policy policy.json --max-results 3
//!
//! # Per-attendee free intervals
//! quorum free -c calendars.json -a alice --from 2024-02-12 --to 2024-02-12
//!
//! # Diagnostics go to stderr
//! RUST_LOG=quorum_engine=debug quorum resolve ...
//! ```
//!
//! The calendars file has the shape
//! `{"attendees": {"alice": [{"start": "...", "end": "...", "label": "..."}]}}`.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use quorum_engine::{
    aggregate, resolve_meeting_times_with, AggregateOptions, BusinessCalendarPolicy,
    InMemoryCalendarSource, ResolveOptions, DEFAULT_MAX_RESULTS, DEFAULT_RESOLUTION_MINUTES,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "quorum",
    version,
    about = "Find meeting times when a quorum of attendees is free"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank common free windows for a meeting
    Resolve {
        #[command(flatten)]
        query: Query,
        /// Meeting duration in minutes
        #[arg(short, long)]
        duration: i64,
        /// Maximum number of slots to return
        #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: usize,
        /// Sweep grid step in minutes
        #[arg(long, default_value_t = DEFAULT_RESOLUTION_MINUTES)]
        resolution: i64,
    },
    /// Show each attendee's free intervals within business hours
    Free {
        #[command(flatten)]
        query: Query,
    },
}

#[derive(Args)]
struct Query {
    /// JSON file with busy slots per attendee
    #[arg(short, long)]
    calendars: String,
    /// Attendee id (repeat for several attendees)
    #[arg(short, long = "attendee", required = true)]
    attendees: Vec<String>,
    /// First day of the range (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    from: String,
    /// Last day of the range, inclusive (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    to: String,
    /// JSON file with business days, hours, and timezone
    #[arg(long)]
    policy: Option<String>,
    /// Per-attendee fetch timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

/// A loaded query, ready to hand to the engine.
struct Prepared {
    source: InMemoryCalendarSource,
    policy: BusinessCalendarPolicy,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    fetch_timeout: Option<Duration>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Resolve {
            query,
            duration,
            max_results,
            resolution,
        } => {
            let prepared = prepare(&query)?;
            let options = ResolveOptions {
                policy: prepared.policy,
                max_results,
                fetch_timeout: prepared.fetch_timeout,
                resolution_minutes: resolution,
            };
            let resolution = resolve_meeting_times_with(
                &prepared.source,
                query.attendees.as_slice(),
                duration,
                prepared.range_start,
                prepared.range_end,
                &options,
            )
            .await
            .context("Failed to resolve meeting times")?;
            serde_json::to_string_pretty(&resolution)?
        }
        Commands::Free { query } => {
            let prepared = prepare(&query)?;
            prepared.policy.validate()?;
            let aggregation = aggregate(
                &prepared.source,
                query.attendees.as_slice(),
                prepared.range_start,
                prepared.range_end,
                &prepared.policy,
                AggregateOptions {
                    fetch_timeout: prepared.fetch_timeout,
                },
            )
            .await
            .context("Failed to aggregate availability")?;
            serde_json::to_string_pretty(&aggregation)?
        }
    };

    println!("{}", output);
    Ok(())
}

fn prepare(query: &Query) -> Result<Prepared> {
    let raw = std::fs::read_to_string(&query.calendars)
        .with_context(|| format!("Failed to read file: {}", query.calendars))?;
    let source = InMemoryCalendarSource::from_json(&raw)
        .with_context(|| format!("Invalid calendars file: {}", query.calendars))?;
    tracing::debug!(
        calendars = %query.calendars,
        known_attendees = source.attendee_ids().count(),
        "loaded calendar fixture"
    );

    let policy = match &query.policy {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path))?;
            serde_json::from_str(&raw).with_context(|| format!("Invalid policy file: {}", path))?
        }
        None => BusinessCalendarPolicy::default(),
    };

    let range_start = parse_day(&query.from, &policy)?;
    let range_end = parse_day(&query.to, &policy)?;

    Ok(Prepared {
        source,
        policy,
        range_start,
        range_end,
        fetch_timeout: query.timeout_ms.map(Duration::from_millis),
    })
}

/// Parse an RFC 3339 instant, or a bare date taken as local noon in the
/// policy timezone so it always lands on that calendar day.
fn parse_day(raw: &str, policy: &BusinessCalendarPolicy) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}': expected YYYY-MM-DD or RFC 3339", raw))?;
    let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());
    policy
        .timezone
        .from_local_datetime(&noon)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .with_context(|| format!("Date '{}' does not exist in {}", raw, policy.timezone))
}
