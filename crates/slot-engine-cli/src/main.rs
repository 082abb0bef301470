//! `slots` CLI: resolve bookable start times and inspect timezones.
//!
//! ## Usage
//!
//! ```sh
//! # Bookable starts for an event over an explicit range (JSON array on stdout)
//! slots resolve --schedule schedule.json --event event.json --busy busy.json \
//!     --from 2026-03-16T00:00:00Z --to 2026-03-23T00:00:00Z
//!
//! # Same, but busy time comes from raw calendar entries (timed / all-day)
//! slots resolve --schedule schedule.json --event event.json --calendar entries.json \
//!     --candidates candidates.json
//!
//! # Booking-page default: from now through the configured horizon
//! slots --config slots.toml resolve --schedule schedule.json --event event.json
//!
//! # Offset label of a timezone
//! slots offset America/New_York --at 2026-01-15T12:00:00Z
//!
//! # Every supported timezone with its offset label
//! slots timezones
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `warn`); logs go to stderr.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::io::{self, Read};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use slot_engine::candidates::{booking_window, candidate_instants};
use slot_engine::freebusy::BusyTimeline;
use slot_engine::model::{BusyInterval, Event, Schedule, TimeRange};
use slot_engine::provider::{normalize_entries, CalendarEntry};
use slot_engine::resolver::{resolve_with, PreparedSchedule};
use slot_engine::time::{supported_timezones, timezone_offset_label};
use slot_engine::EngineConfig;

#[derive(Parser)]
#[command(name = "slots", version, about = "Bookable time-slot resolution CLI")]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the bookable start times for an event as a JSON array
    Resolve {
        /// Schedule JSON file (owner_id, timezone, availabilities)
        #[arg(long)]
        schedule: String,
        /// Event JSON file
        #[arg(long)]
        event: String,
        /// JSON array of {start, end} busy intervals
        #[arg(long)]
        busy: Option<String>,
        /// JSON array of raw calendar entries ({"kind": "timed" | "all_day", ...})
        #[arg(long)]
        calendar: Option<String>,
        /// JSON array of candidate instants (reads from stdin when "-")
        #[arg(long, conflicts_with_all = ["from", "to"])]
        candidates: Option<String>,
        /// First candidate instant (RFC 3339)
        #[arg(long, requires = "to")]
        from: Option<String>,
        /// End of the candidate range, exclusive (RFC 3339)
        #[arg(long, requires = "from")]
        to: Option<String>,
        /// Minutes between generated candidates (defaults to the config value)
        #[arg(long)]
        step: Option<u32>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print the UTC offset label of a timezone
    Offset {
        /// IANA timezone identifier
        timezone: String,
        /// Instant to evaluate the offset at (RFC 3339, defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
    /// List every supported timezone with its offset label
    Timezones {
        /// Instant to evaluate offsets at (RFC 3339, defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => EngineConfig::default(),
    };
    debug!(?config, "loaded engine config");

    match cli.command {
        Commands::Resolve {
            schedule,
            event,
            busy,
            calendar,
            candidates,
            from,
            to,
            step,
            output,
        } => {
            let schedule: Schedule = read_json(&schedule)?;
            let event: Event = read_json(&event)?;
            let duration = event.duration().context("Invalid event")?;
            let prepared = PreparedSchedule::new(&schedule).context("Invalid schedule")?;

            let mut busy_intervals: Vec<BusyInterval> = match busy.as_deref() {
                Some(path) => read_json(path)?,
                None => Vec::new(),
            };
            if let Some(path) = calendar.as_deref() {
                let entries: Vec<CalendarEntry> = read_json(path)?;
                busy_intervals.extend(normalize_entries(&entries, prepared.tz()));
            }

            let step = step.unwrap_or(config.slot_step_minutes);
            let candidates: Vec<DateTime<Utc>> = match (candidates, from, to) {
                (Some(path), _, _) => read_json(&path)?,
                (None, Some(from), Some(to)) => {
                    let range = TimeRange {
                        start: parse_instant(&from)?,
                        end: parse_instant(&to)?,
                    };
                    candidate_instants(range, step)
                }
                _ => {
                    let window = booking_window(Utc::now(), &config, prepared.tz())
                        .context("Failed to compute booking window")?;
                    candidate_instants(window, step)
                }
            };

            let valid = resolve_with(
                &candidates,
                duration,
                &prepared,
                &BusyTimeline::new(&busy_intervals),
                config.parallel_threshold,
            );
            info!(
                candidates = candidates.len(),
                busy = busy_intervals.len(),
                valid = valid.len(),
                "resolved slots"
            );

            let json = serde_json::to_string_pretty(&valid)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Offset { timezone, at } => {
            let at = instant_or_now(at.as_deref())?;
            let label = timezone_offset_label(&timezone, at)?;
            println!("{}", label);
        }
        Commands::Timezones { at } => {
            let at = instant_or_now(at.as_deref())?;
            for option in supported_timezones(at) {
                println!("{} ({})", option.name, option.offset_label);
            }
        }
    }

    Ok(())
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid RFC 3339 datetime: {}", s))
}

fn instant_or_now(s: Option<&str>) -> Result<DateTime<Utc>> {
    s.map(parse_instant).unwrap_or_else(|| Ok(Utc::now()))
}

fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let contents = read_input(path)?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid JSON in {}", path))
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offsets_into_utc() {
        let parsed = parse_instant("2026-03-16T09:00:00-04:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-03-16T13:00:00+00:00");
    }

    #[test]
    fn rejects_naive_datetimes() {
        assert!(parse_instant("2026-03-16T09:00:00").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
