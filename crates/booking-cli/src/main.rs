//! `slots` CLI — expand bookable events, list available dates and check
//! booking status changes from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Expand an event document (stdin → stdout)
//! cat event.json | slots expand
//!
//! # Only the occurrences in March, from file to file
//! slots expand -i event.json --from 2024-03-01 --to 2024-03-31 -o march.json
//!
//! # Date-picker list: occurrence days plus every booked day
//! slots dates -i event.json
//!
//! # Fail instead of warning when a booking date is unreadable
//! slots dates -i event.json --strict
//!
//! # What can a confirmed booking become?
//! slots next confirmed
//!
//! # Is a status change allowed? (exit code 1 if not)
//! slots check completed pending
//! ```
//!
//! Diagnostics go to stderr; set `RUST_LOG` or pass `--verbose` for more.

use anyhow::{Context, Result};
use booking_engine::{BookingStatus, Event};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, IsTerminal, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Bookable occurrences, available dates and booking status rules"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug diagnostics to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand an event document into its occurrences
    Expand {
        /// Input event JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// First day of the window (YYYY-MM-DD, requires --to)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,
        /// Last day of the window (YYYY-MM-DD, requires --from)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
    },
    /// List the days a client can book: occurrences plus booked days
    Dates {
        /// Input event JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Fail if any booking date is unreadable
        #[arg(long)]
        strict: bool,
    },
    /// Print the statuses a booking may move to, one per line
    Next {
        /// Current status (e.g. pending, confirmed, no_show)
        status: BookingStatus,
    },
    /// Check whether a booking may move between two statuses
    Check {
        /// Current status
        from: BookingStatus,
        /// Requested status
        to: BookingStatus,
    },
}

#[derive(Serialize)]
struct OccurrenceOut {
    start: String,
    end: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Expand {
            input,
            output,
            from,
            to,
        } => {
            let event = read_event(input.as_deref())?;
            let occurrences = match (from, to) {
                (Some(from), Some(to)) => event.occurrences_between(from, to),
                _ => event.occurrences(),
            }
            .context("Failed to expand event")?;
            debug!(count = occurrences.len(), event = %event.id, "expanded event");

            let out: Vec<OccurrenceOut> = occurrences
                .iter()
                .map(|o| OccurrenceOut {
                    start: o.start().to_rfc3339(),
                    end: o.end().to_rfc3339(),
                })
                .collect();
            write_output(output.as_deref(), &serde_json::to_string_pretty(&out)?)?;
        }
        Commands::Dates {
            input,
            output,
            strict,
        } => {
            let event = read_event(input.as_deref())?;
            let available = event
                .available_dates()
                .context("Failed to compute available dates")?;

            if strict && !available.warnings.is_empty() {
                anyhow::bail!(
                    "{} booking(s) have unreadable dates (first: {})",
                    available.warnings.len(),
                    available.warnings[0]
                );
            }

            write_output(
                output.as_deref(),
                &serde_json::to_string_pretty(&available)?,
            )?;
        }
        Commands::Next { status } => {
            for next in booking_engine::next_statuses(status) {
                println!("{}", next.as_str());
            }
        }
        Commands::Check { from, to } => {
            booking_engine::check_transition(from, to)?;
            println!("ok: {} -> {}", from, to);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn read_event(path: Option<&str>) -> Result<Event> {
    let json = read_input(path)?;
    Event::from_json(&json).context("Failed to parse event document")
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
