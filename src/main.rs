//! Entry point for the `nutrisoil-report` binary.
//!
//! Reads a JSON array of soil measurement records (as exported by the
//! measurement API), groups them into Monday-anchored weeks and prints the
//! weekly report as JSON on stdout. Startup sequence:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing (to stderr)
//! - Parsing measurement records, skipping ones that fail to parse
//! - Building and printing the report
//!
//! # Environment Variables
//! - `MEASUREMENTS_FILE` (**required**) – path to the measurements JSON
//! - `REPORT_DECIMALS` (optional) – decimal places (default: 1)
//! - `REPORT_FIELD_ID` (optional) – restrict to one field
//! - `NUTRISOIL_LOG_LEVEL` (optional) – log verbosity (default: `info`)
//! - `NUTRISOIL_SPAN_EVENTS` (optional) – span event mode for tracing
use std::{env, fs};

use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use nutrisoil_core::{build_report, Measurement};

mod config;

// ---

fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let contents = fs::read_to_string(&cfg.measurements_file).map_err(|e| {
        anyhow!(
            "Failed to read measurements file '{}': {}",
            cfg.measurements_file.display(),
            e
        )
    })?;

    let measurements = parse_measurements(&contents)?;
    let report = build_report(&measurements, cfg.field_id, cfg.decimals);

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// ---

/// Parse the measurement array, skipping records that do not deserialize.
fn parse_measurements(contents: &str) -> Result<Vec<Measurement>> {
    // ---
    let items: Vec<serde_json::Value> = serde_json::from_str(contents)
        .map_err(|e| anyhow!("Measurements file is not a JSON array: {}", e))?;

    let mut measurements = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Measurement>(item) {
            Ok(m) => measurements.push(m),
            Err(e) => tracing::debug!("Failed to parse record {}: {}", i, e),
        }
    }

    tracing::info!("Parsed {} measurement records", measurements.len());
    Ok(measurements)
}

/// Initialize the global tracing subscriber for structured logging.
///
/// - Output goes to stderr; stdout is reserved for the report
/// - Color output controlled by TTY detection and `FORCE_COLOR` env var:
///   - `FORCE_COLOR=1|true|yes`: force colors on
///   - `FORCE_COLOR=0|false|no`: force colors off
///   - unset or other values: auto-detect TTY
/// - Span event emission mode controlled by the `NUTRISOIL_SPAN_EVENTS` env var:
///   - `"full"`       : emit ENTER, EXIT, and CLOSE events with timing
///   - `"enter_exit"` : emit ENTER and EXIT only
///   - unset or other values: emit CLOSE events only (default)
/// - Log level from `RUST_LOG`, else `NUTRISOIL_LOG_LEVEL`
fn init_tracing() {
    // ---
    let span_events = match env::var("NUTRISOIL_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stderr().is_terminal(),
    };

    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("NUTRISOIL_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "info",
        };
        EnvFilter::new(level)
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
