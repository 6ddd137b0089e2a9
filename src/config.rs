//! Configuration loader for the `nutrisoil-report` binary.
//!
//! All runtime configuration is read here from environment variables (with
//! optional `.env` support loaded by the caller), so the rest of the binary
//! never calls `env::var` directly.
//!
use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u32 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Upper bound on `REPORT_DECIMALS`; more digits than this carry no
/// information for soil readings.
const MAX_DECIMALS: u32 = 6;

/// Strongly typed report configuration, immutable once loaded.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// JSON file holding an array of measurement records.
    pub measurements_file: PathBuf,

    /// Decimal places used when rendering averages.
    pub decimals: usize,

    /// Restrict the report to one field ("predio").
    pub field_id: Option<i64>,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `MEASUREMENTS_FILE` – path to the measurements JSON array
///
/// Optional:
/// - `REPORT_DECIMALS` – decimal places for averages (default: 1, max: 6)
/// - `REPORT_FIELD_ID` – only report measurements of this field
pub fn load_from_env() -> Result<Config> {
    // ---
    let measurements_file = PathBuf::from(require_env!("MEASUREMENTS_FILE"));
    let decimals = parse_env_u32!("REPORT_DECIMALS", 1);
    if decimals > MAX_DECIMALS {
        return Err(anyhow!(
            "Invalid REPORT_DECIMALS: {} exceeds maximum of {}",
            decimals,
            MAX_DECIMALS
        ));
    }

    let field_id = env::var("REPORT_FIELD_ID")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.trim().parse::<i64>())
        .transpose()
        .map_err(|e| anyhow!("Invalid REPORT_FIELD_ID: {}", e))?;

    Ok(Config {
        measurements_file,
        decimals: decimals as usize,
        field_id,
    })
}

impl Config {
    /// Log the loaded configuration.
    pub fn log_config(&self) {
        // ---
        let field = self
            .field_id
            .map_or_else(|| "(all)".to_string(), |id| id.to_string());

        tracing::info!("Configuration loaded:");
        tracing::info!("  MEASUREMENTS_FILE : {}", self.measurements_file.display());
        tracing::info!("  REPORT_DECIMALS   : {}", self.decimals);
        tracing::info!("  REPORT_FIELD_ID   : {}", field);
    }
}
