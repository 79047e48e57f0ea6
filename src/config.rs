use chrono::{Duration, NaiveDate};

use crate::error::{AppError, Result};

pub const FOOTBALL_DATA_API_URL: &str = "https://api.football-data.org";

/// Sport tag written to every team record and scan-log entry.
pub const SPORT: &str = "football";

/// Challenge start date — fixtures before this day are never requested.
pub const DEFAULT_START_DATE: &str = "2024-10-05";

/// Batch wall-clock budget (ms). Conservative ceiling under a 10s host limit:
/// remaining competitions are marked skipped once this is spent.
pub const DEFAULT_SCAN_BUDGET_MS: u64 = 9_000;

/// How often the background loop runs a full batch scan (seconds).
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 600;

/// A top-tier competition becomes urgent once unscanned for this long.
pub const LIVE_STALENESS_MINS: i64 = 30;

/// Any competition unscanned for this long outranks tier-based urgency.
pub const SUPER_STALE_HOURS: i64 = 6;

/// Provider request timeout (seconds).
pub const PROVIDER_TIMEOUT_SECS: u64 = 15;

/// Staleness thresholds handed to the scheduler. Kept as an explicit value so
/// the scheduler stays a pure function of its inputs.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub live_after: Duration,
    pub super_stale_after: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            live_after: Duration::minutes(LIVE_STALENESS_MINS),
            super_stale_after: Duration::hours(SUPER_STALE_HOURS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// football-data.org API token (FOOTBALL_DATA_API_KEY, required).
    pub api_key: String,
    pub provider_url: String,
    pub log_level: String,
    pub db_path: String,
    pub api_port: u16,
    /// First day of the fixture window (START_DATE).
    pub start_date: NaiveDate,
    /// Batch budget in milliseconds (SCAN_BUDGET_MS).
    pub scan_budget_ms: u64,
    /// Background batch interval in seconds (SCAN_INTERVAL_SECS, 0 disables).
    pub scan_interval_secs: u64,
    pub scheduler: SchedulerConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("FOOTBALL_DATA_API_KEY")
            .map_err(|_| AppError::Config("FOOTBALL_DATA_API_KEY must be set".to_string()))?;

        let start_date = std::env::var("START_DATE")
            .unwrap_or_else(|_| DEFAULT_START_DATE.to_string())
            .parse::<NaiveDate>()
            .map_err(|_| AppError::Config("START_DATE must be YYYY-MM-DD".to_string()))?;

        Ok(Self {
            api_key,
            provider_url: std::env::var("FOOTBALL_DATA_API_URL")
                .unwrap_or_else(|_| FOOTBALL_DATA_API_URL.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "streaks.db".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            start_date,
            scan_budget_ms: std::env::var("SCAN_BUDGET_MS")
                .unwrap_or_else(|_| DEFAULT_SCAN_BUDGET_MS.to_string())
                .parse::<u64>()
                .unwrap_or(DEFAULT_SCAN_BUDGET_MS),
            scan_interval_secs: std::env::var("SCAN_INTERVAL_SECS")
                .unwrap_or_else(|_| DEFAULT_SCAN_INTERVAL_SECS.to_string())
                .parse::<u64>()
                .unwrap_or(DEFAULT_SCAN_INTERVAL_SECS),
            scheduler: SchedulerConfig::default(),
        })
    }
}
