use crate::telemetry::LogFormat;
use clap::Args;
use std::time::Duration;

pub const DEFAULT_COURIERS: i64 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_MS: i64 = 2_000;

/// Process-wide settings, read from flags or the environment.
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Couriers that can be assigned at once (clamped to 1..=128)
    #[arg(
        long,
        env = "ORDER_COURIERS",
        default_value_t = DEFAULT_COURIERS,
        allow_negative_numbers = true,
        global = true
    )]
    pub couriers: i64,

    /// Deadline for a whole order in milliseconds; non-positive means the default
    #[arg(
        long,
        env = "ORDER_REQUEST_TIMEOUT_MS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_MS,
        allow_negative_numbers = true,
        global = true
    )]
    pub request_timeout_ms: i64,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        match u64::try_from(self.request_timeout_ms) {
            Ok(ms) if ms > 0 => Duration::from_millis(ms),
            _ => Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS as u64),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            couriers: DEFAULT_COURIERS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            log_format: LogFormat::Pretty,
        }
    }
}
