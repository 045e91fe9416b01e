//! Layered configuration, sourced from environment variables.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_result_cap() -> usize {
    200
}

fn default_solver_deadline() -> Duration {
    Duration::from_millis(500)
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(10)
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    fundu::parse_duration(&raw).map_err(serde::de::Error::custom)
}

/// Process-wide configuration, merged from the environment by [`crate::app::App::new`].
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Postgres connection string for the section catalog.
    pub database_url: String,

    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base tracing level for the crate's own modules (the rest stay at `warn`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Maximum number of distinct schedules returned per request.
    #[serde(default = "default_result_cap")]
    pub solver_result_cap: usize,

    /// Wall-clock budget per solve call, parsed from forms like `"500ms"` or `"2s"`.
    #[serde(default = "default_solver_deadline", deserialize_with = "deserialize_duration")]
    pub solver_deadline: Duration,

    /// How long in-flight requests are given to drain on SIGTERM/SIGINT.
    #[serde(default = "default_shutdown_timeout", deserialize_with = "deserialize_duration")]
    pub shutdown_timeout: Duration,
}
