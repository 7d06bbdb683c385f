use std::{env, time::Duration};

use jpashop_core::query::{DEFAULT_BATCH_FETCH_SIZE, MAX_IN_LIST_LEN};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file (default: "jpashop.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[cfg_attr(not(feature = "sqlite"), allow(dead_code))]
    pub sqlite_path: String,
    /// Max root ids per batched collection query (default: 100, between 1 and
    /// `MAX_IN_LIST_LEN`)
    pub batch_fetch_size: usize,
    /// Insert the demo orders into an empty store at startup (default: true)
    pub seed_demo_data: bool,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SQLITE_PATH` - SQLite database path (default: "jpashop.db")
    /// - `BATCH_FETCH_SIZE` - Batch size for collection loads (default: 100)
    /// - `SEED_DEMO_DATA` - Seed demo data on startup (default: true)
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 10)
    pub fn from_env() -> Self {
        Self {
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "jpashop.db".to_string()),
            batch_fetch_size: env::var("BATCH_FETCH_SIZE")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .map(clamp_batch_size)
                .unwrap_or(DEFAULT_BATCH_FETCH_SIZE),
            seed_demo_data: env::var("SEED_DEMO_DATA")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
            request_timeout_seconds: env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn clamp_batch_size(value: i64) -> usize {
    usize::try_from(value.clamp(1, MAX_IN_LIST_LEN as i64)).unwrap_or(DEFAULT_BATCH_FETCH_SIZE)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_timeout_conversion() {
        let config = Config {
            sqlite_path: "test.db".to_string(),
            batch_fetch_size: 100,
            seed_demo_data: true,
            request_timeout_seconds: 30,
        };

        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_clamp_batch_size() {
        assert_eq!(clamp_batch_size(0), 1);
        assert_eq!(clamp_batch_size(-5), 1);
        assert_eq!(clamp_batch_size(1), 1);
        assert_eq!(clamp_batch_size(250), 250);
        assert_eq!(clamp_batch_size(40_000), MAX_IN_LIST_LEN);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" FALSE "), Some(false));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        env::remove_var("SQLITE_PATH");
        env::remove_var("BATCH_FETCH_SIZE");
        env::remove_var("SEED_DEMO_DATA");
        env::remove_var("REQUEST_TIMEOUT_SECONDS");

        let config = Config::from_env();

        assert_eq!(config.sqlite_path, "jpashop.db");
        assert_eq!(config.batch_fetch_size, 100);
        assert!(config.seed_demo_data);
        assert_eq!(config.request_timeout_seconds, 10);
    }
}
