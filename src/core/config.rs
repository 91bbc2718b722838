//! Application configuration from environment variables.
//!
//! Load configuration using `Config::from_env()` after calling `dotenvy::dotenv()`.

use std::path::PathBuf;
use std::str::FromStr;

#[cfg(feature = "client")]
use super::sharing::ShareClient;
use super::store::FileStore;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_SHARE_CAPACITY: usize = 1000;
pub const DEFAULT_SHARE_TTL_DAYS: i64 = 7;
/// Upper bound accepted for `DBMODELER_SHARE_TTL_DAYS`
pub const MAX_SHARE_TTL_DAYS: i64 = 3650;
pub const DEFAULT_SHARE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_DATA_DIR: &str = ".dbmodeler";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Share server bind address
    /// Example: 0.0.0.0:8080
    pub addr: String,

    /// Maximum number of live shared schemas
    pub share_capacity: usize,

    /// Days a shared schema stays retrievable
    pub share_ttl_days: i64,

    /// Base URL of the share service, used by the client
    pub share_url: String,

    /// Directory the local schema blob is stored in
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` before this to load from `.env` file.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            addr: lookup("DBMODELER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            share_capacity: parse_or(
                "DBMODELER_SHARE_CAPACITY",
                lookup("DBMODELER_SHARE_CAPACITY"),
                DEFAULT_SHARE_CAPACITY,
                |_| true,
            ),
            share_ttl_days: parse_or(
                "DBMODELER_SHARE_TTL_DAYS",
                lookup("DBMODELER_SHARE_TTL_DAYS"),
                DEFAULT_SHARE_TTL_DAYS,
                |days| (1..=MAX_SHARE_TTL_DAYS).contains(days),
            ),
            share_url: lookup("DBMODELER_SHARE_URL")
                .unwrap_or_else(|| DEFAULT_SHARE_URL.to_string()),
            data_dir: lookup("DBMODELER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        }
    }

    /// Share retention as a `chrono` duration, clamped to `1..=MAX_SHARE_TTL_DAYS`
    pub fn share_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.share_ttl_days.clamp(1, MAX_SHARE_TTL_DAYS))
    }

    /// Local schema store under `data_dir`
    pub fn file_store(&self) -> FileStore {
        FileStore::new(&self.data_dir)
    }

    #[cfg(feature = "client")]
    pub fn share_client(&self) -> ShareClient {
        ShareClient::new(&self.share_url)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_vars(|_| None)
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(
    key: &str,
    raw: Option<String>,
    default: T,
    in_range: impl Fn(&T) -> bool,
) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) if in_range(&value) => value,
        Ok(_) => {
            tracing::warn!("{key}={raw:?} is out of range, using {default}");
            default
        }
        Err(_) => {
            tracing::warn!("{key}={raw:?} is not a valid number, using {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    // ========================================================================
    // Config Struct Tests (no env var dependencies - thread safe)
    // ========================================================================

    #[test]
    fn test_config_defaults() {
        let config = Config::default();

        assert_eq!(config.addr, "127.0.0.1:3000");
        assert_eq!(config.share_capacity, 1000);
        assert_eq!(config.share_ttl_days, 7);
        assert_eq!(config.share_url, "http://127.0.0.1:3000");
        assert_eq!(config.data_dir, PathBuf::from(".dbmodeler"));
        assert_eq!(config.share_ttl(), chrono::Duration::days(7));
    }

    #[test]
    fn test_config_with_all_fields() {
        let config = Config::from_vars(lookup(&[
            ("DBMODELER_ADDR", "0.0.0.0:8080"),
            ("DBMODELER_SHARE_CAPACITY", "25"),
            ("DBMODELER_SHARE_TTL_DAYS", "1"),
            ("DBMODELER_SHARE_URL", "https://share.example.com"),
            ("DBMODELER_DATA_DIR", "/var/lib/dbmodeler"),
        ]));

        assert_eq!(
            config,
            Config {
                addr: "0.0.0.0:8080".to_string(),
                share_capacity: 25,
                share_ttl_days: 1,
                share_url: "https://share.example.com".to_string(),
                data_dir: PathBuf::from("/var/lib/dbmodeler"),
            }
        );
    }

    #[test]
    fn test_config_with_partial_fields() {
        let config = Config::from_vars(lookup(&[("DBMODELER_SHARE_CAPACITY", " 3 ")]));

        assert_eq!(config.share_capacity, 3);
        assert_eq!(config.addr, DEFAULT_ADDR);
        assert_eq!(config.share_ttl_days, DEFAULT_SHARE_TTL_DAYS);
    }

    #[test]
    fn test_invalid_numbers_fall_back_to_defaults() {
        let config = Config::from_vars(lookup(&[
            ("DBMODELER_SHARE_CAPACITY", "lots"),
            ("DBMODELER_SHARE_TTL_DAYS", "-"),
        ]));

        assert_eq!(config.share_capacity, DEFAULT_SHARE_CAPACITY);
        assert_eq!(config.share_ttl_days, DEFAULT_SHARE_TTL_DAYS);
    }

    #[test]
    fn test_out_of_range_ttl_falls_back_to_default() {
        for raw in ["0", "-1", "3651", "200000000000"] {
            let config = Config::from_vars(lookup(&[("DBMODELER_SHARE_TTL_DAYS", raw)]));
            assert_eq!(config.share_ttl_days, DEFAULT_SHARE_TTL_DAYS, "{raw}");
            assert_eq!(config.share_ttl(), chrono::Duration::days(DEFAULT_SHARE_TTL_DAYS));
        }

        let config = Config::from_vars(lookup(&[("DBMODELER_SHARE_TTL_DAYS", "3650")]));
        assert_eq!(config.share_ttl_days, MAX_SHARE_TTL_DAYS);
    }

    #[test]
    fn test_share_ttl_clamps_direct_values() {
        let config = Config {
            share_ttl_days: i64::MAX,
            ..Config::default()
        };
        assert_eq!(config.share_ttl(), chrono::Duration::days(MAX_SHARE_TTL_DAYS));

        let config = Config {
            share_ttl_days: -5,
            ..Config::default()
        };
        assert_eq!(config.share_ttl(), chrono::Duration::days(1));
    }

    #[test]
    fn test_config_from_env_returns_config() {
        // Actual values depend on environment, so we don't assert specific values
        let config = Config::from_env();
        assert!(!config.addr.is_empty());
    }

    #[test]
    fn test_file_store_uses_data_dir() {
        let config = Config::from_vars(lookup(&[("DBMODELER_DATA_DIR", "/tmp/models")]));
        assert_eq!(
            config.file_store().path(),
            PathBuf::from("/tmp/models/db-modeler-data.json")
        );
    }

    #[cfg(feature = "client")]
    #[test]
    fn test_share_client_uses_share_url() {
        let config = Config::from_vars(lookup(&[("DBMODELER_SHARE_URL", "http://share.local/")]));
        assert_eq!(
            config.share_client().share_url("abc"),
            "http://share.local/api/share/abc"
        );
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        assert_eq!(config.clone(), config);
    }
}
