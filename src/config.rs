//! Runtime configuration
//!
//! Defaults match a catalog server running on the same machine. Each value
//! can be overridden through an environment variable read once at startup.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CATALOG_URL: &str = "http://localhost:5000/api/songs";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_LOG_DIR: &str = ".logs";

const ENV_CATALOG_URL: &str = "TUNES_CATALOG_URL";
const ENV_REQUEST_TIMEOUT: &str = "TUNES_REQUEST_TIMEOUT_SECS";
const ENV_LOG_DIR: &str = "TUNES_LOG_DIR";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub catalog_url: String,
    pub request_timeout: Duration,
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl Config {
    /// Read overrides from the process environment.
    ///
    /// Runs before logging is up, so rejected values come back as warnings
    /// for the caller to report once tracing is initialized.
    pub fn from_env() -> (Self, Vec<String>) {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<String>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut warnings = Vec::new();

        if let Some(url) = lookup(ENV_CATALOG_URL) {
            let url = url.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                config.catalog_url = url.to_string();
            } else {
                warnings.push(format!("{ENV_CATALOG_URL}={url:?} is not an http(s) URL, using default"));
            }
        }

        if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT) {
            match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => warnings.push(format!("{ENV_REQUEST_TIMEOUT}={secs:?} is not a positive integer, using default")),
            }
        }

        if let Some(dir) = lookup(ENV_LOG_DIR) {
            if !dir.trim().is_empty() {
                config.log_dir = PathBuf::from(dir.trim());
            }
        }

        (config, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let (config, warnings) = Config::from_lookup(lookup_from(&[]));
        assert!(warnings.is_empty());
        assert_eq!(config, Config::default());
        assert_eq!(config.catalog_url, "http://localhost:5000/api/songs");
    }

    #[test]
    fn overrides_are_applied() {
        let (config, _) = Config::from_lookup(lookup_from(&[
            ("TUNES_CATALOG_URL", "https://music.example.org/api/songs"),
            ("TUNES_REQUEST_TIMEOUT_SECS", "3"),
            ("TUNES_LOG_DIR", "/tmp/tunes-logs"),
        ]));
        assert_eq!(config.catalog_url, "https://music.example.org/api/songs");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/tunes-logs"));
    }

    #[test]
    fn invalid_values_fall_back_with_warnings() {
        let (config, warnings) = Config::from_lookup(lookup_from(&[
            ("TUNES_CATALOG_URL", "localhost:5000"),
            ("TUNES_REQUEST_TIMEOUT_SECS", "0"),
        ]));
        assert_eq!(config.catalog_url, DEFAULT_CATALOG_URL);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(warnings.len(), 2);
    }
}
