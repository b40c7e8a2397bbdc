use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE_URL: &str = "https://adam-search-860977612313.europe-central2.run.app";
const DEFAULT_STATUS_PATH: &str = "get_data";
const DEFAULT_RECOMPUTE_PATH: &str = "search_orders";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;
const MIN_POLL_INTERVAL_SECS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppProfile {
    Dev,
    Prod,
}

impl AppProfile {
    pub fn from_env(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some("prod") | Some("production") => Self::Prod,
            _ => Self::Dev,
        }
    }

    pub fn log_level(self) -> tracing::Level {
        match self {
            Self::Dev => tracing::Level::DEBUG,
            Self::Prod => tracing::Level::INFO,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub status_path: String,
    pub recompute_path: String,
    pub profile: AppProfile,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            status_path: DEFAULT_STATUS_PATH.to_string(),
            recompute_path: DEFAULT_RECOMPUTE_PATH.to_string(),
            profile: AppProfile::Dev,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        crate::config::load_dotenv();

        Self::from_lookup(read_env)
    }

    /// Builds a config from an arbitrary key lookup; unset or unparsable keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        if let Some(url) = read("ORDER_STATUS_API_BASE_URL") {
            config.api_base_url = url;
        }

        if let Some(path) = read("ORDER_STATUS_STATUS_PATH") {
            config.status_path = path;
        }

        if let Some(path) = read("ORDER_STATUS_RECOMPUTE_PATH") {
            config.recompute_path = path;
        }

        config.profile = AppProfile::from_env(read("ORDER_STATUS_PROFILE"));

        if let Some(secs) =
            read("ORDER_STATUS_POLL_INTERVAL_SECS").and_then(|value| value.parse::<u64>().ok())
        {
            config.poll_interval = Duration::from_secs(secs.max(MIN_POLL_INTERVAL_SECS));
        }

        if let Some(secs) =
            read("ORDER_STATUS_REQUEST_TIMEOUT_SECS").and_then(|value| value.parse::<u64>().ok())
        {
            config.request_timeout = Duration::from_secs(secs.max(1));
        }

        config
    }

    pub fn status_url(&self) -> String {
        join_url(&self.api_base_url, &self.status_path)
    }

    pub fn recompute_url(&self) -> String {
        join_url(&self.api_base_url, &self.recompute_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .or_else(|| option_env_from_build(key).map(|s| s.to_string()))
}

fn option_env_from_build(key: &str) -> Option<&'static str> {
    match key {
        "ORDER_STATUS_API_BASE_URL" => option_env!("ORDER_STATUS_API_BASE_URL"),
        "ORDER_STATUS_STATUS_PATH" => option_env!("ORDER_STATUS_STATUS_PATH"),
        "ORDER_STATUS_RECOMPUTE_PATH" => option_env!("ORDER_STATUS_RECOMPUTE_PATH"),
        "ORDER_STATUS_PROFILE" => option_env!("ORDER_STATUS_PROFILE"),
        "ORDER_STATUS_POLL_INTERVAL_SECS" => option_env!("ORDER_STATUS_POLL_INTERVAL_SECS"),
        "ORDER_STATUS_REQUEST_TIMEOUT_SECS" => option_env!("ORDER_STATUS_REQUEST_TIMEOUT_SECS"),
        _ => None,
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            tracing::warn!("failed to load .env: {err}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[inline]
pub fn load_dotenv() {}

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
    fn defaults_point_at_production_backend() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(
            config.status_url(),
            "https://adam-search-860977612313.europe-central2.run.app/get_data"
        );
        assert_eq!(
            config.recompute_url(),
            "https://adam-search-860977612313.europe-central2.run.app/search_orders"
        );
        assert_eq!(config.poll_interval, Duration::from_secs(300));
        assert_eq!(config.profile, AppProfile::Dev);
    }

    #[test]
    fn overrides_are_applied_and_urls_joined_cleanly() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("ORDER_STATUS_API_BASE_URL", "http://localhost:8000/"),
            ("ORDER_STATUS_STATUS_PATH", "/status"),
            ("ORDER_STATUS_RECOMPUTE_PATH", "recompute"),
            ("ORDER_STATUS_PROFILE", "production"),
            ("ORDER_STATUS_REQUEST_TIMEOUT_SECS", "5"),
        ]));

        assert_eq!(config.status_url(), "http://localhost:8000/status");
        assert_eq!(config.recompute_url(), "http://localhost:8000/recompute");
        assert_eq!(config.profile, AppProfile::Prod);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn intervals_are_clamped_and_garbage_ignored() {
        let clamped = AppConfig::from_lookup(lookup_from(&[
            ("ORDER_STATUS_POLL_INTERVAL_SECS", "1"),
            ("ORDER_STATUS_REQUEST_TIMEOUT_SECS", "0"),
        ]));
        assert_eq!(clamped.poll_interval, Duration::from_secs(10));
        assert_eq!(clamped.request_timeout, Duration::from_secs(1));

        let garbage = AppConfig::from_lookup(lookup_from(&[
            ("ORDER_STATUS_POLL_INTERVAL_SECS", "five minutes"),
            ("ORDER_STATUS_API_BASE_URL", "   "),
        ]));
        assert_eq!(garbage.poll_interval, Duration::from_secs(300));
        assert_eq!(garbage.api_base_url, DEFAULT_API_BASE_URL);
    }
}
