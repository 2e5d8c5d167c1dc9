//! Client Configuration
//!
//! Backend location, demo user, retry and log settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_USER_ID: u32 = 1;

/// Retry policy for idempotent GET requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after each failure
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay_ms: 250,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 0,
        }
    }

    /// Backoff after the given failed attempt (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_url: String,
    pub user_id: u32,
    pub retry: RetryPolicy,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_id: DEFAULT_USER_ID,
            retry: RetryPolicy::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Apply optional overrides (typically baked in at build time).
    /// Unparseable user ids are ignored.
    pub fn with_overrides(mut self, api_url: Option<&str>, user_id: Option<&str>) -> Self {
        if let Some(url) = api_url.map(str::trim).filter(|u| !u.is_empty()) {
            self.api_url = url.to_string();
        }
        if let Some(raw) = user_id {
            match raw.trim().parse() {
                Ok(id) => self.user_id = id,
                Err(_) => tracing::warn!(user_id = raw, "ignoring unparseable user id override"),
            }
        }
        self
    }

    /// Absolute URL for a backend path such as `/leaderboard`
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_slashes() {
        let cfg = ClientConfig {
            api_url: "http://localhost:5000/".into(),
            ..Default::default()
        };
        assert_eq!(cfg.endpoint("/leaderboard"), "http://localhost:5000/leaderboard");
        assert_eq!(cfg.endpoint("my_garden/1"), "http://localhost:5000/my_garden/1");
    }

    #[test]
    fn test_overrides() {
        let cfg = ClientConfig::default().with_overrides(Some("http://api.test"), Some("42"));
        assert_eq!(cfg.api_url, "http://api.test");
        assert_eq!(cfg.user_id, 42);

        let cfg = ClientConfig::default().with_overrides(Some("  "), Some("abc"));
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.user_id, DEFAULT_USER_ID);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let cfg: ClientConfig = serde_json::from_str(r#"{"user_id": 7}"#).unwrap();
        assert_eq!(cfg.user_id, 7);
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.retry, RetryPolicy::default());
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy {
            max_attempts: 4,
            base_delay_ms: 100,
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
    }
}
