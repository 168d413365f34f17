//! Client configuration.

use std::borrow::Cow;
use std::env;
use std::fmt;
use std::time::Duration;

/// Public endpoint of the Financial Datasets API.
pub const DEFAULT_BASE_URL: &str = "https://api.financialdatasets.ai";

/// Environment variable holding the default API key.
pub const API_KEY_ENV: &str = "FINANCIAL_DATASETS_API_KEY";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "FINANCIAL_DATASETS_BASE_URL";

/// Retries after the initial attempt when the API rate limits.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Linear backoff schedule applied between rate-limited attempts.
///
/// The wait before retry `n` (0-based) is `base + step * n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Backoff {
    /// Wait before the first retry.
    pub base: Duration,
    /// Increment added for each further retry.
    pub step: Duration,
}

impl Backoff {
    /// Creates a linear schedule.
    #[must_use]
    pub const fn linear(base: Duration, step: Duration) -> Self {
        Self { base, step }
    }

    /// Returns the wait before the retry following `attempt` (0-based).
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base + self.step * attempt
    }
}

impl Default for Backoff {
    /// 60s, 90s, 120s, ...
    fn default() -> Self {
        Self::linear(Duration::from_secs(60), Duration::from_secs(30))
    }
}

/// Configuration for [`FinancialDatasetsClient`](crate::FinancialDatasetsClient).
#[derive(Clone, PartialEq, Eq)]
pub struct FdsConfig {
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Default API key, used when a call does not pass its own. When unset,
    /// `FINANCIAL_DATASETS_API_KEY` is read at call time.
    pub api_key: Option<String>,
    /// Retries after the initial attempt on HTTP 429.
    pub max_retries: u32,
    /// Wait schedule between rate-limited attempts.
    pub backoff: Backoff,
}

impl fmt::Debug for FdsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FdsConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("max_retries", &self.max_retries)
            .field("backoff", &self.backoff)
            .finish()
    }
}

impl Default for FdsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: Backoff::default(),
        }
    }
}

impl FdsConfig {
    /// Builds a configuration from the environment.
    ///
    /// Reads the API key from `FINANCIAL_DATASETS_API_KEY` and an optional base
    /// URL override from `FINANCIAL_DATASETS_BASE_URL`. Empty values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = non_empty_var(BASE_URL_ENV) {
            config = config.with_base_url(url);
        }
        config.api_key = non_empty_var(API_KEY_ENV);
        config
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the default API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the number of retries on HTTP 429.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the backoff schedule.
    #[must_use]
    pub const fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Key from `FINANCIAL_DATASETS_API_KEY`, read at call time.
pub(crate) fn env_api_key() -> Option<String> {
    non_empty_var(API_KEY_ENV)
}

/// Picks the key for one call: per-call key, then configured key, then `env_key`.
pub(crate) fn resolve_api_key<'a>(
    explicit: Option<&'a str>,
    configured: Option<&'a str>,
    env_key: impl FnOnce() -> Option<String>,
) -> Option<Cow<'a, str>> {
    explicit
        .or(configured)
        .map(Cow::Borrowed)
        .or_else(|| env_key().map(Cow::Owned))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_resolution_order() {
        let from_env = || Some("env_key".to_string());

        let key = resolve_api_key(Some("per_call"), Some("configured"), from_env);
        assert_eq!(key.as_deref(), Some("per_call"));

        let key = resolve_api_key(None, Some("configured"), from_env);
        assert_eq!(key.as_deref(), Some("configured"));

        let key = resolve_api_key(None, None, from_env);
        assert_eq!(key.as_deref(), Some("env_key"));

        assert_eq!(resolve_api_key(None, None, || None), None);
    }

    #[test]
    fn test_environment_consulted_only_as_last_resort() {
        let key = resolve_api_key(None, Some("configured"), || {
            panic!("environment read although a key was configured")
        });
        assert_eq!(key.as_deref(), Some("configured"));
    }

    #[test]
    fn test_default_backoff_schedule() {
        let backoff = Backoff::default();
        assert_eq!(backoff.delay(0), Duration::from_secs(60));
        assert_eq!(backoff.delay(1), Duration::from_secs(90));
        assert_eq!(backoff.delay(2), Duration::from_secs(120));
        assert_eq!(backoff.delay(3), Duration::from_secs(150));
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let config = FdsConfig::default()
            .with_base_url("http://localhost:8080/")
            .with_max_retries(1);
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_retries, 1);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = FdsConfig::default().with_api_key("secret_key_12345");
        let debug_str = format!("{config:?}");
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
