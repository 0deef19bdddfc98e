//! Twingate client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tgp_graphql::RetryPolicy;

use crate::error::{TwingateError, TwingateResult};

pub const ENV_NETWORK: &str = "TWINGATE_NETWORK";
pub const ENV_URL: &str = "TWINGATE_URL";
pub const ENV_API_TOKEN: &str = "TWINGATE_API_TOKEN";
pub const ENV_HTTP_TIMEOUT: &str = "TWINGATE_HTTP_TIMEOUT";
pub const ENV_HTTP_MAX_RETRY: &str = "TWINGATE_HTTP_MAX_RETRY";
pub const ENV_PAGE_LIMIT: &str = "TWINGATE_PAGE_LIMIT";
pub const ENV_RATE_LIMIT: &str = "TWINGATE_RATE_LIMIT";

/// Configuration for the Twingate client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwingateConfig {
    /// Tenant network slug, e.g. `acme` for `acme.twingate.com`.
    #[serde(default)]
    pub network: String,

    /// Base domain (default: twingate.com)
    #[serde(default = "default_url")]
    pub url: String,

    /// API token
    #[serde(default, skip_serializing)]
    pub api_token: String,

    /// Explicit `scheme://host[:port]` replacing `https://{network}.{url}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    /// Per-attempt HTTP timeout
    #[serde(default = "default_http_timeout", with = "duration_secs")]
    pub http_timeout: Duration,

    /// Retries after the first attempt
    #[serde(default = "default_http_max_retry")]
    pub http_max_retry: usize,

    /// Smallest backoff between retries
    #[serde(default = "default_retry_wait_min", with = "duration_secs")]
    pub retry_wait_min: Duration,

    /// Largest backoff between retries
    #[serde(default = "default_retry_wait_max", with = "duration_secs")]
    pub retry_wait_max: Duration,

    /// Page size for paginated reads
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,

    /// Maximum concurrent API calls
    #[serde(default = "default_rate_limit")]
    pub rate_limit: usize,

    /// User agent product suffix (`Twingate{agent}/{version}`)
    #[serde(default = "default_agent")]
    pub agent: String,

    #[serde(default = "default_version")]
    pub version: String,
}

fn default_url() -> String {
    "twingate.com".into()
}

const fn default_http_timeout() -> Duration {
    Duration::from_secs(10)
}

const fn default_http_max_retry() -> usize {
    10
}

const fn default_retry_wait_min() -> Duration {
    Duration::from_secs(1)
}

const fn default_retry_wait_max() -> Duration {
    Duration::from_secs(30)
}

const fn default_page_limit() -> usize {
    50
}

const fn default_rate_limit() -> usize {
    3
}

fn default_agent() -> String {
    "TF".into()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").into()
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for TwingateConfig {
    fn default() -> Self {
        Self {
            network: String::new(),
            url: default_url(),
            api_token: String::new(),
            server_url: None,
            http_timeout: default_http_timeout(),
            http_max_retry: default_http_max_retry(),
            retry_wait_min: default_retry_wait_min(),
            retry_wait_max: default_retry_wait_max(),
            page_limit: default_page_limit(),
            rate_limit: default_rate_limit(),
            agent: default_agent(),
            version: default_version(),
        }
    }
}

impl TwingateConfig {
    /// Defaults overlaid with `TWINGATE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    ///
    /// Numeric values that fail to parse keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(network) = lookup(ENV_NETWORK) {
            config.network = network;
        }
        if let Some(url) = lookup(ENV_URL).filter(|url| !url.is_empty()) {
            config.url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN) {
            config.api_token = token;
        }
        if let Some(secs) = parse_number::<u64>(lookup(ENV_HTTP_TIMEOUT)) {
            config.http_timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = parse_number(lookup(ENV_HTTP_MAX_RETRY)) {
            config.http_max_retry = retries;
        }
        if let Some(limit) = parse_number(lookup(ENV_PAGE_LIMIT)) {
            config.page_limit = limit;
        }
        if let Some(limit) = parse_number(lookup(ENV_RATE_LIMIT)) {
            config.rate_limit = limit;
        }
        config
    }

    /// Check the settings a client cannot start without.
    pub fn validate(&self) -> TwingateResult<()> {
        if self.api_token.is_empty() {
            return Err(TwingateError::ApiTokenNotSet);
        }
        if self.network.is_empty() && self.server_url.is_none() {
            return Err(TwingateError::InvalidConfig("network is not set".into()));
        }
        if self.page_limit == 0 {
            return Err(TwingateError::InvalidConfig(
                "page limit must be positive".into(),
            ));
        }
        if self.rate_limit == 0 {
            return Err(TwingateError::InvalidConfig(
                "rate limit must be positive".into(),
            ));
        }
        Ok(())
    }

    /// `scheme://host` the API is served from.
    pub fn server_url(&self) -> String {
        match &self.server_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.{}", self.network, self.url),
        }
    }

    /// GraphQL endpoint.
    pub fn graphql_url(&self) -> String {
        format!("{}/api/graphql/", self.server_url())
    }

    /// REST API base.
    pub fn rest_url(&self) -> String {
        format!("{}/api/v4", self.server_url())
    }

    pub fn user_agent(&self) -> String {
        format!("Twingate{}/{}", self.agent, self.version)
    }

    /// Transport retry policy derived from the retry settings.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.http_max_retry,
            base_delay: self.retry_wait_min,
            max_delay: self.retry_wait_max.max(self.retry_wait_min),
            ..RetryPolicy::default()
        }
    }
}

fn parse_number<T: std::str::FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|value| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = TwingateConfig::default();
        assert_eq!(config.url, "twingate.com");
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.http_max_retry, 10);
        assert_eq!(config.page_limit, 50);
        assert_eq!(config.rate_limit, 3);
        assert_eq!(config.agent, "TF");
    }

    #[test]
    fn derived_urls() {
        let config = TwingateConfig {
            network: "acme".into(),
            ..TwingateConfig::default()
        };
        assert_eq!(config.graphql_url(), "https://acme.twingate.com/api/graphql/");
        assert_eq!(config.rest_url(), "https://acme.twingate.com/api/v4");

        let config = TwingateConfig {
            server_url: Some("http://127.0.0.1:8080/".into()),
            ..config
        };
        assert_eq!(config.graphql_url(), "http://127.0.0.1:8080/api/graphql/");
    }

    #[test]
    fn user_agent_format() {
        let config = TwingateConfig {
            version: "1.2.3".into(),
            ..TwingateConfig::default()
        };
        assert_eq!(config.user_agent(), "TwingateTF/1.2.3");
    }

    #[test]
    fn env_overrides() {
        let config = TwingateConfig::from_lookup(lookup(&[
            (ENV_NETWORK, "acme"),
            (ENV_URL, "stg.opstg.com"),
            (ENV_API_TOKEN, "secret"),
            (ENV_HTTP_TIMEOUT, "35"),
            (ENV_HTTP_MAX_RETRY, "4"),
            (ENV_PAGE_LIMIT, "100"),
            (ENV_RATE_LIMIT, "7"),
        ]));
        assert_eq!(config.network, "acme");
        assert_eq!(config.url, "stg.opstg.com");
        assert_eq!(config.api_token, "secret");
        assert_eq!(config.http_timeout, Duration::from_secs(35));
        assert_eq!(config.http_max_retry, 4);
        assert_eq!(config.page_limit, 100);
        assert_eq!(config.rate_limit, 7);
    }

    #[test]
    fn unparsable_numbers_keep_defaults() {
        let config = TwingateConfig::from_lookup(lookup(&[
            (ENV_PAGE_LIMIT, "lots"),
            (ENV_RATE_LIMIT, ""),
            (ENV_HTTP_TIMEOUT, "-1"),
        ]));
        assert_eq!(config.page_limit, 50);
        assert_eq!(config.rate_limit, 3);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
    }

    #[test]
    fn empty_token_is_rejected() {
        let config = TwingateConfig {
            network: "acme".into(),
            ..TwingateConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TwingateError::ApiTokenNotSet)
        ));
    }

    #[test]
    fn serde_uses_defaults_and_seconds() {
        let config: TwingateConfig =
            serde_json::from_str(r#"{"network": "acme", "http_timeout": 3}"#).expect("config");
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.page_limit, 50);

        let value = serde_json::to_value(&config).expect("serialize");
        assert_eq!(value["http_timeout"], 3);
        assert!(value.get("api_token").is_none());
    }

    #[test]
    fn retry_policy_follows_settings() {
        let config = TwingateConfig {
            http_max_retry: 2,
            retry_wait_min: Duration::ZERO,
            retry_wait_max: Duration::ZERO,
            ..TwingateConfig::default()
        };
        let policy = config.retry_policy();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.base_delay, Duration::ZERO);
    }
}
