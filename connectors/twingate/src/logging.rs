//! Logging bootstrap and payload redaction.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

use crate::error::{TwingateError, TwingateResult};

/// Keys masked by [`redact_sensitive`] when request payloads are logged.
pub const SENSITIVE_KEYS: &[&str] = &[
    "token",
    "authorization",
    "password",
    "secret",
    "api_key",
];

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

/// Install the global tracing subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> TwingateResult<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config.json {
        let json_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE);

        subscriber
            .with(json_layer)
            .try_init()
            .map_err(|e| TwingateError::LoggingInit(e.to_string()))?;
    } else {
        let pretty_layer = fmt::layer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE);

        subscriber
            .with(pretty_layer)
            .try_init()
            .map_err(|e| TwingateError::LoggingInit(e.to_string()))?;
    }

    Ok(())
}

/// Replace values under keys containing any of `keys` (case-insensitive).
#[must_use]
pub fn redact_sensitive(value: &Value, keys: &[&str]) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| {
                    let lower = key.to_lowercase();
                    let masked = keys.iter().any(|k| lower.contains(&k.to_lowercase()));
                    let val = if masked {
                        Value::String("[REDACTED]".to_string())
                    } else {
                        redact_sensitive(val, keys)
                    };
                    (key.clone(), val)
                })
                .collect(),
        ),
        Value::Array(items) => {
            Value::Array(items.iter().map(|v| redact_sensitive(v, keys)).collect())
        }
        other => other.clone(),
    }
}
