//! Client configuration.
//!
//! Only presentation knobs are configurable. The request timeout is fixed
//! (see [`crate::builder::REQUEST_TIMEOUT`]).

use tracing::warn;

use crate::decode::KeyDecoding;

pub const LOG_REQUESTS_ENV: &str = "DISPATCH_LOG_REQUESTS";
pub const KEY_DECODING_ENV: &str = "DISPATCH_KEY_DECODING";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Dump every outgoing request at debug level.
    pub log_requests: bool,
    pub key_decoding: KeyDecoding,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_requests: true,
            key_decoding: KeyDecoding::ConvertFromSnakeCase,
        }
    }
}

impl ClientConfig {
    /// Read overrides from `DISPATCH_LOG_REQUESTS` and `DISPATCH_KEY_DECODING`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    /// Unrecognized values keep the default and log a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(LOG_REQUESTS_ENV) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => config.log_requests = true,
                "false" | "0" => config.log_requests = false,
                other => warn!(value = other, "ignoring invalid {LOG_REQUESTS_ENV}"),
            }
        }

        if let Some(raw) = lookup(KEY_DECODING_ENV) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "snake_case" => config.key_decoding = KeyDecoding::ConvertFromSnakeCase,
                "default" => config.key_decoding = KeyDecoding::UseDefaultKeys,
                other => warn!(value = other, "ignoring invalid {KEY_DECODING_ENV}"),
            }
        }

        config
    }
}
