// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.

use std::env;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the activities REST API (no trailing slash)
    pub api_base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_base_url =
            env::var("ACTIVITY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_base_url = normalize_base_url(&api_base_url)?;

        let timeout_secs = env::var("ACTIVITY_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Config for tests, pointing at `base_url`.
    pub fn test_default(base_url: &str) -> Self {
        Self {
            api_base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            name: "ACTIVITY_API_URL",
            value: raw.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}
