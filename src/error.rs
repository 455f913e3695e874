// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.

use crate::config::ConfigError;

/// Application error type shared by the API client and the store.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Activity not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Activity API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for failures a retry by the user could plausibly fix
    /// (transport problems and server errors, not bad input).
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Api(_))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .filter_map(|e| e.message.as_deref())
                    .collect::<Vec<_>>()
                    .join(", ");
                if detail.is_empty() {
                    field.to_string()
                } else {
                    detail
                }
            })
            .collect();
        fields.sort();
        AppError::Validation(fields.join("; "))
    }
}

/// Result type alias for store and client operations
pub type Result<T> = std::result::Result<T, AppError>;
