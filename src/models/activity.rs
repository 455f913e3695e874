// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity record as exchanged with the API.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

use crate::time_utils::{normalize_date, parse_timestamp};

/// A single activity. Treated as an immutable value: edits replace it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Activity {
    /// Client-generated identifier (also the registry key)
    #[validate(length(min = 1, message = "id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    /// Start date/time (ISO 8601, normalized on ingestion)
    #[validate(custom(function = "validate_date"))]
    pub date: String,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "venue is required"))]
    pub venue: String,
}

impl Activity {
    /// Return the record with its date normalized for storage.
    pub fn normalized(mut self) -> Self {
        self.date = normalize_date(&self.date);
        self
    }

    /// Parsed start time, if the date is well formed.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.date)
    }
}

fn validate_date(date: &str) -> Result<(), ValidationError> {
    if parse_timestamp(date).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("date");
        err.message = Some("date must be an ISO 8601 timestamp".into());
        Err(err)
    }
}
