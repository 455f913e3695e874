// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for activity date handling.
//!
//! Dates arrive from the API as ISO 8601 strings, sometimes with fractional
//! seconds and a timezone suffix. They are kept as local wall-clock strings
//! (`YYYY-MM-DDTHH:MM:SS`) once ingested.

use chrono::{NaiveDate, NaiveDateTime};

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_TIME_MINUTES_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Strip fractional seconds and any timezone suffix from an ISO 8601 date.
///
/// `2023-01-05T10:00:00.123Z` becomes `2023-01-05T10:00:00`. Date-only
/// values pass through unchanged.
pub fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();
    let Some((date, time)) = raw.split_once('T') else {
        return raw.to_string();
    };

    // Offset sign or `Z` can only appear after the time component.
    let time = time
        .split_once(['Z', 'z', '+', '-'])
        .map_or(time, |(head, _)| head);
    let time = time.split_once('.').map_or(time, |(head, _)| head);

    format!("{}T{}", date, time)
}

/// Parse a normalized date into a timestamp for ordering.
///
/// Accepts full date-times, minute-precision date-times, and bare dates
/// (taken as midnight). Returns `None` for anything else.
pub fn parse_timestamp(date: &str) -> Option<NaiveDateTime> {
    let date = normalize_date(date);
    NaiveDateTime::parse_from_str(&date, DATE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(&date, DATE_TIME_MINUTES_FORMAT))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(&date, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Calendar-day key of a date: everything before the time component.
pub fn date_key(date: &str) -> &str {
    date.split_once('T').map_or(date, |(day, _)| day)
}
