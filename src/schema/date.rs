//! Free-text date parsing
//!
//! Diagnostic dates arrive as text typed into a surveillance system, so the
//! same column can mix several layouts. Parsing tries a configurable list of
//! formats and falls back to a small pattern-based detection.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Configuration for date format handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateFormatConfig {
    /// Date format strings to try, in order
    pub date_formats: Vec<String>,
    /// Date-time format strings to try; the time part is discarded
    pub datetime_formats: Vec<String>,
    /// Enable heuristic format detection when no listed format matches
    pub enable_format_detection: bool,
}

impl Default for DateFormatConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%Y-%m-%d".to_string(), // ISO format: 2023-01-15
                "%d-%m-%Y".to_string(), // European: 15-01-2023
                "%m/%d/%Y".to_string(), // US: 01/15/2023
                "%d/%m/%Y".to_string(), // UK: 15/01/2023
                "%Y/%m/%d".to_string(), // 2023/01/15
                "%d.%m.%Y".to_string(), // 15.01.2023
                "%Y%m%d".to_string(),   // Compact: 20230115
                "%d %b %Y".to_string(), // 15 Jan 2023
                "%d %B %Y".to_string(), // 15 January 2023
            ],
            datetime_formats: vec![
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%Y-%m-%d %H:%M:%S%.f".to_string(),
                "%Y-%m-%dT%H:%M:%S%.f".to_string(),
                "%m/%d/%Y %H:%M".to_string(),
                "%m/%d/%Y %H:%M:%S".to_string(),
                "%d/%m/%Y %H:%M".to_string(),
            ],
            enable_format_detection: true,
        }
    }
}

/// Parse a date string with multiple format attempts
///
/// Listed date formats are tried first, then date-time formats, then
/// RFC 3339 timestamps with an offset. Surrounding whitespace is ignored. Returns `None` when no format matches,
/// which callers treat as "no usable date" rather than an error.
#[must_use]
pub fn parse_date_string(s: &str, config: &DateFormatConfig) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for format in &config.date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    for format in &config.datetime_formats {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, format) {
            return Some(datetime.date());
        }
    }

    // Timezone-aware timestamps keep the calendar date of their own offset
    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        return Some(datetime.date_naive());
    }

    if config.enable_format_detection {
        if let Some(detected_format) = detect_date_format(s) {
            if let Ok(date) = NaiveDate::parse_from_str(s, detected_format) {
                return Some(date);
            }
        }
    }

    None
}

/// Try to detect the date format based on string patterns
///
/// Only covers spreadsheet-style layouts with a textual month, which the
/// listed formats do not.
fn detect_date_format(s: &str) -> Option<&'static str> {
    if !s.chars().any(char::is_alphabetic) {
        return None;
    }

    // 15-Jan-2024 / 15-January-2024
    if s.contains('-') {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() == 3 && parts[1].chars().all(char::is_alphabetic) {
            return Some(if parts[1].len() == 3 { "%d-%b-%Y" } else { "%d-%B-%Y" });
        }
    }

    // January 15, 2024 / Jan 15, 2024
    if s.contains(',') {
        let month = s.split_whitespace().next().unwrap_or_default();
        return Some(if month.len() == 3 { "%b %d, %Y" } else { "%B %d, %Y" });
    }

    None
}
