//! Classification of free-text surveillance fields
//!
//! Every comparison trims surrounding whitespace and ignores case. Values
//! that do not match a known literal fall into a neutral category instead
//! of raising an error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SurveillanceError;
use crate::schema::RiskFactor;

/// Normalize a free-text cell for comparison
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Recorded treatment outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreatmentOutcome {
    /// Bacteriologically confirmed cure
    Cured,
    /// Treatment completed without confirmed cure
    Completed,
    /// Any other outcome, including blank or unrecognized text
    Other,
}

impl TreatmentOutcome {
    /// Classify a raw outcome cell
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(normalize_text).as_deref() {
            Some("cured") => Self::Cured,
            Some("completed") => Self::Completed,
            _ => Self::Other,
        }
    }
}

/// Previous treatment history of a notified case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreatmentHistory {
    /// Never treated before
    New,
    /// Previously treated and declared cured or completed
    Relapse,
    /// Anything else, including blank or unrecognized text
    Other,
}

impl TreatmentHistory {
    /// Classify a raw treatment history cell
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(normalize_text).as_deref() {
            Some("new") => Self::New,
            Some("relapse") => Self::Relapse,
            _ => Self::Other,
        }
    }
}

/// Which outcomes count as a treatment success
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeDefinition {
    /// Only "cured"
    CuredOnly,
    /// "cured" or "completed"
    #[default]
    CuredOrCompleted,
}

impl fmt::Display for OutcomeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CuredOnly => write!(f, "cured-only"),
            Self::CuredOrCompleted => write!(f, "cured-or-completed"),
        }
    }
}

impl FromStr for OutcomeDefinition {
    type Err = SurveillanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_text(s).as_str() {
            "cured-only" | "cured_only" | "cured" => Ok(Self::CuredOnly),
            "cured-or-completed" | "cured_or_completed" | "cured+completed" => {
                Ok(Self::CuredOrCompleted)
            }
            other => Err(SurveillanceError::InvalidArgument(format!(
                "Unknown outcome definition: {other}"
            ))),
        }
    }
}

/// Classify a yes/no or status cell for a risk factor
///
/// Only the exact positive literal sets the flag; "no", blanks and any
/// unrecognized text are false.
#[must_use]
pub fn is_risk_flag_set(factor: RiskFactor, raw: Option<&str>) -> bool {
    raw.is_some_and(|value| normalize_text(value) == factor.positive_literal())
}

/// Parse a numeric cell, rejecting blanks, text and non-finite values
fn parse_finite(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Parse an age cell; non-numeric values are unknown
#[must_use]
pub fn parse_age(raw: Option<&str>) -> Option<f64> {
    parse_finite(raw)
}

/// Parse a contact-tracing counter; non-numeric values count as zero
#[must_use]
pub fn parse_count(raw: Option<&str>) -> f64 {
    parse_finite(raw).unwrap_or(0.0)
}
