//! Configuration for the surveillance engine.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SurveillanceError};
use crate::schema::{ColumnNames, DateFormatConfig};

/// Reference population used to normalize incidence
pub const DEFAULT_REFERENCE_POPULATION: f64 = 14_260_000.0;

/// LTBI preventive-therapy coverage target in percent
pub const DEFAULT_LTBI_TARGET_PCT: f64 = 90.0;

/// Incidence target per 100 000 population
pub const DEFAULT_INCIDENCE_TARGET_PER_100K: f64 = 46.0;

/// Configuration for the `SurveillanceEngine`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Population that incidence and per-period rates are normalized by
    pub reference_population: f64,
    /// Date format configuration for the enrollment date column
    pub date_formats: DateFormatConfig,
    /// Exact names of the input columns
    pub columns: ColumnNames,
    /// LTBI coverage target in percent (higher is better)
    pub ltbi_target_pct: f64,
    /// Incidence target per 100 000 (lower is better)
    pub incidence_target_per_100k: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_population: DEFAULT_REFERENCE_POPULATION,
            date_formats: DateFormatConfig::default(),
            columns: ColumnNames::default(),
            ltbi_target_pct: DEFAULT_LTBI_TARGET_PCT,
            incidence_target_per_100k: DEFAULT_INCIDENCE_TARGET_PER_100K,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a JSON file
    ///
    /// Fields missing from the file keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| SurveillanceError::io(path, e))?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            SurveillanceError::Config(format!("Invalid configuration in {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Set the reference population
    #[must_use]
    pub fn with_reference_population(mut self, population: f64) -> Self {
        self.reference_population = population;
        self
    }

    /// Check that the configuration can be used to build an engine
    ///
    /// A non-positive reference population is accepted; incidence then
    /// resolves to zero.
    pub fn validate(&self) -> Result<()> {
        if !self.reference_population.is_finite() {
            return Err(SurveillanceError::Config(
                "Reference population must be a finite number".to_string(),
            ));
        }
        if self.date_formats.date_formats.is_empty() && self.date_formats.datetime_formats.is_empty()
        {
            return Err(SurveillanceError::Config(
                "At least one date or datetime format is required".to_string(),
            ));
        }
        if self.columns.enrollment_date.is_empty() || self.columns.treatment_outcome.is_empty() {
            return Err(SurveillanceError::Config(
                "Required column names must not be empty".to_string(),
            ));
        }
        for (name, value) in [
            ("ltbi_target_pct", self.ltbi_target_pct),
            ("incidence_target_per_100k", self.incidence_target_per_100k),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SurveillanceError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "EngineConfig {{")?;
        writeln!(f, "  reference_population: {}", self.reference_population)?;
        writeln!(f, "  date_formats: {}", self.date_formats.date_formats.len())?;
        writeln!(f, "  datetime_formats: {}", self.date_formats.datetime_formats.len())?;
        writeln!(f, "  enrollment_date_column: {:?}", self.columns.enrollment_date)?;
        writeln!(f, "  ltbi_target_pct: {}", self.ltbi_target_pct)?;
        writeln!(f, "  incidence_target_per_100k: {}", self.incidence_target_per_100k)?;
        write!(f, "}}")
    }
}
