//! Period-bucketed time series
//!
//! Records are grouped by month or quarter and counted per bucket. Only
//! periods that contain at least one record appear; gaps are not filled.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::algorithm::filter::DatasetView;
use crate::algorithm::indicators::PER_POPULATION;
use crate::algorithm::period::{Granularity, PeriodKey};
use crate::error::SurveillanceError;
use crate::models::{OutcomeDefinition, PatientRecord};

/// A metric that can be requested in a period series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesMetric {
    /// Records enrolled in the period
    Diagnosed,
    /// Successful outcomes under the chosen definition
    Successful,
    /// High-risk records
    HighRisk,
    /// New cases
    NewCases,
    /// Relapse cases
    RelapseCases,
    /// New cases per 100 000 reference population
    NewRatePer100k,
    /// Relapse cases per 100 000 reference population
    RelapseRatePer100k,
}

impl SeriesMetric {
    /// Every metric, in output order
    pub const ALL: [Self; 7] = [
        Self::Diagnosed,
        Self::Successful,
        Self::HighRisk,
        Self::NewCases,
        Self::RelapseCases,
        Self::NewRatePer100k,
        Self::RelapseRatePer100k,
    ];

    /// Stable identifier, as used on the command line and in JSON
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Diagnosed => "diagnosed",
            Self::Successful => "successful",
            Self::HighRisk => "high_risk",
            Self::NewCases => "new_cases",
            Self::RelapseCases => "relapse_cases",
            Self::NewRatePer100k => "new_rate_per_100k",
            Self::RelapseRatePer100k => "relapse_rate_per_100k",
        }
    }
}

impl fmt::Display for SeriesMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeriesMetric {
    type Err = SurveillanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|metric| metric.as_str() == wanted)
            .ok_or_else(|| SurveillanceError::InvalidArgument(format!("Unknown metric: {s}")))
    }
}

/// Every metric of one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodAggregate {
    /// Period bucket
    pub period: PeriodKey,
    /// First day of the period
    pub period_start: NaiveDate,
    /// Records enrolled in the period
    pub diagnosed: usize,
    /// Successful outcomes under the chosen definition
    pub successful: usize,
    /// High-risk records
    pub high_risk: usize,
    /// New cases
    pub new_cases: usize,
    /// Relapse cases
    pub relapse_cases: usize,
    /// New cases per 100 000 reference population
    pub new_rate_per_100k: f64,
    /// Relapse cases per 100 000 reference population
    pub relapse_rate_per_100k: f64,
}

impl PeriodAggregate {
    fn empty(period: PeriodKey) -> Self {
        Self {
            period,
            period_start: period.start_date(),
            diagnosed: 0,
            successful: 0,
            high_risk: 0,
            new_cases: 0,
            relapse_cases: 0,
            new_rate_per_100k: 0.0,
            relapse_rate_per_100k: 0.0,
        }
    }

    fn add(&mut self, record: &PatientRecord, definition: OutcomeDefinition) {
        self.diagnosed += 1;
        self.successful += usize::from(record.is_successful(definition));
        self.high_risk += usize::from(record.is_high_risk());
        self.new_cases += usize::from(record.is_new_case());
        self.relapse_cases += usize::from(record.is_relapse_case());
    }

    /// Value of a single metric
    #[must_use]
    pub fn metric(&self, metric: SeriesMetric) -> f64 {
        match metric {
            SeriesMetric::Diagnosed => self.diagnosed as f64,
            SeriesMetric::Successful => self.successful as f64,
            SeriesMetric::HighRisk => self.high_risk as f64,
            SeriesMetric::NewCases => self.new_cases as f64,
            SeriesMetric::RelapseCases => self.relapse_cases as f64,
            SeriesMetric::NewRatePer100k => self.new_rate_per_100k,
            SeriesMetric::RelapseRatePer100k => self.relapse_rate_per_100k,
        }
    }
}

/// One row of a requested series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    /// Period bucket
    pub period: PeriodKey,
    /// First day of the period
    pub period_start: NaiveDate,
    /// Requested metric values
    pub values: BTreeMap<SeriesMetric, f64>,
}

/// Count per population, zero for a non-positive population
fn rate_per_100k(count: usize, reference_population: f64) -> f64 {
    if reference_population <= 0.0 {
        return 0.0;
    }
    count as f64 / reference_population * PER_POPULATION
}

/// Group a view into periods and compute every metric, in chronological order
#[must_use]
pub fn period_aggregates(
    view: &DatasetView<'_>,
    granularity: Granularity,
    definition: OutcomeDefinition,
    reference_population: f64,
) -> Vec<PeriodAggregate> {
    let mut buckets: FxHashMap<PeriodKey, PeriodAggregate> = FxHashMap::default();
    for record in view.iter() {
        let period = record.period(granularity);
        buckets
            .entry(period)
            .or_insert_with(|| PeriodAggregate::empty(period))
            .add(record, definition);
    }

    buckets
        .into_values()
        .map(|mut aggregate| {
            aggregate.new_rate_per_100k = rate_per_100k(aggregate.new_cases, reference_population);
            aggregate.relapse_rate_per_100k =
                rate_per_100k(aggregate.relapse_cases, reference_population);
            aggregate
        })
        .sorted_by_key(|aggregate| aggregate.period)
        .collect()
}

/// Series of the requested metrics, one row per non-empty period
#[must_use]
pub fn period_series(
    view: &DatasetView<'_>,
    granularity: Granularity,
    definition: OutcomeDefinition,
    metrics: &[SeriesMetric],
    reference_population: f64,
) -> Vec<SeriesRow> {
    period_aggregates(view, granularity, definition, reference_population)
        .into_iter()
        .map(|aggregate| SeriesRow {
            period: aggregate.period,
            period_start: aggregate.period_start,
            values: metrics
                .iter()
                .map(|metric| (*metric, aggregate.metric(*metric)))
                .collect(),
        })
        .collect()
}
