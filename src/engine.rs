//! Read-only query surface over a normalized dataset
//!
//! A [`SurveillanceEngine`] owns one immutable dataset and the configuration
//! it was built with. Every query takes an optional inclusive date range and
//! recomputes its answer from the records; a new raw load needs a new engine.

use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use serde::Serialize;

use crate::algorithm::distribution::{
    self, CaseTypeCategory, Distribution, OutcomeCategory, RiskCategory,
};
use crate::algorithm::filter::{self, DatasetView, DateRange};
use crate::algorithm::indicators::{
    self, BigNumbers, LatestNotifications, LtbiTotals, PediatricSummary,
};
use crate::algorithm::period::Granularity;
use crate::algorithm::series::{self, PeriodAggregate, SeriesMetric, SeriesRow};
use crate::algorithm::targets::{Target, TargetEvaluation};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{IngestReport, OutcomeDefinition, SurveillanceDataset};

/// Headline indicators together with their target evaluations
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scorecard {
    /// Headline indicators
    pub big_numbers: BigNumbers,
    /// LTBI coverage against its target
    pub ltbi_coverage: TargetEvaluation,
    /// Yearly incidence against its target
    pub incidence: TargetEvaluation,
}

/// Surveillance metrics engine
#[derive(Debug, Clone)]
pub struct SurveillanceEngine {
    dataset: SurveillanceDataset,
    config: EngineConfig,
}

impl SurveillanceEngine {
    /// Normalize raw record batches and build an engine over them
    pub fn new(batches: &[RecordBatch], config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let dataset = SurveillanceDataset::normalize(batches, &config)?;
        Ok(Self { dataset, config })
    }

    /// Build an engine over an already normalized dataset
    #[must_use]
    pub const fn from_dataset(dataset: SurveillanceDataset, config: EngineConfig) -> Self {
        Self { dataset, config }
    }

    /// The normalized dataset
    #[must_use]
    pub const fn dataset(&self) -> &SurveillanceDataset {
        &self.dataset
    }

    /// Engine configuration
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ingestion summary
    #[must_use]
    pub const fn ingest_report(&self) -> &IngestReport {
        self.dataset.report()
    }

    /// Records within the range, in dataset order
    #[must_use]
    pub fn apply_date_filter(&self, filter: Option<&DateRange>) -> DatasetView<'_> {
        filter::apply_date_filter(&self.dataset, filter)
    }

    /// Total cured, LTBI coverage and yearly incidence
    #[must_use]
    pub fn big_numbers(&self, filter: Option<&DateRange>) -> BigNumbers {
        indicators::big_numbers(
            &self.apply_date_filter(filter),
            self.config.reference_population,
        )
    }

    /// Outcome distribution of the latest month
    #[must_use]
    pub fn treatment_outcome_distribution(
        &self,
        filter: Option<&DateRange>,
        definition: OutcomeDefinition,
    ) -> Distribution<OutcomeCategory> {
        distribution::treatment_outcome_distribution(&self.apply_date_filter(filter), definition)
    }

    /// High-risk distribution of the latest month
    #[must_use]
    pub fn high_risk_distribution(&self, filter: Option<&DateRange>) -> Distribution<RiskCategory> {
        distribution::high_risk_distribution(&self.apply_date_filter(filter))
    }

    /// New or relapse share among under-14 cases
    #[must_use]
    pub fn under14_distribution(
        &self,
        filter: Option<&DateRange>,
    ) -> Distribution<CaseTypeCategory> {
        distribution::under14_distribution(&self.apply_date_filter(filter))
    }

    /// Requested metrics per period, chronological
    #[must_use]
    pub fn period_series(
        &self,
        filter: Option<&DateRange>,
        granularity: Granularity,
        definition: OutcomeDefinition,
        metrics: &[SeriesMetric],
    ) -> Vec<SeriesRow> {
        series::period_series(
            &self.apply_date_filter(filter),
            granularity,
            definition,
            metrics,
            self.config.reference_population,
        )
    }

    /// Every metric per period, chronological
    #[must_use]
    pub fn period_aggregates(
        &self,
        filter: Option<&DateRange>,
        granularity: Granularity,
        definition: OutcomeDefinition,
    ) -> Vec<PeriodAggregate> {
        series::period_aggregates(
            &self.apply_date_filter(filter),
            granularity,
            definition,
            self.config.reference_population,
        )
    }

    /// Summed LTBI counters, `None` when the LTBI columns were absent
    #[must_use]
    pub fn ltbi_totals(&self, filter: Option<&DateRange>) -> Option<LtbiTotals> {
        indicators::ltbi_totals(&self.apply_date_filter(filter))
    }

    /// Under-14 case counts
    #[must_use]
    pub fn pediatric_summary(&self, filter: Option<&DateRange>) -> PediatricSummary {
        indicators::pediatric_summary(&self.apply_date_filter(filter))
    }

    /// New and relapse cases in their latest months
    #[must_use]
    pub fn latest_notifications(&self, filter: Option<&DateRange>) -> LatestNotifications {
        indicators::latest_notifications(&self.apply_date_filter(filter))
    }

    /// Earliest and latest enrollment date within the range
    #[must_use]
    pub fn date_bounds(&self, filter: Option<&DateRange>) -> Option<(NaiveDate, NaiveDate)> {
        self.apply_date_filter(filter).date_bounds()
    }

    /// Headline indicators evaluated against the configured targets
    #[must_use]
    pub fn scorecard(&self, filter: Option<&DateRange>) -> Scorecard {
        let big_numbers = self.big_numbers(filter);
        Scorecard {
            big_numbers,
            ltbi_coverage: TargetEvaluation::new(
                big_numbers.ltbi_coverage_pct,
                Target::at_least(self.config.ltbi_target_pct),
            ),
            incidence: TargetEvaluation::new(
                big_numbers.yearly_incidence_per_100k,
                Target::at_most(self.config.incidence_target_per_100k),
            ),
        }
    }
}
