//! Date-range filtering of the normalized dataset
//!
//! A filter never copies records. It yields a [`DatasetView`] borrowing from
//! the dataset, which every aggregation then reads.

use chrono::NaiveDate;
use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

use crate::algorithm::period::{Granularity, PeriodKey};
use crate::models::{PatientRecord, SurveillanceDataset};

/// Defines a criterion for filtering records
pub trait FilterCriteria<T> {
    /// Determine if an entity meets the filter criteria
    fn meets_criteria(&self, entity: &T) -> bool;
}

/// Inclusive range of enrollment dates
///
/// A range whose start lies after its end matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First date included
    pub start: NaiveDate,
    /// Last date included
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a new inclusive date range
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range covering a single day
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// Check if the range contains the given date
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether the range matches no date at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

impl FilterCriteria<PatientRecord> for DateRange {
    fn meets_criteria(&self, record: &PatientRecord) -> bool {
        self.contains(record.enrollment_date)
    }
}

/// Records selected by a filter, borrowed from the dataset
#[derive(Debug, Clone, Serialize)]
pub struct DatasetView<'a> {
    records: Vec<&'a PatientRecord>,
    #[serde(skip)]
    ltbi_available: bool,
}

impl<'a> DatasetView<'a> {
    /// Wrap already-selected records
    #[must_use]
    pub const fn new(records: Vec<&'a PatientRecord>, ltbi_available: bool) -> Self {
        Self {
            records,
            ltbi_available,
        }
    }

    /// Selected records in dataset order
    #[must_use]
    pub fn records(&self) -> &[&'a PatientRecord] {
        &self.records
    }

    /// Iterate over selected records
    pub fn iter(&self) -> impl Iterator<Item = &'a PatientRecord> + '_ {
        self.records.iter().copied()
    }

    /// Number of selected records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the LTBI columns were present in the source data
    #[must_use]
    pub const fn ltbi_available(&self) -> bool {
        self.ltbi_available
    }

    /// Earliest and latest enrollment date, `None` when empty
    #[must_use]
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self.iter().map(|r| r.enrollment_date).minmax() {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(date) => Some((date, date)),
            MinMaxResult::MinMax(min, max) => Some((min, max)),
        }
    }

    /// The latest period present at the given granularity
    #[must_use]
    pub fn latest_period(&self, granularity: Granularity) -> Option<PeriodKey> {
        self.iter().map(|r| r.period(granularity)).max()
    }

    /// Records of the latest calendar month present
    #[must_use]
    pub fn latest_month(&self) -> Vec<&'a PatientRecord> {
        self.latest_period(Granularity::Monthly)
            .map(|latest| {
                self.iter()
                    .filter(|r| r.period_month == latest)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
    }
}

/// Select the records of a dataset that fall in the given range
///
/// `None` selects every record. The selection preserves dataset order.
#[must_use]
pub fn apply_date_filter<'a>(
    dataset: &'a SurveillanceDataset,
    range: Option<&DateRange>,
) -> DatasetView<'a> {
    let records = match range {
        Some(range) => dataset
            .iter()
            .filter(|r| range.meets_criteria(r))
            .collect::<Vec<_>>(),
        None => dataset.iter().collect::<Vec<_>>(),
    };
    log::debug!(
        "Date filter selected {} of {} records",
        records.len(),
        dataset.len()
    );
    DatasetView::new(records, dataset.ltbi_available())
}
