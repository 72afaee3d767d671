//! Aggregation and rate computation over surveillance records
//!
//! Every function here is pure: it reads a [`filter::DatasetView`] and
//! returns plain values. Nothing is cached between calls.

pub mod distribution;
pub mod filter;
pub mod indicators;
pub mod period;
pub mod series;
pub mod targets;

pub use distribution::{CaseTypeCategory, Distribution, OutcomeCategory, RiskCategory};
pub use filter::{DatasetView, DateRange, FilterCriteria, apply_date_filter};
pub use indicators::{BigNumbers, LatestNotifications, LtbiTotals, PediatricSummary};
pub use period::{Granularity, PeriodKey};
pub use series::{PeriodAggregate, SeriesMetric, SeriesRow};
pub use targets::{Target, TargetDirection, TargetEvaluation, TargetStatus};
