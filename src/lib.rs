//! A Rust library for deriving tuberculosis surveillance indicators from raw
//! per-patient records: treatment success, LTBI preventive-therapy coverage,
//! population-normalized incidence, high-risk case mix and pediatric cases,
//! over arbitrary date windows and monthly or quarterly periods.

pub mod algorithm;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod reader;
pub mod schema;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::EngineConfig;
pub use engine::{Scorecard, SurveillanceEngine};
pub use error::{Result, SurveillanceError};
pub use models::{
    IngestReport, OutcomeDefinition, PatientRecord, RiskIndicators, SurveillanceDataset,
};
pub use schema::{ColumnNames, DateFormatConfig, RiskFactor};

// Query types
pub use algorithm::{
    BigNumbers, CaseTypeCategory, DatasetView, DateRange, Distribution, Granularity,
    LatestNotifications, LtbiTotals, OutcomeCategory, PediatricSummary, PeriodAggregate,
    PeriodKey, RiskCategory, SeriesMetric, SeriesRow, Target, TargetDirection, TargetStatus,
};

// Arrow types
pub use arrow::record_batch::RecordBatch;

// Input loading
pub use reader::{TextEncoding, read_csv, read_parquet, read_table};
