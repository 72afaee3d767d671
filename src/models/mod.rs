//! Domain models for surveillance records
//!
//! This module contains the normalized patient record, the classification
//! rules that derive it from free text, and the dataset that owns the
//! records for the lifetime of an engine.

pub mod classify;
pub mod dataset;
pub mod record;

// Re-export commonly used types
pub use classify::{OutcomeDefinition, TreatmentHistory, TreatmentOutcome};
pub use dataset::{IngestReport, SurveillanceDataset};
pub use record::{LtbiContacts, PatientRecord, RawPatientRow, RiskIndicators};
