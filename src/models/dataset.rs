//! Ingestion and normalization of raw surveillance tables
//!
//! Raw record batches are turned into an immutable, ordered collection of
//! [`PatientRecord`]s. Rows whose enrollment date cannot be parsed are
//! dropped; every other data-quality problem degrades to a neutral value.

use std::collections::BTreeSet;
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::record::{PatientRecord, RawPatientRow};
use crate::schema::{ColumnPresence, RiskFactor};
use crate::utils::{
    TextColumn, get_text_column, log_operation_complete, log_operation_start, log_warning,
};

/// Summary of one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Rows in the raw input
    pub rows_read: usize,
    /// Rows that became records
    pub rows_kept: usize,
    /// Rows dropped because the enrollment date did not parse
    pub rows_dropped: usize,
    /// Optional columns absent from at least one input batch
    pub missing_optional_columns: Vec<String>,
}

/// The normalized dataset owned by the engine
#[derive(Debug, Clone, Default)]
pub struct SurveillanceDataset {
    records: Vec<PatientRecord>,
    ltbi_available: bool,
    report: IngestReport,
}

/// Per-batch normalization result
struct NormalizedBatch {
    records: Vec<PatientRecord>,
    presence: ColumnPresence,
    rows_read: usize,
}

impl SurveillanceDataset {
    /// Normalize raw record batches
    ///
    /// Batches are processed in parallel and concatenated in input order.
    /// Fails only when a batch lacks a required column or a column cannot be
    /// converted to text.
    pub fn normalize(batches: &[RecordBatch], config: &EngineConfig) -> Result<Self> {
        let start = Instant::now();
        let subject = format!("{} record batches", batches.len());
        log_operation_start("Normalizing", &subject);

        let normalized = batches
            .par_iter()
            .map(|batch| normalize_batch(batch, config))
            .collect::<Result<Vec<_>>>()?;

        let rows_read = normalized.iter().map(|n| n.rows_read).sum::<usize>();
        let ltbi_available = normalized.iter().any(|n| n.presence.ltbi);
        let missing_optional_columns = normalized
            .iter()
            .flat_map(|n| n.presence.missing_optional.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();

        let records = normalized
            .into_iter()
            .flat_map(|n| n.records)
            .collect::<Vec<_>>();

        let report = IngestReport {
            rows_read,
            rows_kept: records.len(),
            rows_dropped: rows_read - records.len(),
            missing_optional_columns,
        };

        for column in &report.missing_optional_columns {
            log_warning("Optional column absent, using defaults", Some(column.as_str()));
        }
        if report.rows_dropped > 0 {
            let dropped = report.rows_dropped.to_string();
            log_warning(
                "Rows dropped because the enrollment date could not be parsed",
                Some(dropped.as_str()),
            );
        }
        log_operation_complete("normalized", &subject, report.rows_kept, Some(start.elapsed()));

        Ok(Self {
            records,
            ltbi_available,
            report,
        })
    }

    /// Build a dataset from records that are already normalized
    #[must_use]
    pub fn from_records(records: Vec<PatientRecord>, ltbi_available: bool) -> Self {
        let report = IngestReport {
            rows_read: records.len(),
            rows_kept: records.len(),
            ..Default::default()
        };
        Self {
            records,
            ltbi_available,
            report,
        }
    }

    /// All records, in input order
    #[must_use]
    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    /// Whether all three LTBI contact-tracing columns were supplied
    #[must_use]
    pub const fn ltbi_available(&self) -> bool {
        self.ltbi_available
    }

    /// Ingestion summary
    #[must_use]
    pub const fn report(&self) -> &IngestReport {
        &self.report
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records
    pub fn iter(&self) -> impl Iterator<Item = &PatientRecord> {
        self.records.iter()
    }
}

/// Optional text column lookup; absent columns read as null cells
fn optional_column(batch: &RecordBatch, name: &str, present: bool) -> Result<Option<TextColumn>> {
    if present {
        get_text_column(batch, name, false)
    } else {
        Ok(None)
    }
}

fn cell(column: Option<&TextColumn>, row: usize) -> Option<&str> {
    column.and_then(|c| c.value(row))
}

fn normalize_batch(batch: &RecordBatch, config: &EngineConfig) -> Result<NormalizedBatch> {
    let columns = &config.columns;
    let presence = ColumnPresence::detect(&batch.schema(), columns)?;

    let enrollment_date = get_text_column(batch, &columns.enrollment_date, true)?;
    let treatment_outcome = get_text_column(batch, &columns.treatment_outcome, true)?;
    let treatment_history =
        optional_column(batch, &columns.treatment_history, presence.treatment_history)?;
    let age = optional_column(batch, &columns.age, presence.age)?;

    let mut risk: [Option<TextColumn>; RiskFactor::COUNT] = Default::default();
    for factor in RiskFactor::ALL {
        risk[factor.index()] = optional_column(
            batch,
            columns.risk_column(factor),
            presence.risk[factor.index()],
        )?;
    }

    // LTBI counters are only meaningful when all three columns exist
    let [contacts, positive, tpt] = columns.ltbi();
    let ltbi_contacts = optional_column(batch, contacts, presence.ltbi)?;
    let ltbi_positive = optional_column(batch, positive, presence.ltbi)?;
    let ltbi_tpt = optional_column(batch, tpt, presence.ltbi)?;

    let rows_read = batch.num_rows();
    let mut records = Vec::with_capacity(rows_read);
    for row in 0..rows_read {
        let mut risk_cells = [None; RiskFactor::COUNT];
        for (slot, column) in risk_cells.iter_mut().zip(risk.iter()) {
            *slot = cell(column.as_ref(), row);
        }

        let raw = RawPatientRow {
            enrollment_date: cell(enrollment_date.as_ref(), row),
            treatment_outcome: cell(treatment_outcome.as_ref(), row),
            treatment_history: cell(treatment_history.as_ref(), row),
            age: cell(age.as_ref(), row),
            risk: risk_cells,
            ltbi_contacts_under5: cell(ltbi_contacts.as_ref(), row),
            ltbi_positive_under5: cell(ltbi_positive.as_ref(), row),
            ltbi_tpt_completed: cell(ltbi_tpt.as_ref(), row),
        };

        if let Some(record) = PatientRecord::from_raw(&raw, &config.date_formats) {
            records.push(record);
        }
    }

    Ok(NormalizedBatch {
        records,
        presence,
        rows_read,
    })
}
