//! Module for loading raw surveillance tables into Arrow record batches.
//!
//! CSV exports are read with every column as text, so free-text dates and
//! counters reach classification exactly as typed. Parquet files keep their
//! native types; normalization casts them to text where needed.

use std::fmt;
use std::fs::{self, File};
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SurveillanceError};
use crate::utils::{log_operation_complete, log_operation_start};

/// Rows per record batch when reading CSV
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// Rows inspected to discover the CSV header layout
const SCHEMA_INFERENCE_ROWS: usize = 100;

/// Text encoding of a CSV file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextEncoding {
    /// UTF-8 only; invalid bytes are an error
    Utf8,
    /// ISO-8859-1, every byte is one character
    Latin1,
    /// UTF-8 when valid, otherwise Latin-1
    #[default]
    Auto,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8 => write!(f, "utf-8"),
            Self::Latin1 => write!(f, "latin-1"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = SurveillanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Self::Latin1),
            "auto" => Ok(Self::Auto),
            other => Err(SurveillanceError::InvalidArgument(format!(
                "Unknown text encoding: {other}"
            ))),
        }
    }
}

/// Decode raw bytes to text in the given encoding
pub fn decode_text(bytes: Vec<u8>, encoding: TextEncoding) -> Result<String> {
    let latin1 = |bytes: &[u8]| bytes.iter().map(|&b| char::from(b)).collect::<String>();
    match encoding {
        TextEncoding::Latin1 => Ok(latin1(&bytes)),
        TextEncoding::Utf8 => String::from_utf8(bytes).map_err(|e| {
            SurveillanceError::InvalidArgument(format!("Input is not valid UTF-8: {e}"))
        }),
        TextEncoding::Auto => match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(e) => {
                log::debug!("Input is not valid UTF-8, decoding as Latin-1");
                Ok(latin1(e.as_bytes()))
            }
        },
    }
}

/// Read CSV text into record batches, every column as nullable UTF-8
///
/// Rows with fewer fields than the header are padded with nulls. Always
/// returns at least one batch, possibly empty.
pub fn read_csv_str(text: &str) -> Result<Vec<RecordBatch>> {
    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(Cursor::new(text.as_bytes()), Some(SCHEMA_INFERENCE_ROWS))?;

    let schema = Arc::new(Schema::new(
        inferred
            .fields()
            .iter()
            .map(|f| Field::new(f.name(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_header(true)
        .with_truncated_rows(true)
        .with_batch_size(DEFAULT_BATCH_SIZE)
        .build(Cursor::new(text.as_bytes()))?;

    let mut batches = reader.collect::<std::result::Result<Vec<_>, ArrowError>>()?;
    // A header-only file still carries its columns, so required columns get checked
    if batches.is_empty() {
        batches.push(RecordBatch::new_empty(schema));
    }
    Ok(batches)
}

/// Read a CSV file into record batches
pub fn read_csv(path: &Path, encoding: TextEncoding) -> Result<Vec<RecordBatch>> {
    let start = Instant::now();
    let subject = path.display().to_string();
    log_operation_start("Reading CSV file", &subject);

    let bytes = fs::read(path).map_err(|e| SurveillanceError::io(path, e))?;
    let text = decode_text(bytes, encoding)?;
    let batches = read_csv_str(&text)?;

    let rows = batches.iter().map(RecordBatch::num_rows).sum();
    log_operation_complete("read", &subject, rows, Some(start.elapsed()));
    Ok(batches)
}

/// Read a Parquet file into record batches
pub fn read_parquet(path: &Path) -> Result<Vec<RecordBatch>> {
    let start = Instant::now();
    let subject = path.display().to_string();
    log_operation_start("Reading parquet file", &subject);

    let file = File::open(path).map_err(|e| SurveillanceError::io(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = Arc::clone(builder.schema());
    let reader = builder.build()?;
    let mut batches = reader.collect::<std::result::Result<Vec<_>, ArrowError>>()?;
    // Zero row groups still carry a schema worth validating
    if batches.is_empty() {
        batches.push(RecordBatch::new_empty(schema));
    }

    let rows = batches.iter().map(RecordBatch::num_rows).sum();
    log_operation_complete("read", &subject, rows, Some(start.elapsed()));
    Ok(batches)
}

/// Read a CSV or Parquet file, chosen by extension
///
/// The encoding only applies to CSV input.
pub fn read_table(path: &Path, encoding: TextEncoding) -> Result<Vec<RecordBatch>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" | "txt" => read_csv(path, encoding),
        "parquet" | "pq" => read_parquet(path),
        _ => Err(SurveillanceError::InvalidArgument(format!(
            "Unsupported input format for {}; expected .csv or .parquet",
            path.display()
        ))),
    }
}
