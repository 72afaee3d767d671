//! Utilities for working with Arrow arrays.
//!
//! This module extracts columns from record batches as UTF-8 text, casting
//! other physical types (dates, integers, floats) to their string form.

use arrow::array::{Array, StringArray};
use arrow::compute::kernels::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use log::debug;

use crate::error::{Result, SurveillanceError};

/// A column viewed as nullable text
#[derive(Debug, Clone)]
pub struct TextColumn {
    values: StringArray,
}

impl TextColumn {
    /// Get the text at `row`, or `None` for a null or out-of-range cell
    #[must_use]
    pub fn value(&self, row: usize) -> Option<&str> {
        if row < self.values.len() && !self.values.is_null(row) {
            Some(self.values.value(row))
        } else {
            None
        }
    }
}

/// Get a column from a record batch as text
///
/// # Arguments
///
/// * `batch` - The record batch containing the column
/// * `column_name` - Exact name of the column
/// * `required` - Whether a missing column is an error (true) or `None` (false)
///
/// # Returns
///
/// * `Ok(Some(TextColumn))` - The column, cast to UTF-8 if necessary
/// * `Ok(None)` - If the column is not found and `required` is false
/// * `Err` - If a required column is missing or the cast fails
pub fn get_text_column(
    batch: &RecordBatch,
    column_name: &str,
    required: bool,
) -> Result<Option<TextColumn>> {
    let Ok(idx) = batch.schema().index_of(column_name) else {
        if required {
            return Err(SurveillanceError::missing_column(column_name));
        }
        return Ok(None);
    };

    let column = batch.column(idx);
    let converted = if column.data_type() == &DataType::Utf8 {
        column.clone()
    } else {
        debug!(
            "Casting column '{column_name}' from {:?} to Utf8",
            column.data_type()
        );
        cast::cast(column, &DataType::Utf8)?
    };

    let values = converted
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| {
            SurveillanceError::InvalidArgument(format!(
                "Column '{column_name}' could not be read as text"
            ))
        })?;

    Ok(Some(TextColumn { values }))
}
