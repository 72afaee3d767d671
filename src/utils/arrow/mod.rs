//! Arrow data handling utilities
//!
//! Raw surveillance columns are consumed as text whatever their physical
//! Arrow type, so classification works the same for CSV and Parquet input.

pub mod array_utils;

// Re-export commonly used items for convenience
pub use array_utils::{TextColumn, get_text_column};
