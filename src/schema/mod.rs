//! Raw table schema handling: the column contract and free-text date parsing.

pub mod columns;
pub mod date;

// Re-export the main schema types for easier access
pub use columns::{ColumnNames, ColumnPresence, RiskFactor};
pub use date::{DateFormatConfig, parse_date_string};
