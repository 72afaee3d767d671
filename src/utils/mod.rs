//! Shared utilities
//!
//! Arrow column access and logging/progress helpers used by ingestion, the
//! file reader and the command-line binary.

pub mod arrow;
pub mod logging;

pub use self::arrow::{TextColumn, get_text_column};
pub use self::logging::{
    create_spinner, finish_progress_bar, log_operation_complete, log_operation_start, log_warning,
};
