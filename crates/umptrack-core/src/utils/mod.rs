//! Utility functions for formatting report values.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{format_date, format_fee, format_flag, format_mileage, truncate_string};
