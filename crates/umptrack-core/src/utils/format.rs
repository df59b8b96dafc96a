use chrono::NaiveDate;

use crate::models::DATE_FORMAT;

/// Format a whole-dollar fee for display
pub fn format_fee(fee: i64) -> String {
    if fee < 0 {
        format!("-${}", -fee)
    } else {
        format!("${}", fee)
    }
}

/// Format a mileage value to one decimal place
pub fn format_mileage(miles: f64) -> String {
    format!("{:.1}", miles)
}

/// `Y` for set flags, blank otherwise
pub fn format_flag(flag: bool) -> &'static str {
    if flag {
        "Y"
    } else {
        ""
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
