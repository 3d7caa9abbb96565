//! Row types shared between pipeline stages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar month column order of a raw climate matrix, Jan..Dec.
pub const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Map a month column name to its 1-based month number.
pub fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .map(|i| i as u32 + 1)
}

/// First-of-month date for a (year, month) pair.
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// One melted observation from a raw climate matrix: the value of a single
/// parameter in a single month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongObservation {
    /// First day of the observed month.
    pub date: NaiveDate,
    /// Parameter name as exported (e.g. `ALLSKY_SFC_SW_DWN`, `WS10M`).
    pub param: String,
    pub value: f64,
}

/// Advance a first-of-month date by one calendar month.
pub fn next_month(date: NaiveDate) -> NaiveDate {
    use chrono::Datelike;
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    // Day 1 always exists, so the unwrap path is unreachable.
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}
