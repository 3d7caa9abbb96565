//! Date-column detection for tables of uncertain provenance.
//!
//! The dashboard consumes CSVs that were produced by several generations of
//! tooling; the time axis may be a proper DATE column, a TIME-ish column, a
//! bare YEAR, or simply the first column. Detection is an explicit, ordered
//! chain of named strategies so each one stays independently testable.

use chrono::NaiveDate;
use polars::prelude::*;

/// One way of locating (or synthesizing) the time axis of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStrategy {
    /// A column whose upper-cased name contains `DATE`.
    NamedDate,
    /// A column whose upper-cased name contains `TIME`.
    NamedTime,
    /// A `YEAR` column; dates become the first of January of that year.
    YearOnly,
    /// Fall back to the table's first column.
    FirstColumn,
}

/// Detection order. First strategy that matches wins.
pub const STRATEGY_CHAIN: [DateStrategy; 4] = [
    DateStrategy::NamedDate,
    DateStrategy::NamedTime,
    DateStrategy::YearOnly,
    DateStrategy::FirstColumn,
];

impl DateStrategy {
    /// The column this strategy selects from the frame, if any.
    pub fn locate<'a>(&self, df: &'a DataFrame) -> Option<&'a str> {
        let names = df.get_column_names();
        match self {
            DateStrategy::NamedDate => names
                .iter()
                .find(|name| name.to_ascii_uppercase().contains("DATE"))
                .copied(),
            DateStrategy::NamedTime => names
                .iter()
                .find(|name| name.to_ascii_uppercase().contains("TIME"))
                .copied(),
            DateStrategy::YearOnly => names
                .iter()
                .find(|name| name.eq_ignore_ascii_case("YEAR"))
                .copied(),
            DateStrategy::FirstColumn => names.first().copied(),
        }
    }
}

/// Walk the strategy chain and return the winning strategy and column name.
///
/// Only an entirely column-less frame yields `None`.
pub fn detect_date_column(df: &DataFrame) -> Option<(DateStrategy, String)> {
    STRATEGY_CHAIN.iter().find_map(|strategy| {
        strategy
            .locate(df)
            .map(|name| (*strategy, name.to_string()))
    })
}

/// Parse one cell of the detected column into a date under the strategy's
/// semantics. Unparseable cells yield `None` and are excluded by callers.
pub fn parse_date_cell(strategy: DateStrategy, value: &AnyValue) -> Option<NaiveDate> {
    match strategy {
        DateStrategy::YearOnly => match value {
            AnyValue::Int64(year) => NaiveDate::from_ymd_opt(*year as i32, 1, 1),
            AnyValue::Int32(year) => NaiveDate::from_ymd_opt(*year, 1, 1),
            AnyValue::Utf8(s) => s
                .trim()
                .parse::<i32>()
                .ok()
                .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1)),
            _ => None,
        },
        _ => match value {
            AnyValue::Utf8(s) => parse_date_str(s),
            AnyValue::Int64(year) => NaiveDate::from_ymd_opt(*year as i32, 1, 1),
            _ => None,
        },
    }
}

fn parse_date_str(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y/%m/%d"))
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .ok()
        .or_else(|| {
            // Bare "YYYY-MM" exports.
            let mut parts = trimmed.splitn(2, '-');
            let year = parts.next()?.parse::<i32>().ok()?;
            let month = parts.next()?.parse::<u32>().ok()?;
            NaiveDate::from_ymd_opt(year, month, 1)
        })
}
