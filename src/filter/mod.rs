//! Normalizes raw request parameters into a `QueryFilter`
pub mod dates;
mod error;

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

pub use error::FilterError;

use dates::{parse_date_time, to_query_text};

/// Maximum number of records fetched for the graph
pub const GRAPH_RESULT_LIMIT: usize = 1000;

/// Receiver limit used when the caller leaves `limit` empty
pub const DEFAULT_MAX_RECEIVERS: usize = 1000;

/// Keys every filter request must carry, even if the value is empty
pub const REQUIRED_PARAMS: [&str; 6] = ["start_date", "end_date", "subject", "from", "to", "limit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            start: midnight(2000, 1, 1),
            end: midnight(2020, 1, 1),
        }
    }
}

impl DateRange {
    pub fn start_text(&self) -> String {
        to_query_text(&self.start)
    }

    pub fn end_text(&self) -> String {
        to_query_text(&self.end)
    }
}

// Only called with constant, valid dates
fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
}

/// Parse the start and end of a date range, substituting the
/// defaults for empty values.
pub fn parse_date_range(start_text: &str, end_text: &str) -> Result<DateRange, FilterError> {
    let defaults = DateRange::default();
    let start = if start_text.is_empty() {
        defaults.start
    } else {
        parse_date_time(start_text)?
    };
    let end = if end_text.is_empty() {
        defaults.end
    } else {
        parse_date_time(end_text)?
    };

    Ok(DateRange { start, end })
}

/// Case-insensitive "contains" matcher built from free text.
///
/// The text is NOT escaped. Pattern syntax in the text is interpreted
/// by the matcher so `a.c` also matches `abc`. Text that doesn't
/// compile as a pattern is rejected up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    text: String,
}

impl Matcher {
    pub fn contains(text: &str) -> Result<Self, FilterError> {
        let matcher = Self {
            text: text.to_string(),
        };
        Regex::new(&matcher.pattern()).map_err(|err| FilterError::InvalidPattern {
            pattern: text.to_string(),
            reason: err.to_string(),
        })?;

        Ok(matcher)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The pattern as the caller sees it, e.g. `(?i).*enron.*`
    pub fn pattern(&self) -> String {
        format!("(?i).*{}.*", self.text)
    }

    /// Pattern that must match the whole value rather than any part
    /// of it
    pub fn anchored(&self) -> String {
        format!("^(?:{})$", self.pattern())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    pub subject: Matcher,
    pub from: Matcher,
    pub to: Matcher,
    pub date_range: DateRange,
    pub max_receivers: usize,
    pub result_limit: usize,
}

/// Build a `QueryFilter` from raw request parameters.
///
/// Every key in `REQUIRED_PARAMS` must be present before any value is
/// looked at. Empty values are valid and fall back to defaults.
pub fn build_filter(raw: &HashMap<String, String>) -> Result<QueryFilter, FilterError> {
    let param = |name: &'static str| {
        raw.get(name)
            .map(String::as_str)
            .ok_or(FilterError::MissingParameter(name))
    };
    for name in REQUIRED_PARAMS {
        param(name)?;
    }

    let date_range = parse_date_range(param("start_date")?, param("end_date")?)?;
    let max_receivers = parse_max_receivers(param("limit")?)?;

    Ok(QueryFilter {
        subject: Matcher::contains(param("subject")?)?,
        from: Matcher::contains(param("from")?)?,
        to: Matcher::contains(param("to")?)?,
        date_range,
        max_receivers,
        result_limit: GRAPH_RESULT_LIMIT,
    })
}

fn parse_max_receivers(text: &str) -> Result<usize, FilterError> {
    if text.is_empty() {
        return Ok(DEFAULT_MAX_RECEIVERS);
    }
    text.parse()
        .map_err(|_| FilterError::MalformedLimit(text.to_string()))
}
