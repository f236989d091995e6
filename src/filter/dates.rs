//! Conversions between entered, stored, and displayed date text
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::error::FilterError;

/// Canonical form handed to the database and used for stored mail dates
const QUERY_FORMAT: &str = "%Y-%m-%dT%H:%M:00Z";
const STORED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse a date typed by a person into a calendar value.
///
/// The date part is either `M/D/YYYY` or `YYYY-MM-DD` and may be
/// followed by a single space and an `HH:MM` time. A date without a
/// time is midnight. Anything else, including dates that don't exist
/// on the calendar, is rejected with `FilterError::MalformedDate`.
pub fn parse_date_time(text: &str) -> Result<NaiveDateTime, FilterError> {
    let malformed = || FilterError::MalformedDate(text.to_string());

    let (date_part, time_part) = match text.split_once(' ') {
        Some((date, time)) => (date, Some(time)),
        None => (text, None),
    };
    let date = parse_date(date_part).ok_or_else(malformed)?;
    let time = match time_part {
        Some(time) => parse_time(time).ok_or_else(malformed)?,
        None => NaiveTime::MIN,
    };

    Ok(date.and_time(time))
}

/// Format a calendar value the way the database expects it,
/// e.g. `2001-05-14T16:39:00Z`.
pub fn to_query_text(date: &NaiveDateTime) -> String {
    date.format(QUERY_FORMAT).to_string()
}

/// Inverse of `to_query_text` for values read back from storage
pub fn parse_query_text(text: &str) -> chrono::ParseResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, STORED_FORMAT)
}

/// Display form of a timestamp, e.g. `2001-05-14 16:39`
pub fn format_date_time(date: &NaiveDateTime) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Reformat a stored `M/D/YYYY` date as `YYYY-MM-DD`.
///
/// Stored text that isn't in that form is passed through unchanged so
/// one bad row doesn't fail a whole response.
pub fn format_stored_date(text: &str) -> String {
    match parse_month_day_year(text) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => text.to_string(),
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    if text.contains('/') {
        parse_month_day_year(text)
    } else {
        let mut parts = text.split('-');
        let year = number(parts.next()?, 4, 4)?;
        let month = number(parts.next()?, 1, 2)?;
        let day = number(parts.next()?, 1, 2)?;
        if parts.next().is_some() {
            return None;
        }
        NaiveDate::from_ymd_opt(year as i32, month, day)
    }
}

fn parse_month_day_year(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split('/');
    let month = number(parts.next()?, 1, 2)?;
    let day = number(parts.next()?, 1, 2)?;
    let year = number(parts.next()?, 4, 4)?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    let (hour, minute) = text.split_once(':')?;
    NaiveTime::from_hms_opt(number(hour, 1, 2)?, number(minute, 2, 2)?, 0)
}

/// Parse an all-digit component with a bounded number of digits
fn number(text: &str, min_len: usize, max_len: usize) -> Option<u32> {
    let valid_len = (min_len..=max_len).contains(&text.len());
    if !valid_len || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
