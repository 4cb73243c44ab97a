//! ISO-8601 date parsing for user-supplied due dates.
//!
//! Accepts the calendar shapes people actually type: a bare year, a year
//! and month, a full date (extended or basic), or an ordinal date, each
//! optionally followed by a time of day and a UTC offset. Anything missing
//! is filled from the start of the period, so `"2018"` becomes
//! `2018-01-01T00:00:00+00:00`.

use chrono::format::{self, Parsed, StrftimeItems};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};

use crate::error::TypeError;

/// Date shapes tried in order: extended, basic, ordinal.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%Y-%j"];

/// Clock shapes paired with the zero-padded prefix a valid input must start
/// with, each tried with and without a trailing offset.
const TIME_FORMATS: &[(&str, &str)] = &[
    ("%H:%M:%S%.f", "%H:%M:%S"),
    ("%H:%M", "%H:%M"),
    ("%H", "%H"),
];

/// Current server time in UTC.
pub fn utc_now() -> DateTime<Utc> {
    Utc::now()
}

/// Parse an ISO-8601 date or date-time.
///
/// Every failure maps to [`TypeError::InvalidDate`] carrying the raw input;
/// callers never learn which part of the string was wrong.
pub fn parse_iso8601(input: &str) -> Result<DateTime<FixedOffset>, TypeError> {
    parse(input.trim()).ok_or_else(|| TypeError::InvalidDate(input.to_string()))
}

fn parse(s: &str) -> Option<DateTime<FixedOffset>> {
    let (date_part, time_part) = match s.find(|c: char| c == 'T' || c == 't' || c == ' ') {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };

    let date = parse_date(date_part)?;
    let (time, offset) = match time_part {
        Some(rest) => parse_clock(rest)?,
        None => (NaiveTime::MIN, Utc.fix()),
    };

    offset
        .from_local_datetime(&NaiveDateTime::new(date, time))
        .single()
}

/// chrono needs a day to build a date, so `YYYY` and `YYYY-MM` are padded
/// to the first day of the period first.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let padded = match s.len() {
        4 => format!("{s}-01-01"),
        7 => format!("{s}-01"),
        _ => s.to_string(),
    };
    DATE_FORMATS.iter().find_map(|fmt| {
        let date = NaiveDate::parse_from_str(&padded, fmt).ok()?;
        // chrono accepts unpadded fields; only the canonical spelling passes.
        (date.year() >= 1 && date.format(fmt).to_string() == padded).then_some(date)
    })
}

fn parse_clock(s: &str) -> Option<(NaiveTime, FixedOffset)> {
    TIME_FORMATS.iter().find_map(|&(fmt, canonical)| {
        let mut parsed = parse_items(s, &format!("{fmt}%#z"))
            .or_else(|| parse_items(s, fmt))?;
        if parsed.minute().is_none() {
            parsed.set_minute(0).ok()?;
        }
        let time = parsed.to_naive_time().ok()?;
        if !s.starts_with(&time.format(canonical).to_string()) {
            return None;
        }
        let offset = match parsed.offset() {
            Some(seconds) => FixedOffset::east_opt(seconds)?,
            None => Utc.fix(),
        };
        Some((time, offset))
    })
}

fn parse_items(s: &str, fmt: &str) -> Option<Parsed> {
    let mut parsed = Parsed::new();
    format::parse(&mut parsed, s, StrftimeItems::new(fmt)).ok()?;
    Some(parsed)
}
