//! Time utilities: due-date parsing and timezone-aware "now".

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Format accepted for due dates.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a due date like "2025-12-01".
///
/// Returns `None` for anything that is not a real calendar date in that form.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DUE_DATE_FORMAT).ok()
}

/// Parse an IANA timezone name like "America/Chicago".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Current wall-clock time in `tz`, with the offset dropped.
///
/// Urgency only looks at the calendar date, so the local date is what matters.
pub fn local_now(tz: &str) -> Result<NaiveDateTime> {
    let tz = parse_timezone(tz)?;
    Ok(Utc::now().with_timezone(&tz).naive_local())
}

/// Start of `date` as a reference instant.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}
