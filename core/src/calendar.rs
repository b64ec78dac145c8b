//! Calendar facts for a single local date: ISO week bucket, weekday ordinal
//! and a few auxiliary fields. Everything here is pure.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarFacts {
    /// `"{ISO-year}-W{week:02}"`, e.g. `2025-W01`.
    pub week_id: String,
    /// Monday = 1 ... Sunday = 7.
    pub day_ordinal: u8,
    pub canonical_date: NaiveDate,
    pub is_weekend: bool,
    pub month: u32,
    pub quarter: u32,
    /// Calendar year of the date (not the ISO week-year).
    pub year: i32,
}

pub fn classify(date: NaiveDate) -> CalendarFacts {
    let month = date.month();
    CalendarFacts {
        week_id: week_id(date),
        day_ordinal: day_ordinal(date),
        canonical_date: date,
        is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
        month,
        quarter: (month - 1) / 3 + 1,
        year: date.year(),
    }
}

pub fn day_ordinal(date: NaiveDate) -> u8 {
    // number_from_monday already maps Sunday to 7
    date.weekday().number_from_monday() as u8
}

/// ISO-8601 week identifier. The week belongs to the year holding its
/// Thursday, and that Thursday's day-of-year fixes the week number.
pub fn week_id(date: NaiveDate) -> String {
    let offset = 4 - i64::from(day_ordinal(date));
    match date.checked_add_signed(Duration::days(offset)) {
        Some(thursday) => format!("{}-W{:02}", thursday.year(), (thursday.ordinal() + 6) / 7),
        None => {
            // only reachable at the edges of the representable range
            let iso = date.iso_week();
            format!("{}-W{:02}", iso.year(), iso.week())
        }
    }
}
