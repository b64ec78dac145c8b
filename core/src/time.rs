use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AttendanceError;

/// A wall-clock time with minute precision, always written as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(TimeOfDay)
    }

    /// Current local time, truncated to the minute.
    pub fn now() -> Self {
        let now = Local::now().time();
        // hour/minute of a valid NaiveTime are always in range
        TimeOfDay(NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or_default())
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn minutes_since_midnight(&self) -> i64 {
        i64::from(self.0.hour() * 60 + self.0.minute())
    }

    /// Adds minutes on the clock face, wrapping past midnight.
    pub fn wrapping_add_minutes(&self, minutes: i64) -> Self {
        let (time, _) = self.0.overflowing_add_signed(Duration::minutes(minutes));
        TimeOfDay(time)
    }
}

impl FromStr for TimeOfDay {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AttendanceError::InvalidTime(s.to_string());

        let (hours, minutes) = s.split_once(':').ok_or_else(invalid)?;
        if hours.len() != 2 || minutes.len() != 2 {
            return Err(invalid());
        }
        if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let hour: u32 = hours.parse().map_err(|_| invalid())?;
        let minute: u32 = minutes.parse().map_err(|_| invalid())?;
        TimeOfDay::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Minutes from `start` to `end` on the same day. An `end` earlier than
/// `start` yields a negative value; overnight shifts are not special-cased.
pub fn diff_minutes(start: TimeOfDay, end: TimeOfDay) -> i64 {
    end.minutes_since_midnight() - start.minutes_since_midnight()
}

/// Splits a minute count into zero-padded hour and minute strings.
pub fn split_hours_minutes(total_minutes: i64) -> (String, String) {
    (
        format!("{:02}", total_minutes.div_euclid(60)),
        format!("{:02}", total_minutes.rem_euclid(60)),
    )
}

/// Resolves a date typed by the user relative to `today`.
///
/// Accepts `today`/`tod`, `yesterday`/`yes`, a weekday name (the most recent
/// such day, today included) and plain `YYYY-MM-DD`.
pub fn parse_human_date(input: &str, today: NaiveDate) -> Result<NaiveDate, AttendanceError> {
    let lowered = input.trim().to_lowercase();

    match lowered.as_str() {
        "today" | "tod" => return Ok(today),
        "yesterday" | "yes" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    if let Ok(target) = parse_weekday_str(&lowered) {
        let days_back = (today.weekday().num_days_from_monday() + 7
            - target.num_days_from_monday())
            % 7;
        return Ok(today - Duration::days(i64::from(days_back)));
    }

    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| AttendanceError::InvalidDate(input.to_string()))
}

fn parse_weekday_str(s: &str) -> Result<Weekday, AttendanceError> {
    match s {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(AttendanceError::InvalidDate(s.to_string())),
    }
}
