use serde::{Serialize, Deserialize};
use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::model::record::AttendanceRecord;
use crate::time::TimeOfDay;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekView {
    pub week_id: String,
    pub days: BTreeMap<u8, AttendanceRecord>,
}

impl WeekView {
    /// Dated days in ordinal order; cleared slots are skipped.
    pub fn rows(&self) -> Vec<DayRow> {
        self.days
            .iter()
            .filter_map(|(ordinal, record)| DayRow::from_record(*ordinal, record))
            .collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WeekTotal {
    pub hours: String,   // zero-padded
    pub minutes: String, // zero-padded, 00-59
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TodayWindow {
    pub start: Option<TimeOfDay>,
    pub end: Option<TimeOfDay>,
}

/// What the "today" panel shows: time worked so far and when to stop.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodayProgress {
    pub window: TodayWindow,
    pub elapsed_minutes: i64,
    pub should_stop_at: Option<TimeOfDay>,
    pub coverage_percent: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayRow {
    pub day_ordinal: u8,
    pub date: NaiveDate,
    pub day_of_week: String, // Mon, Tue...
    pub in_time: Option<TimeOfDay>,
    pub out_time: Option<TimeOfDay>,
    pub remark: Option<String>,
    pub total_minutes: Option<i64>,
    pub is_complete: bool,
}

impl DayRow {
    pub fn from_record(day_ordinal: u8, record: &AttendanceRecord) -> Option<Self> {
        let date = record.date?;
        let entries = &record.entries;
        Some(Self {
            day_ordinal,
            date,
            day_of_week: date.format("%a").to_string(),
            in_time: entries.in_time(),
            out_time: entries.out_time(),
            remark: entries.remark().map(str::to_string),
            total_minutes: entries.total_minutes(),
            is_complete: entries.is_complete(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WeekStats {
    pub total_minutes: i64,
    pub complete_days: usize,
    pub average_minutes_per_day: i64,
    pub most_productive_day: Option<u8>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub week_id: String,
    pub days: Vec<DayRow>,
    pub stats: WeekStats,
}
