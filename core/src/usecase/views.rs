//! Read-only projections of the store for the week and day containing
//! `today`. Nothing here caches; every call reads the store afresh.

use chrono::NaiveDate;

use crate::calendar::classify;
use crate::model::store::AttendanceStore;
use crate::service::dto::{TodayWindow, WeekTotal, WeekView};
use crate::time::split_hours_minutes;

pub fn current_week_records(store: &AttendanceStore, today: NaiveDate) -> WeekView {
    let week_id = classify(today).week_id;
    let days = store.week(&week_id).cloned().unwrap_or_default();
    WeekView { week_id, days }
}

pub fn current_week_total_minutes(store: &AttendanceStore, today: NaiveDate) -> i64 {
    store.week_total(&classify(today).week_id)
}

pub fn current_week_total(store: &AttendanceStore, today: NaiveDate) -> WeekTotal {
    let (hours, minutes) = split_hours_minutes(current_week_total_minutes(store, today));
    WeekTotal { hours, minutes }
}

pub fn has_open_start_time(store: &AttendanceStore, today: NaiveDate) -> bool {
    today_window(store, today).start.is_some()
}

pub fn today_window(store: &AttendanceStore, today: NaiveDate) -> TodayWindow {
    match store.day(today) {
        Some(record) => TodayWindow {
            start: record.entries.in_time(),
            end: record.entries.out_time(),
        },
        None => TodayWindow::default(),
    }
}
