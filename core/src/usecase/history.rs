use crate::model::store::{AttendanceStore, WeekRecords};
use crate::repository::StoreRepository;
use crate::service::dto::{DayRow, WeekStats, WeekSummary};
use anyhow::Result;

pub struct HistoryUseCase<'a, R: StoreRepository> {
    repo: &'a R,
}

impl<'a, R: StoreRepository> HistoryUseCase<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    pub fn get_weekly_history(&self) -> Result<Vec<WeekSummary>> {
        let store = self.repo.load()?;
        Ok(weekly_history(&store))
    }
}

/// Every stored week, newest first.
pub fn weekly_history(store: &AttendanceStore) -> Vec<WeekSummary> {
    let mut history: Vec<WeekSummary> = store
        .weeks()
        .map(|(week_id, days)| summarize_week(week_id, days))
        .collect();
    // "YYYY-Www" sorts chronologically as a string
    history.sort_by(|a, b| b.week_id.cmp(&a.week_id));
    history
}

pub fn summarize_week(week_id: &str, days: &WeekRecords) -> WeekSummary {
    let rows: Vec<DayRow> = days
        .iter()
        .filter_map(|(ordinal, record)| DayRow::from_record(*ordinal, record))
        .collect();

    let mut stats = WeekStats::default();
    let mut best: Option<(u8, i64)> = None;

    for row in rows.iter().filter(|r| r.is_complete) {
        let minutes = row.total_minutes.unwrap_or(0);
        stats.total_minutes += minutes;
        stats.complete_days += 1;
        // ties keep the earlier day
        if best.map_or(true, |(_, top)| minutes > top) {
            best = Some((row.day_ordinal, minutes));
        }
    }

    if stats.complete_days > 0 {
        stats.average_minutes_per_day = stats.total_minutes / stats.complete_days as i64;
    }
    stats.most_productive_day = best.map(|(ordinal, _)| ordinal);

    WeekSummary {
        week_id: week_id.to_string(),
        days: rows,
        stats,
    }
}
