use crate::model::event::AttendanceEvent;
use crate::model::store::AttendanceStore;
use crate::repository::StoreRepository;
use crate::service::dto::{TodayProgress, TodayWindow, WeekSummary, WeekTotal, WeekView};
use crate::time::TimeOfDay;
use crate::usecase::{elapsed, history, views};
use anyhow::Result;
use chrono::{Local, NaiveDate};

/// Loads the store, applies one mutation, writes it back. Queries are
/// evaluated against the local calendar day.
pub struct AttendanceService<R: StoreRepository> {
    repo: R,
}

impl<R: StoreRepository> AttendanceService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn submit(&self, event: AttendanceEvent) -> Result<()> {
        let mut store = self.repo.load()?;
        store.submit(event);
        self.repo.save(&store)
    }

    /// Records an in-time. `fallback_remark` is only used when neither the
    /// caller nor the stored day supplies a remark.
    pub fn punch_in(
        &self,
        date: NaiveDate,
        time: TimeOfDay,
        remark: Option<String>,
        fallback_remark: Option<&str>,
    ) -> Result<()> {
        let mut store = self.repo.load()?;
        let has_remark = store
            .day(date)
            .and_then(|record| record.entries.remark())
            .is_some();

        let mut event = AttendanceEvent::on(date).with_in(time);
        event.remark = match (remark, fallback_remark) {
            (Some(remark), _) => Some(remark),
            (None, Some(fallback)) if !has_remark => Some(fallback.to_string()),
            _ => None,
        };

        store.submit(event);
        self.repo.save(&store)
    }

    pub fn punch_out(&self, date: NaiveDate, time: TimeOfDay, remark: Option<String>) -> Result<()> {
        let mut event = AttendanceEvent::on(date).with_out(time);
        event.remark = remark;
        self.submit(event)
    }

    /// Nothing is written when the store rejects the deletion.
    pub fn delete_day(&self, date: NaiveDate) -> Result<()> {
        let mut store = self.repo.load()?;
        store.delete_day(date)?;
        self.repo.save(&store)
    }

    pub fn store(&self) -> Result<AttendanceStore> {
        self.repo.load()
    }

    pub fn current_week_records(&self) -> Result<WeekView> {
        Ok(views::current_week_records(&self.repo.load()?, today()))
    }

    pub fn current_week_total(&self) -> Result<WeekTotal> {
        Ok(views::current_week_total(&self.repo.load()?, today()))
    }

    pub fn has_open_start_time(&self) -> Result<bool> {
        Ok(views::has_open_start_time(&self.repo.load()?, today()))
    }

    pub fn today_window(&self) -> Result<TodayWindow> {
        Ok(views::today_window(&self.repo.load()?, today()))
    }

    pub fn today_progress(&self, target_minutes: i64) -> Result<TodayProgress> {
        let window = self.today_window()?;
        Ok(elapsed::today_progress(window, TimeOfDay::now(), target_minutes))
    }

    pub fn week_records_for(&self, date: NaiveDate) -> Result<WeekView> {
        Ok(views::current_week_records(&self.repo.load()?, date))
    }

    pub fn week_total_for(&self, date: NaiveDate) -> Result<WeekTotal> {
        Ok(views::current_week_total(&self.repo.load()?, date))
    }

    pub fn weekly_history(&self) -> Result<Vec<WeekSummary>> {
        Ok(history::weekly_history(&self.repo.load()?))
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
