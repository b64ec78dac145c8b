#[cfg(test)]
mod tests {
    use crate::usecase::history::{summarize_week, HistoryUseCase};
    use crate::repository::StoreRepository;
    use crate::model::event::AttendanceEvent;
    use crate::model::store::AttendanceStore;
    use crate::time::TimeOfDay;
    use chrono::NaiveDate;
    use anyhow::Result;

    struct MockStoreRepo {
        store: AttendanceStore,
    }

    impl StoreRepository for MockStoreRepo {
        fn load(&self) -> Result<AttendanceStore> { Ok(self.store.clone()) }
        fn save(&self, _store: &AttendanceStore) -> Result<()> { unimplemented!() }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn worked(store: &mut AttendanceStore, date: NaiveDate, start: &str, end: &str) {
        store.submit(AttendanceEvent::on(date).with_in(t(start)).with_out(t(end)));
    }

    #[test]
    fn test_get_weekly_history_newest_first() {
        let mut store = AttendanceStore::new();
        worked(&mut store, d(2024, 12, 30), "09:00", "17:00");
        worked(&mut store, d(2024, 6, 3), "09:00", "18:00");
        worked(&mut store, d(2024, 6, 11), "09:00", "12:00");

        let repo = MockStoreRepo { store };
        let history = HistoryUseCase::new(&repo).get_weekly_history().unwrap();

        let ids: Vec<&str> = history.iter().map(|w| w.week_id.as_str()).collect();
        assert_eq!(ids, vec!["2025-W01", "2024-W24", "2024-W23"]);
        assert_eq!(history[2].stats.total_minutes, 540);
    }

    #[test]
    fn test_week_stats() {
        let mut store = AttendanceStore::new();
        worked(&mut store, d(2024, 6, 3), "09:00", "17:00"); // 480
        worked(&mut store, d(2024, 6, 4), "08:00", "18:00"); // 600
        worked(&mut store, d(2024, 6, 5), "09:00", "17:30"); // 510
        worked(&mut store, d(2024, 6, 6), "07:00", "17:00"); // 600, tie with Tuesday
        store.submit(AttendanceEvent::on(d(2024, 6, 7)).with_in(t("09:00")));
        store.submit(AttendanceEvent::on(d(2024, 6, 8)).with_remark("Weekend"));
        store.delete_day(d(2024, 6, 8)).unwrap();

        let summary = summarize_week("2024-W23", store.week("2024-W23").unwrap());

        // cleared Saturday is not listed, open Friday is
        assert_eq!(summary.days.len(), 5);
        assert_eq!(summary.days[4].day_of_week, "Fri");
        assert!(!summary.days[4].is_complete);

        assert_eq!(summary.stats.total_minutes, 2190);
        assert_eq!(summary.stats.total_minutes, store.week_total("2024-W23"));
        assert_eq!(summary.stats.complete_days, 4);
        assert_eq!(summary.stats.average_minutes_per_day, 547);
        assert_eq!(summary.stats.most_productive_day, Some(2));
    }

    #[test]
    fn test_week_without_complete_days() {
        let mut store = AttendanceStore::new();
        store.submit(AttendanceEvent::on(d(2024, 6, 3)).with_in(t("09:00")));

        let summary = summarize_week("2024-W23", store.week("2024-W23").unwrap());

        assert_eq!(summary.stats.complete_days, 0);
        assert_eq!(summary.stats.average_minutes_per_day, 0);
        assert_eq!(summary.stats.most_productive_day, None);
    }
}
