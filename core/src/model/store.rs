use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calendar::classify;
use crate::error::AttendanceError;
use crate::model::event::AttendanceEvent;
use crate::model::record::AttendanceRecord;

pub type WeekRecords = BTreeMap<u8, AttendanceRecord>;

/// All attendance, bucketed `week id -> day ordinal -> record`, with the
/// worked minutes of every week kept alongside.
///
/// Only `submit` and `delete_day` mutate it; both rebuild the affected
/// week's total before returning, so `week_totals` always equals the sum
/// over the week's day slots.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStore {
    #[serde(default)]
    records: BTreeMap<String, WeekRecords>,
    #[serde(default)]
    week_totals: BTreeMap<String, i64>,
}

impl AttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, event: AttendanceEvent) {
        let facts = classify(event.date);

        let week = self.records.entry(facts.week_id.clone()).or_default();
        let slot = week
            .entry(facts.day_ordinal)
            .or_insert_with(|| AttendanceRecord::new(facts.canonical_date));

        let mut entries = std::mem::take(&mut slot.entries);
        entries.merge(&event);
        *slot = AttendanceRecord {
            date: Some(facts.canonical_date),
            entries,
        };

        let total = self.recompute_week_total(&facts.week_id);
        debug!(
            week = %facts.week_id,
            day = facts.day_ordinal,
            complete = self.day(event.date).map(|r| r.entries.is_complete()).unwrap_or(false),
            week_total = total,
            "attendance submitted"
        );
    }

    /// Clears the day's slot (the key stays, holding an empty record).
    /// Fails without touching the store if the week was never recorded.
    pub fn delete_day(&mut self, date: NaiveDate) -> Result<(), AttendanceError> {
        let facts = classify(date);

        let week = self
            .records
            .get_mut(&facts.week_id)
            .ok_or_else(|| AttendanceError::WeekNotFound(facts.week_id.clone()))?;
        week.insert(facts.day_ordinal, AttendanceRecord::cleared());

        let total = self.recompute_week_total(&facts.week_id);
        debug!(week = %facts.week_id, day = facts.day_ordinal, week_total = total, "day cleared");
        Ok(())
    }

    pub fn week(&self, week_id: &str) -> Option<&WeekRecords> {
        self.records.get(week_id)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&AttendanceRecord> {
        let facts = classify(date);
        self.records
            .get(&facts.week_id)
            .and_then(|week| week.get(&facts.day_ordinal))
    }

    pub fn week_total(&self, week_id: &str) -> i64 {
        self.week_totals.get(week_id).copied().unwrap_or(0)
    }

    pub fn weeks(&self) -> impl Iterator<Item = (&String, &WeekRecords)> {
        self.records.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rebuilds every day's totals and every week total from the stored
    /// clock times. Used after loading a store written elsewhere.
    ///
    /// Dated records filed under the wrong week or day slot are moved to the
    /// slot their date classifies to. Undated records outside `1..=7` are
    /// dropped, and so is a misfiled record whose target slot already holds
    /// a dated record.
    pub fn reconcile(&mut self) {
        self.refile_misplaced_days();

        let week_ids: Vec<String> = self.records.keys().cloned().collect();
        for week_id in week_ids {
            if let Some(week) = self.records.get_mut(&week_id) {
                for record in week.values_mut() {
                    record.entries.refresh_totals();
                }
            }
            let stored = self.week_totals.get(&week_id).copied();
            let total = self.recompute_week_total(&week_id);
            if stored != Some(total) {
                warn!(week = %week_id, ?stored, recomputed = total, "week total was out of date");
            }
        }
        self.week_totals.retain(|week_id, _| self.records.contains_key(week_id));
    }

    fn refile_misplaced_days(&mut self) {
        let mut misplaced = Vec::new();
        for (week_id, week) in self.records.iter_mut() {
            let keys: Vec<u8> = week
                .iter()
                .filter(|&(ordinal, record)| is_misplaced(week_id, *ordinal, record))
                .map(|(ordinal, _)| *ordinal)
                .collect();
            for ordinal in keys {
                if let Some(record) = week.remove(&ordinal) {
                    misplaced.push((week_id.clone(), ordinal, record));
                }
            }
        }

        if misplaced.is_empty() {
            return;
        }

        for (week_id, ordinal, record) in misplaced {
            let Some(date) = record.date else {
                warn!(week = %week_id, day = ordinal, "dropping undated record in invalid day slot");
                continue;
            };
            let facts = classify(date);
            let target = self.records.entry(facts.week_id.clone()).or_default();
            if target
                .get(&facts.day_ordinal)
                .is_some_and(|existing| existing.date.is_some())
            {
                warn!(week = %week_id, day = ordinal, %date, "dropping misfiled duplicate of an existing day");
            } else {
                warn!(
                    from_week = %week_id,
                    from_day = ordinal,
                    week = %facts.week_id,
                    day = facts.day_ordinal,
                    "refiled misplaced day"
                );
                target.insert(facts.day_ordinal, record);
            }
        }
        // weeks that only held misfiled slots
        self.records.retain(|_, week| !week.is_empty());
    }

    fn recompute_week_total(&mut self, week_id: &str) -> i64 {
        let total = self
            .records
            .get(week_id)
            .map(|week| week.values().map(AttendanceRecord::total_minutes).sum())
            .unwrap_or(0);
        self.week_totals.insert(week_id.to_string(), total);
        total
    }
}

fn is_misplaced(week_id: &str, ordinal: u8, record: &AttendanceRecord) -> bool {
    match record.date {
        Some(date) => {
            let facts = classify(date);
            facts.week_id != week_id || facts.day_ordinal != ordinal
        }
        None => !(1..=7).contains(&ordinal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeOfDay;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn week_sum(store: &AttendanceStore, week_id: &str) -> i64 {
        store
            .week(week_id)
            .map(|week| {
                (1u8..=7)
                    .map(|ordinal| week.get(&ordinal).map(|r| r.total_minutes()).unwrap_or(0))
                    .sum()
            })
            .unwrap_or(0)
    }

    #[test]
    fn test_in_then_out_completes_day() {
        let mut store = AttendanceStore::new();
        let monday = d(2024, 6, 3);

        store.submit(AttendanceEvent::on(monday).with_in(t("09:00")));
        store.submit(AttendanceEvent::on(monday).with_out(t("18:00")));

        let record = store.day(monday).unwrap();
        assert_eq!(record.date, Some(monday));
        assert_eq!(record.entries.in_time(), Some(t("09:00")));
        assert_eq!(record.entries.out_time(), Some(t("18:00")));
        assert_eq!(record.entries.total_minutes(), Some(540));
        assert!(record.entries.is_complete());
        assert_eq!(store.week_total("2024-W23"), 540);
    }

    #[test]
    fn test_resubmitting_in_time_overwrites() {
        let mut store = AttendanceStore::new();
        let monday = d(2024, 6, 3);

        store.submit(AttendanceEvent::on(monday).with_in(t("09:00")));
        store.submit(AttendanceEvent::on(monday).with_in(t("08:00")));

        let record = store.day(monday).unwrap();
        assert_eq!(record.entries.in_time(), Some(t("08:00")));
        assert_eq!(record.entries.out_time(), None);
        assert!(!record.entries.is_complete());
        assert_eq!(store.week_total("2024-W23"), 0);
    }

    #[test]
    fn test_out_time_resubmission_replaces_total() {
        let mut store = AttendanceStore::new();
        let monday = d(2024, 6, 3);

        store.submit(AttendanceEvent::on(monday).with_in(t("09:00")));
        store.submit(AttendanceEvent::on(monday).with_out(t("17:00")));
        store.submit(AttendanceEvent::on(monday).with_out(t("18:30")));

        assert_eq!(store.day(monday).unwrap().entries.total_minutes(), Some(570));
        assert_eq!(store.week_total("2024-W23"), 570);
    }

    #[test]
    fn test_remark_only_submission_keeps_times() {
        let mut store = AttendanceStore::new();
        let monday = d(2024, 6, 3);

        store.submit(AttendanceEvent::on(monday).with_in(t("09:00")).with_out(t("17:00")));
        store.submit(AttendanceEvent::on(monday).with_remark("Half day off"));

        let record = store.day(monday).unwrap();
        assert_eq!(record.entries.remark(), Some("Half day off"));
        assert_eq!(record.entries.total_minutes(), Some(480));
    }

    #[test]
    fn test_delete_day_resets_aggregate() {
        let mut store = AttendanceStore::new();
        let monday = d(2024, 6, 3);
        let tuesday = d(2024, 6, 4);

        store.submit(AttendanceEvent::on(monday).with_in(t("09:00")).with_out(t("18:00")));
        store.submit(AttendanceEvent::on(tuesday).with_in(t("09:00")).with_out(t("17:30")));
        assert_eq!(store.week_total("2024-W23"), 1050);

        store.delete_day(monday).unwrap();

        assert_eq!(store.week_total("2024-W23"), 510);
        let cleared = store.week("2024-W23").unwrap().get(&1).unwrap();
        assert!(cleared.is_cleared());
        assert_eq!(serde_json::to_value(cleared).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn test_delete_untouched_slot_in_known_week() {
        let mut store = AttendanceStore::new();
        store.submit(AttendanceEvent::on(d(2024, 6, 3)).with_in(t("09:00")).with_out(t("10:00")));

        store.delete_day(d(2024, 6, 7)).unwrap();

        let week = store.week("2024-W23").unwrap();
        assert!(week.get(&5).unwrap().is_cleared());
        assert_eq!(store.week_total("2024-W23"), 60);
    }

    #[test]
    fn test_delete_day_in_unknown_week() {
        let mut store = AttendanceStore::new();
        store.submit(AttendanceEvent::on(d(2024, 6, 3)).with_in(t("09:00")));
        let before = store.clone();

        let err = store.delete_day(d(2024, 7, 1)).unwrap_err();

        assert_eq!(err, AttendanceError::WeekNotFound("2024-W27".to_string()));
        assert_eq!(store, before);
    }

    #[test]
    fn test_resubmitting_cleared_day() {
        let mut store = AttendanceStore::new();
        let monday = d(2024, 6, 3);
        store.submit(AttendanceEvent::on(monday).with_in(t("09:00")).with_out(t("18:00")));
        store.delete_day(monday).unwrap();

        store.submit(AttendanceEvent::on(monday).with_out(t("12:00")));

        let record = store.day(monday).unwrap();
        assert_eq!(record.date, Some(monday));
        assert_eq!(record.entries.in_time(), None);
        assert!(!record.entries.is_complete());
        assert_eq!(store.week_total("2024-W23"), 0);
    }

    #[test]
    fn test_negative_duration_is_kept() {
        let mut store = AttendanceStore::new();
        let friday = d(2024, 6, 7);
        store.submit(AttendanceEvent::on(friday).with_in(t("22:00")).with_out(t("06:00")));

        assert_eq!(store.day(friday).unwrap().entries.total_minutes(), Some(-960));
        assert_eq!(store.week_total("2024-W23"), -960);
    }

    #[test]
    fn test_week_total_matches_day_slots() {
        let mut store = AttendanceStore::new();
        let events = [
            (d(2024, 12, 30), "09:00", Some("17:00")),
            (d(2024, 12, 31), "08:30", Some("18:00")),
            (d(2025, 1, 1), "10:00", None),
            (d(2025, 1, 3), "07:45", Some("16:15")),
            (d(2025, 1, 6), "09:00", Some("12:00")),
        ];
        for (date, start, end) in events {
            store.submit(AttendanceEvent::on(date).with_in(t(start)));
            if let Some(end) = end {
                store.submit(AttendanceEvent::on(date).with_out(t(end)));
            }
        }
        store.delete_day(d(2024, 12, 31)).unwrap();

        for (week_id, _) in store.weeks() {
            assert_eq!(store.week_total(week_id), week_sum(&store, week_id));
        }
        assert_eq!(store.week_total("2025-W01"), 480 + 510);
        assert_eq!(store.week_total("2025-W02"), 180);
    }

    #[test]
    fn test_serde_shape() {
        let mut store = AttendanceStore::new();
        let monday = d(2024, 6, 3);
        store.submit(AttendanceEvent::on(monday).with_in(t("09:00")).with_out(t("17:30")));

        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "records": {
                    "2024-W23": {
                        "1": {
                            "date": "2024-06-03",
                            "entries": {
                                "inTime": "09:00",
                                "outTime": "17:30",
                                "totalMinutes": 510,
                                "totalHours": 8.5,
                                "isComplete": true
                            }
                        }
                    }
                },
                "weekTotals": { "2024-W23": 510 }
            })
        );

        let back: AttendanceStore = serde_json::from_value(json).unwrap();
        assert_eq!(back, store);
    }

    #[test]
    fn test_reconcile_repairs_stale_totals() {
        let json = serde_json::json!({
            "records": {
                "2024-W23": {
                    "1": { "date": "2024-06-03", "entries": { "inTime": "09:00", "outTime": "10:00" } },
                    "2": {}
                }
            },
            "weekTotals": { "2024-W23": 999, "2023-W01": 5 }
        });
        let mut store: AttendanceStore = serde_json::from_value(json).unwrap();

        store.reconcile();

        assert_eq!(store.week_total("2024-W23"), 60);
        assert_eq!(store.week_total("2023-W01"), 0);
        assert!(store.day(d(2024, 6, 3)).unwrap().entries.is_complete());
    }

    #[test]
    fn test_reconcile_refiles_day_under_wrong_slot() {
        let json = serde_json::json!({
            "records": {
                "2024-W23": {
                    "0": { "date": "2024-06-03", "entries": { "inTime": "09:00", "outTime": "10:00" } }
                }
            }
        });
        let mut store: AttendanceStore = serde_json::from_value(json).unwrap();

        store.reconcile();

        let week = store.week("2024-W23").unwrap();
        assert_eq!(week.keys().copied().collect::<Vec<_>>(), vec![1]);
        assert!(store.day(d(2024, 6, 3)).is_some());

        // a later punch lands on the same slot instead of a second one
        store.submit(AttendanceEvent::on(d(2024, 6, 3)).with_out(t("11:00")));
        assert_eq!(store.week("2024-W23").unwrap().len(), 1);
        assert_eq!(store.week_total("2024-W23"), 120);
    }

    #[test]
    fn test_reconcile_moves_day_to_its_own_week_and_drops_bad_slots() {
        let json = serde_json::json!({
            "records": {
                "2024-W22": {
                    "1": { "date": "2024-06-03", "entries": { "inTime": "09:00", "outTime": "10:00" } },
                    "9": {}
                },
                "2024-W23": {
                    "1": { "date": "2024-06-03", "entries": { "inTime": "08:00", "outTime": "12:00" } },
                    "2": { "date": "2024-06-04", "entries": {} },
                    "3": { "date": "2024-06-04", "entries": { "inTime": "09:00", "outTime": "09:30" } }
                }
            }
        });
        let mut store: AttendanceStore = serde_json::from_value(json).unwrap();

        store.reconcile();

        // W22 held nothing but misfiled slots
        assert!(store.week("2024-W22").is_none());
        assert_eq!(store.week_total("2024-W22"), 0);

        let week = store.week("2024-W23").unwrap();
        assert_eq!(week.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(store.day(d(2024, 6, 3)).unwrap().entries.total_minutes(), Some(240));
        assert_eq!(store.week_total("2024-W23"), 240);
    }
}
