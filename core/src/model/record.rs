use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::entry::Entries;

/// One day slot of a week. A slot cleared by `delete_day` has neither a date
/// nor entries and serializes as `{}`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AttendanceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Entries::is_empty")]
    pub entries: Entries,
}

impl AttendanceRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            entries: Entries::default(),
        }
    }

    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn is_cleared(&self) -> bool {
        self.date.is_none()
    }

    pub fn total_minutes(&self) -> i64 {
        self.entries.total_minutes().unwrap_or(0)
    }
}
