use serde::{Deserialize, Serialize};

use crate::model::event::AttendanceEvent;
use crate::time::{diff_minutes, TimeOfDay};

/// The per-day field map. `total_minutes`, `total_hours` and `is_complete`
/// are only set while both clock times are present and are never written
/// from outside this module.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    in_time: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    out_time: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_complete: Option<bool>,
}

impl Entries {
    pub fn in_time(&self) -> Option<TimeOfDay> {
        self.in_time
    }

    pub fn out_time(&self) -> Option<TimeOfDay> {
        self.out_time
    }

    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }

    pub fn total_minutes(&self) -> Option<i64> {
        self.total_minutes
    }

    pub fn total_hours(&self) -> Option<f64> {
        self.total_hours
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete.unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.in_time.is_none() && self.out_time.is_none() && self.remark.is_none()
    }

    /// Last write wins per field: every field the event carries replaces the
    /// stored one, absent fields are left alone. Totals follow the merged
    /// clock times.
    pub(crate) fn merge(&mut self, event: &AttendanceEvent) {
        if let Some(time) = event.in_time {
            self.in_time = Some(time);
        }
        if let Some(time) = event.out_time {
            self.out_time = Some(time);
        }
        if let Some(remark) = &event.remark {
            self.remark = Some(remark.clone());
        }
        self.refresh_totals();
    }

    pub(crate) fn refresh_totals(&mut self) {
        match (self.in_time, self.out_time) {
            (Some(start), Some(end)) => {
                let minutes = diff_minutes(start, end);
                self.total_minutes = Some(minutes);
                self.total_hours = Some(minutes as f64 / 60.0);
                self.is_complete = Some(true);
            }
            _ => {
                self.total_minutes = None;
                self.total_hours = None;
                self.is_complete = None;
            }
        }
    }
}
