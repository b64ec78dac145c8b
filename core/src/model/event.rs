use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::TimeOfDay;

/// One attendance submission for a calendar day. Fields left as `None` keep
/// whatever the day already holds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEvent {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_time: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_time: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl AttendanceEvent {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            date,
            in_time: None,
            out_time: None,
            remark: None,
        }
    }

    pub fn with_in(mut self, time: TimeOfDay) -> Self {
        self.in_time = Some(time);
        self
    }

    pub fn with_out(mut self, time: TimeOfDay) -> Self {
        self.out_time = Some(time);
        self
    }

    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }
}
