use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttendanceError {
    /// Raised by `delete_day` when nothing was ever recorded in the week.
    #[error("no attendance recorded for week {0}")]
    WeekNotFound(String),

    #[error("invalid time of day '{0}' (expected HH:MM, 00:00-23:59)")]
    InvalidTime(String),

    #[error("could not parse date: {0}")]
    InvalidDate(String),
}
