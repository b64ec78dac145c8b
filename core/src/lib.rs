pub mod calendar;
pub mod config;
pub mod error;
pub mod model;
pub mod repository;
pub mod time;
pub mod service;
pub mod usecase;

pub use calendar::{classify, CalendarFacts};
pub use config::Config;
pub use error::AttendanceError;
pub use model::entry::Entries;
pub use model::event::AttendanceEvent;
pub use model::record::AttendanceRecord;
pub use model::store::AttendanceStore;
pub use repository::{StoreRepository, FileStoreRepository};
pub use time::{parse_human_date, diff_minutes, TimeOfDay};
pub use service::attendance_service::AttendanceService;
pub use service::dto::{DayRow, TodayProgress, TodayWindow, WeekStats, WeekSummary, WeekTotal, WeekView};
