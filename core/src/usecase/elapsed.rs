use crate::service::dto::{TodayProgress, TodayWindow};
use crate::time::{diff_minutes, TimeOfDay};

/// Minutes worked today. With no end time yet, counts up to `now` and never
/// goes below zero.
pub fn elapsed_minutes(start: TimeOfDay, end: Option<TimeOfDay>, now: TimeOfDay) -> i64 {
    match end {
        Some(end) => diff_minutes(start, end),
        None => diff_minutes(start, now).max(0),
    }
}

pub fn should_stop_at(start: TimeOfDay, target_minutes: i64) -> TimeOfDay {
    start.wrapping_add_minutes(target_minutes)
}

/// Share of the daily target covered, floored to a whole percent.
pub fn coverage_percent(minutes: i64, target_minutes: i64) -> u32 {
    if minutes <= 0 || target_minutes <= 0 {
        return 0;
    }
    u32::try_from(minutes * 100 / target_minutes).unwrap_or(u32::MAX)
}

pub fn is_covered(percent: u32) -> bool {
    percent > 99
}

pub fn today_progress(window: TodayWindow, now: TimeOfDay, target_minutes: i64) -> TodayProgress {
    let elapsed = window
        .start
        .map(|start| elapsed_minutes(start, window.end, now))
        .unwrap_or(0);

    TodayProgress {
        window,
        elapsed_minutes: elapsed,
        should_stop_at: window.start.map(|start| should_stop_at(start, target_minutes)),
        coverage_percent: coverage_percent(elapsed, target_minutes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn test_elapsed_minutes() {
        assert_eq!(elapsed_minutes(t("09:00"), None, t("11:15")), 135);
        assert_eq!(elapsed_minutes(t("09:00"), Some(t("17:30")), t("23:00")), 510);
        // started later than "now" (entered ahead of time)
        assert_eq!(elapsed_minutes(t("09:00"), None, t("08:00")), 0);
    }

    #[test]
    fn test_should_stop_at() {
        assert_eq!(should_stop_at(t("08:45"), 540), t("17:45"));
        assert_eq!(should_stop_at(t("18:00"), 540), t("03:00"));
    }

    #[test]
    fn test_coverage() {
        assert_eq!(coverage_percent(270, 540), 50);
        assert_eq!(coverage_percent(539, 540), 99);
        assert_eq!(coverage_percent(540, 540), 100);
        assert_eq!(coverage_percent(-30, 540), 0);
        assert!(!is_covered(99));
        assert!(is_covered(100));
    }

    #[test]
    fn test_today_progress() {
        let open = today_progress(TodayWindow { start: Some(t("09:00")), end: None }, t("13:30"), 540);
        assert_eq!(open.elapsed_minutes, 270);
        assert_eq!(open.should_stop_at, Some(t("18:00")));
        assert_eq!(open.coverage_percent, 50);

        let empty = today_progress(TodayWindow::default(), t("13:30"), 540);
        assert_eq!(empty.elapsed_minutes, 0);
        assert_eq!(empty.should_stop_at, None);
        assert_eq!(empty.coverage_percent, 0);
    }
}
