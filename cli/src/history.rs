use chrono::NaiveDate;
use timecard_core::time::split_hours_minutes;
use timecard_core::usecase::elapsed::{coverage_percent, is_covered};
use timecard_core::{TimeOfDay, WeekSummary};
use tabled::{Table, Tabled};
use tabled::settings::{Style, Color, Modify};
use tabled::settings::object::Rows;

// Helper struct for Table Row
#[derive(Tabled)]
struct DayTableRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "In")]
    in_time: String,
    #[tabled(rename = "Out")]
    out_time: String,
    #[tabled(rename = "Worked")]
    worked: String,
    #[tabled(rename = "%")]
    coverage: String,
    #[tabled(rename = "Remark")]
    remark: String,
}

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub fn show_history(weeks: Vec<WeekSummary>, target_minutes: i64) {
    if weeks.is_empty() {
        println!("No attendance recorded yet.");
        return;
    }

    for week in &weeks {
        print_week(week, target_minutes);
    }
}

pub fn print_week(week: &WeekSummary, target_minutes: i64) {
    let stats = &week.stats;
    let best = stats.most_productive_day.map_or("-", weekday_name);

    println!(
        "\n\x1b[1;36m{}\x1b[0m (Total: {}, Avg: {}/day over {} days, Best: {})",
        week.week_id,
        hm(stats.total_minutes),
        hm(stats.average_minutes_per_day),
        stats.complete_days,
        best
    );

    let rows: Vec<DayTableRow> = week
        .days
        .iter()
        .map(|day| {
            let coverage = match day.total_minutes {
                Some(minutes) if day.is_complete => {
                    let percent = coverage_percent(minutes, target_minutes);
                    if is_covered(percent) {
                        format!("{}% ✔", percent)
                    } else {
                        format!("{}%", percent)
                    }
                }
                _ => "-".to_string(),
            };

            DayTableRow {
                date: day_label(day.date, &day.day_of_week),
                in_time: clock(day.in_time),
                out_time: clock(day.out_time),
                worked: day.total_minutes.map(hm).unwrap_or_else(|| "-".to_string()),
                coverage,
                remark: day.remark.clone().unwrap_or_default(),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN)); // Header color

    println!("{}", table);
}

fn day_label(date: NaiveDate, day_of_week: &str) -> String {
    format!("{} ({})", date.format("%Y-%m-%d"), day_of_week)
}

fn clock(time: Option<TimeOfDay>) -> String {
    time.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Mon=1 .. Sun=7; anything else renders as "-".
fn weekday_name(ordinal: u8) -> &'static str {
    usize::from(ordinal)
        .checked_sub(1)
        .and_then(|index| WEEKDAYS.get(index))
        .copied()
        .unwrap_or("-")
}

fn hm(minutes: i64) -> String {
    let (hours, minutes) = split_hours_minutes(minutes);
    format!("{}:{}", hours, minutes)
}
