mod history;
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use timecard_core::config::resolve_data_dir;
use timecard_core::service::attendance_service::today;
use timecard_core::time::split_hours_minutes;
use timecard_core::usecase::elapsed::coverage_percent;
use timecard_core::usecase::history::summarize_week;
use timecard_core::{
    parse_human_date, AttendanceError, AttendanceEvent, AttendanceService, Config,
    FileStoreRepository, TimeOfDay,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "timecard")]
#[command(about = "Track daily in/out times and weekly worked hours", long_about = None)]
struct Cli {
    /// Directory holding attendance.json and config.toml (default: ~/.timecard)
    #[arg(long, global = true, env = "TIMECARD_DIR")]
    data_dir: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record the in-time of a day (usage: in 09:00 --date mon)
    In {
        /// HH:MM, defaults to the current time
        time: Option<String>,
        /// today, yesterday, a weekday name or YYYY-MM-DD
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        remark: Option<String>,
    },
    /// Record the out-time of a day
    Out {
        /// HH:MM, defaults to the current time
        time: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        remark: Option<String>,
    },
    /// Set the remark of a day
    Remark {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Clear the record of a day
    Delete {
        date: String,
    },
    /// Show the days of a week
    Week {
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show today's times and progress
    Status,
    /// Show every recorded week
    History,
    /// Open the Terminal User Interface
    Tui,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_date(input: Option<&str>) -> Result<NaiveDate> {
    match input {
        Some(raw) => Ok(parse_human_date(raw, today())?),
        None => Ok(today()),
    }
}

fn resolve_time(input: Option<&str>) -> Result<TimeOfDay> {
    match input {
        Some(raw) => Ok(raw.parse()?),
        None => Ok(TimeOfDay::now()),
    }
}

fn format_minutes(minutes: i64) -> String {
    let (hours, minutes) = split_hours_minutes(minutes);
    format!("{}h{}m", hours, minutes)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let data_dir = resolve_data_dir(cli.data_dir)?;
    let config = Config::load(&data_dir)?;
    debug!(data_dir = %data_dir.display(), ?config, "starting");
    let repo = FileStoreRepository::new(Some(data_dir.clone()))
        .with_context(|| format!("Failed to open store in {}", data_dir.display()))?;
    let service = AttendanceService::new(repo);

    match cli.command {
        Some(Commands::In { time, date, remark }) => {
            let date = resolve_date(date.as_deref())?;
            let time = resolve_time(time.as_deref())?;
            service.punch_in(date, time, remark, config.default_remark.as_deref())?;
            println!("In at {} on {}", time, date);
        },
        Some(Commands::Out { time, date, remark }) => {
            let date = resolve_date(date.as_deref())?;
            let time = resolve_time(time.as_deref())?;
            service.punch_out(date, time, remark)?;

            let store = service.store()?;
            match store.day(date).and_then(|r| r.entries.total_minutes()) {
                Some(minutes) => println!(
                    "Out at {} on {}: worked {} ({}% of target)",
                    time,
                    date,
                    format_minutes(minutes),
                    coverage_percent(minutes, config.daily_target_minutes)
                ),
                None => println!("Out at {} on {} (no in-time recorded yet)", time, date),
            }
        },
        Some(Commands::Remark { text, date }) => {
            let date = resolve_date(date.as_deref())?;
            service.submit(AttendanceEvent::on(date).with_remark(text.join(" ")))?;
            println!("Remark saved for {}", date);
        },
        Some(Commands::Delete { date }) => {
            let date = resolve_date(Some(date.as_str()))?;
            match service.delete_day(date) {
                Ok(()) => println!("Cleared {}", date),
                Err(e) if matches!(e.downcast_ref::<AttendanceError>(), Some(AttendanceError::WeekNotFound(_))) => {
                    println!("Nothing to delete: {}", e);
                },
                Err(e) => return Err(e),
            }
        },
        Some(Commands::Week { date }) => {
            let date = resolve_date(date.as_deref())?;
            let view = service.week_records_for(date)?;
            let total = service.week_total_for(date)?;
            if view.rows().is_empty() {
                println!("No attendance records found for {}", view.week_id);
            } else {
                history::print_week(&summarize_week(&view.week_id, &view.days), config.daily_target_minutes);
            }
            println!(
                "Total: {}h:{}m of {}h",
                total.hours, total.minutes, config.weekly_target_hours
            );
        },
        Some(Commands::Status) => {
            let progress = service.today_progress(config.daily_target_minutes)?;
            let show = |t: Option<TimeOfDay>| t.map(|t| t.to_string()).unwrap_or_else(|| "--:--".to_string());

            println!("Date:      {}", today().format("%Y-%m-%d (%a)"));
            println!("In:        {}", show(progress.window.start));
            println!("Out:       {}", show(progress.window.end));
            println!("Worked:    {} ({}%)", format_minutes(progress.elapsed_minutes), progress.coverage_percent);
            println!("Stop at:   {}", show(progress.should_stop_at));
            let total = service.current_week_total()?;
            println!("This week: {}h:{}m", total.hours, total.minutes);
        },
        Some(Commands::History) => {
            history::show_history(service.weekly_history()?, config.daily_target_minutes);
        },
        Some(Commands::Tui) | None => {
            tui::run(service, config)?;
        }
    }
    Ok(())
}
