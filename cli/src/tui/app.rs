use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::widgets::TableState;
use timecard_core::service::attendance_service::today;
use timecard_core::usecase::{elapsed, views};
use timecard_core::{
    AttendanceEvent, AttendanceService, Config, DayRow, FileStoreRepository, TimeOfDay,
    TodayProgress, WeekTotal, WeekView,
};
use chrono::NaiveDate;

const REFRESH_EVERY: Duration = Duration::from_secs(60);

pub enum InputMode {
    Normal,
    PunchIn,
    PunchOut,
    Remark,
}

pub struct App {
    pub service: AttendanceService<FileStoreRepository>,
    pub config: Config,
    pub week: WeekView,
    pub rows: Vec<DayRow>,
    pub total: WeekTotal,
    pub total_minutes: i64,
    pub progress: TodayProgress,
    pub state: TableState,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub message: Option<String>,
    shown_date: NaiveDate,
    last_refresh: Instant,
}

impl App {
    pub fn new(service: AttendanceService<FileStoreRepository>, config: Config) -> Result<App> {
        let store = service.store()?;
        let today = today();
        let week = views::current_week_records(&store, today);
        let progress = elapsed::today_progress(
            views::today_window(&store, today),
            TimeOfDay::now(),
            config.daily_target_minutes,
        );

        let mut app = App {
            rows: week.rows(),
            total: views::current_week_total(&store, today),
            total_minutes: views::current_week_total_minutes(&store, today),
            week,
            progress,
            service,
            config,
            state: TableState::default(),
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            message: None,
            shown_date: today,
            last_refresh: Instant::now(),
        };
        app.select_today();
        Ok(app)
    }

    pub fn next(&mut self) {
        if self.rows.is_empty() { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.rows.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.rows.is_empty() { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.rows.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    fn selected_date(&self) -> Option<NaiveDate> {
        self.state
            .selected()
            .and_then(|i| self.rows.get(i))
            .map(|row| row.date)
    }

    fn select_today(&mut self) {
        let today = today();
        let index = self
            .rows
            .iter()
            .position(|row| row.date == today)
            .or(if self.rows.is_empty() { None } else { Some(0) });
        self.state.select(index);
    }

    pub fn delete_selected(&mut self) {
        if let Some(date) = self.selected_date() {
            let i = self.state.selected().unwrap_or(0);
            match self.service.delete_day(date) {
                Ok(()) => self.message = Some(format!("Cleared {}", date)),
                Err(e) => self.message = Some(e.to_string()),
            }
            self.reload();

            if self.rows.is_empty() {
                self.state.select(None);
            } else if i >= self.rows.len() {
                self.state.select(Some(self.rows.len() - 1));
            } else {
                self.state.select(Some(i));
            }
        }
    }

    /// Re-reads the store. Errors end up in the status line.
    pub fn reload(&mut self) {
        let store = match self.service.store() {
            Ok(store) => store,
            Err(e) => {
                self.message = Some(e.to_string());
                return;
            }
        };
        let today = today();
        self.week = views::current_week_records(&store, today);
        self.rows = self.week.rows();
        self.total = views::current_week_total(&store, today);
        self.total_minutes = views::current_week_total_minutes(&store, today);
        self.progress = elapsed::today_progress(
            views::today_window(&store, today),
            TimeOfDay::now(),
            self.config.daily_target_minutes,
        );
        self.shown_date = today;
        self.last_refresh = Instant::now();
    }

    /// Keeps the "worked so far" figure moving while today is still open,
    /// and switches to the new day after midnight.
    /// Read-only: never writes to the store.
    pub fn on_tick(&mut self) {
        if self.date_rolled_over(today()) {
            self.reload();
            self.select_today();
            return;
        }

        let window = self.progress.window;
        if window.start.is_none() || window.end.is_some() {
            return;
        }
        if self.last_refresh.elapsed() >= REFRESH_EVERY {
            self.progress = elapsed::today_progress(
                window,
                TimeOfDay::now(),
                self.config.daily_target_minutes,
            );
            self.last_refresh = Instant::now();
        }
    }

    fn date_rolled_over(&self, now: NaiveDate) -> bool {
        now != self.shown_date
    }

    /// Enter on the table: punch out once today has an in-time, else punch in.
    pub fn enter_punch_mode(&mut self) {
        if self.progress.window.start.is_some() {
            self.enter_input_mode(InputMode::PunchOut);
        } else {
            self.enter_input_mode(InputMode::PunchIn);
        }
    }

    pub fn enter_input_mode(&mut self, mode: InputMode) {
        self.input = match mode {
            InputMode::PunchIn | InputMode::PunchOut => TimeOfDay::now().to_string(),
            InputMode::Remark | InputMode::Normal => String::new(),
        };
        self.cursor_position = self.input.chars().count();
        self.input_mode = mode;
        self.message = None;
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self.input.chars().take(self.cursor_position - 1).map(|c| c.len_utf8()).sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn submit_command(&mut self) {
        if self.input.trim().is_empty() {
            self.exit_input_mode();
            return;
        }

        let result = match self.input_mode {
            InputMode::PunchIn => self.submit_time(true),
            InputMode::PunchOut => self.submit_time(false),
            InputMode::Remark => self.submit_remark(),
            InputMode::Normal => Ok(()),
        };
        if let Err(e) = result {
            // keep the input so the user can fix it
            self.message = Some(e.to_string());
            return;
        }

        self.input.clear();
        self.cursor_position = 0;
        self.exit_input_mode();
        self.reload();
        self.select_today();
    }

    fn submit_time(&mut self, punch_in: bool) -> Result<()> {
        let time: TimeOfDay = self.input.trim().parse()?;
        let date = today();
        if punch_in {
            self.service
                .punch_in(date, time, None, self.config.default_remark.as_deref())?;
            self.message = Some(format!("In at {}", time));
        } else {
            self.service.punch_out(date, time, None)?;
            self.message = Some(format!("Out at {}", time));
        }
        Ok(())
    }

    fn submit_remark(&mut self) -> Result<()> {
        let date = self.selected_date().unwrap_or_else(today);
        let remark = self.input.trim().to_string();
        self.service.submit(AttendanceEvent::on(date).with_remark(remark))?;
        self.message = Some(format!("Remark saved for {}", date));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir) -> App {
        let repo = FileStoreRepository::new(Some(dir.path().to_path_buf())).unwrap();
        App::new(AttendanceService::new(repo), Config::default()).unwrap()
    }

    #[test]
    fn test_tick_reloads_after_midnight() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let yesterday = today().pred_opt().unwrap();
        app.shown_date = yesterday;

        // a punch written by another process shows up once the day changes
        app.service
            .punch_in(today(), TimeOfDay::from_hm(9, 0).unwrap(), None, None)
            .unwrap();
        app.on_tick();

        assert_eq!(app.shown_date, today());
        assert_eq!(app.week.week_id, timecard_core::classify(today()).week_id);
        assert!(app.rows.iter().any(|row| row.date == today()));
    }
}
