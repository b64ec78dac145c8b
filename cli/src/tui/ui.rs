use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, BorderType, Gauge, Paragraph, Row, Table},
    Frame,
};
use timecard_core::service::attendance_service::today;
use timecard_core::time::split_hours_minutes;
use timecard_core::usecase::elapsed::is_covered;
use timecard_core::TimeOfDay;

use crate::tui::app::{App, InputMode};

// --- THEME ---
const COVERED: Color = Color::Green;
const SHORT: Color = Color::Red;
const MUTED: Color = Color::DarkGray;

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let input_height = match app.input_mode {
        InputMode::Normal => 1,
        _ => 3,
    };

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3),            // Header
            Constraint::Length(3),            // Today / week gauges
            Constraint::Min(1),               // Week table
            Constraint::Length(input_height), // Footer or input
        ])
        .split(size);

    let header = Paragraph::new(format!("TIMECARD  {}", app.week.week_id))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    draw_grid(f, app, main_chunks[1]);
    draw_week_table(f, app, main_chunks[2]);

    match app.input_mode {
        InputMode::Normal => draw_footer(f, app, main_chunks[3]),
        _ => draw_input(f, app, main_chunks[3]),
    }
}

fn draw_grid(f: &mut Frame, app: &App, area: Rect) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let progress = &app.progress;
    let (hours, minutes) = split_hours_minutes(progress.elapsed_minutes);
    let today_color = if is_covered(progress.coverage_percent) { COVERED } else { SHORT };
    let today_gauge = Gauge::default()
        .block(cell_block(" Today "))
        .gauge_style(Style::default().fg(today_color))
        .ratio((f64::from(progress.coverage_percent) / 100.0).clamp(0.0, 1.0))
        .label(format!("{}:{}", hours, minutes));
    f.render_widget(today_gauge, cells[0]);

    let weekly_target = app.config.weekly_target_hours * 60;
    let week_ratio = if weekly_target > 0 {
        (app.total_minutes as f64 / weekly_target as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let week_color = if app.total_minutes >= weekly_target { COVERED } else { SHORT };
    let week_gauge = Gauge::default()
        .block(cell_block(" Week "))
        .gauge_style(Style::default().fg(week_color))
        .ratio(week_ratio)
        .label(format!("{}h:{}m", app.total.hours, app.total.minutes));
    f.render_widget(week_gauge, cells[1]);

    let stop_at = progress
        .should_stop_at
        .map(|t| t.to_string())
        .unwrap_or_else(|| "--:--".to_string());
    let stop = Paragraph::new(stop_at)
        .alignment(Alignment::Center)
        .block(cell_block(" Stop at "));
    f.render_widget(stop, cells[2]);

    let date = Paragraph::new(today().format("%Y-%m-%d").to_string())
        .alignment(Alignment::Center)
        .block(cell_block(" Date "));
    f.render_widget(date, cells[3]);
}

fn cell_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(MUTED))
}

fn draw_week_table(f: &mut Frame, app: &mut App, area: Rect) {
    let target = app.config.daily_target_minutes;

    let rows: Vec<Row> = app.rows.iter().map(|day| {
        let worked = day.total_minutes.map(|m| {
            let (h, m) = split_hours_minutes(m);
            format!("{}:{}", h, m)
        }).unwrap_or_else(|| "-".to_string());

        let percent_style = match day.total_minutes {
            Some(m) if m >= target => Style::default().fg(COVERED),
            Some(_) => Style::default().fg(SHORT),
            None => Style::default().fg(MUTED),
        };
        let percent = day.total_minutes
            .filter(|m| *m > 0 && target > 0)
            .map(|m| format!("{}%", m * 100 / target))
            .unwrap_or_default();

        Row::new(vec![
            Span::styled(format!("{} {}", day.date.format("%d"), day.day_of_week), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(clock(day.in_time)),
            Span::raw(clock(day.out_time)),
            Span::raw(worked),
            Span::styled(percent, percent_style),
            Span::raw(day.remark.clone().unwrap_or_default()),
        ])
    }).collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),  // Day
            Constraint::Length(6),  // In
            Constraint::Length(6),  // Out
            Constraint::Length(7),  // Worked
            Constraint::Length(6),  // Percent
            Constraint::Min(10),    // Remark
        ]
    )
    .header(Row::new(vec!["Day", "In", "Out", "Worked", "%", "Remark"]).style(Style::default().fg(Color::Yellow)))
    .block(Block::default().title(" This week ").borders(Borders::ALL).border_type(BorderType::Rounded))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    if app.rows.is_empty() {
        let empty = Paragraph::new("No attendance records found")
            .alignment(Alignment::Center)
            .style(Style::default().fg(MUTED))
            .block(Block::default().title(" This week ").borders(Borders::ALL).border_type(BorderType::Rounded));
        f.render_widget(empty, area);
    } else {
        f.render_stateful_widget(table, area, &mut app.state);
    }
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let line = match &app.message {
        Some(message) => Line::from(Span::styled(message.as_str(), Style::default().fg(Color::Yellow))),
        None => Line::from(Span::styled(
            "Enter: Punch | i/o: In/Out | r: Remark | d: Delete | j/k: Navigate | q: Quit",
            Style::default().fg(MUTED),
        )),
    };
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.input_mode {
        InputMode::PunchIn => " In time (HH:MM) ",
        InputMode::PunchOut => " Out time (HH:MM) ",
        InputMode::Remark => " Remark ",
        InputMode::Normal => "",
    };
    let title = match &app.message {
        Some(message) => format!("{}- {} ", title, message),
        None => title.to_string(),
    };

    let input = Paragraph::new(app.input.as_str())
        .block(Block::default().title(title).borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(input, area);

    f.set_cursor_position((area.x + 1 + app.cursor_position as u16, area.y + 1));
}

fn clock(time: Option<TimeOfDay>) -> String {
    time.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string())
}
