use crate::app::{App, Message};
use crate::cli;
use crate::task::TaskStatus;
use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use tracing::info;

const HELP: &str =
    "a add  e edit  d delete  s status  / search  c clear  o order  Enter details  ↑/↓ move  q quit";

/// Sets up the terminal, runs the board until the user quits, and restores
/// the terminal even when the loop fails.
pub fn run(mut app: App) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let due = app.upcoming(today).len();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    if due > 0 {
        info!(due, "tasks due soon");
        execute!(stdout, Print("\x07"))?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result?;
    Ok(())
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        let today = Local::now().date_naive();
        terminal.draw(|f| draw(f, app, today))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc if app.detail.is_none() => return Ok(()),
            KeyCode::Esc | KeyCode::Enter => app.toggle_detail(),
            KeyCode::Up => app.select_previous(),
            KeyCode::Down => app.select_next(),
            KeyCode::Char('a') => {
                let name = prompt("Task name");
                let category = prompt("Subject");
                let deadline = prompt("Deadline (DD-MM-YYYY)");
                if let (Some(name), Some(category), Some(deadline)) = (name, category, deadline) {
                    app.add(&name, &category, &deadline);
                }
                terminal.clear()?;
            }
            KeyCode::Char('e') => {
                if let Some(id) = prompt("Task ID to edit (Enter for selected)") {
                    println!("(leave a field empty to keep it)");
                    let name = prompt("New task name").unwrap_or_default();
                    let category = prompt("New subject").unwrap_or_default();
                    let deadline = prompt("New deadline (DD-MM-YYYY)").unwrap_or_default();
                    app.edit(&id, &name, &category, &deadline);
                }
                terminal.clear()?;
            }
            KeyCode::Char('d') => {
                if let Some(id) = prompt("Task ID to delete (Enter for selected)") {
                    app.delete(&id);
                }
                terminal.clear()?;
            }
            KeyCode::Char('s') => {
                if let Some(id) = prompt("Task ID (Enter for selected)") {
                    for (i, status) in TaskStatus::ALL.iter().enumerate() {
                        println!("{}. {}", i + 1, status);
                    }
                    if let Some(choice) = prompt("Choose status (1-3)") {
                        app.set_status(&id, &choice);
                    }
                }
                terminal.clear()?;
            }
            KeyCode::Char('/') => {
                if let Some(keyword) = prompt("Search keyword") {
                    app.search(&keyword);
                }
                terminal.clear()?;
            }
            KeyCode::Char('c') => app.clear_search(),
            KeyCode::Char('o') => app.toggle_order(),
            _ => {}
        }
    }
}

fn draw(f: &mut Frame, app: &App, today: NaiveDate) {
    let upcoming = app.upcoming(today);
    let banner_height = if upcoming.is_empty() {
        0
    } else {
        upcoming.len().min(5) as u16 + 2
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(banner_height),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    if !upcoming.is_empty() {
        let lines: Vec<Line> = upcoming
            .iter()
            .take(5)
            .map(|u| {
                let when = match u.days_left {
                    0 => "today".to_string(),
                    1 => "tomorrow".to_string(),
                    n => format!("in {n} days"),
                };
                Line::from(vec![
                    Span::raw(format!("[#{}] ", u.task.id)),
                    Span::styled(&u.task.name, Style::default().fg(Color::White)),
                    Span::raw(format!(" ({}) due {when}", u.task.category)),
                ])
            })
            .collect();
        let banner = Paragraph::new(lines).block(
            Block::default()
                .title(format!("Due within {} days", app.window_days))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
        f.render_widget(banner, chunks[0]);
    }

    let tasks = app.visible_tasks();
    let rows: Vec<Row> = tasks
        .iter()
        .map(|t| {
            Row::new(vec![
                Cell::from(t.id.to_string()),
                Cell::from(t.name.clone()),
                Cell::from(t.category.clone()),
                Cell::from(t.deadline_text()),
                Cell::from(t.status.label()).style(Style::default().fg(status_color(t.status))),
            ])
        })
        .collect();

    let title = match &app.filter {
        Some(keyword) => format!("Search: {keyword}"),
        None if app.by_id => "Tasks by ID".to_string(),
        None => "Tasks by deadline".to_string(),
    };
    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(40),
            Constraint::Percentage(25),
            Constraint::Length(12),
            Constraint::Length(18),
        ],
    )
    .header(
        Row::new(vec!["ID", "Task", "Subject", "Deadline", "Status"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().title(title).borders(Borders::ALL))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    if !tasks.is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(table, chunks[1], &mut state);

    let status_line = match &app.message {
        Some(Message::Info(text)) => Line::styled(text.as_str(), Style::default().fg(Color::Green)),
        Some(Message::Error(text)) => Line::styled(text.as_str(), Style::default().fg(Color::Red)),
        None if tasks.is_empty() => Line::raw("No tasks yet. Press 'a' to add one."),
        None => Line::raw(""),
    };
    f.render_widget(Paragraph::new(status_line), chunks[2]);
    f.render_widget(
        Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );

    if let Some(task) = &app.detail {
        let area = centered(60, 10, f.area());
        let lines = vec![
            Line::from(format!("ID:       {}", task.id)),
            Line::from(format!("Task:     {}", task.name)),
            Line::from(format!("Subject:  {}", task.category)),
            Line::from(format!("Deadline: {}", task.deadline_text())),
            Line::from(format!("Status:   {}", task.status)),
            Line::from(format!("Created:  {}", task.created_at_text())),
        ];
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .title("Task details")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            ),
            area,
        );
    }
}

fn status_color(status: TaskStatus) -> Color {
    tui_color(cli::status_color(status))
}

/// Translates a table colour from the command-line renderer for the board.
fn tui_color(color: comfy_table::Color) -> Color {
    use comfy_table::Color as TableColor;
    match color {
        TableColor::Red | TableColor::DarkRed => Color::Red,
        TableColor::Green | TableColor::DarkGreen => Color::Green,
        TableColor::Yellow | TableColor::DarkYellow => Color::Yellow,
        TableColor::Blue | TableColor::DarkBlue => Color::Blue,
        TableColor::Magenta | TableColor::DarkMagenta => Color::Magenta,
        TableColor::Cyan | TableColor::DarkCyan => Color::Cyan,
        TableColor::White => Color::White,
        TableColor::Grey | TableColor::DarkGrey => Color::Gray,
        TableColor::Black => Color::Black,
        _ => Color::Reset,
    }
}

fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn prompt(message: &str) -> Option<String> {
    disable_raw_mode().ok();
    println!("{}: ", message);
    let mut input = String::new();
    let result = io::stdin().read_line(&mut input);
    enable_raw_mode().ok();
    match result {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task_store::TaskStore;
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_draw_shows_tasks_and_reminder() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = TaskStore::open(temp_dir.path().join("tasks.json"));
        store.add("Quiz", "Biology", "02-06-2024").unwrap();
        store.add("Essay", "History", "30-06-2024").unwrap();
        let app = App::new(store, 3);

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        terminal.draw(|f| draw(f, &app, today)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Due within 3 days"));
        assert!(text.contains("due tomorrow"));
        assert!(text.contains("Essay"));
        assert!(text.contains("Belum Selesai"));
    }

    #[test]
    fn test_draw_empty_board() {
        let temp_dir = TempDir::new().unwrap();
        let app = App::new(TaskStore::open(temp_dir.path().join("tasks.json")), 3);

        let mut terminal = Terminal::new(TestBackend::new(100, 10)).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        terminal.draw(|f| draw(f, &app, today)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("No tasks yet"));
        assert!(!text.contains("Due within"));
    }

    #[test]
    fn test_status_colors_follow_table_colors() {
        assert_eq!(status_color(TaskStatus::NotStarted), Color::Yellow);
        assert_eq!(status_color(TaskStatus::InProgress), Color::Cyan);
        assert_eq!(status_color(TaskStatus::Done), Color::Green);
    }

    #[test]
    fn test_centered_fits_small_area() {
        let area = Rect::new(0, 0, 40, 6);
        let popup = centered(60, 10, area);
        assert_eq!(popup, Rect::new(0, 0, 40, 6));
    }
}
