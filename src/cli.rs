//! Command-line surface: argument parsing and one-shot commands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use crate::config::{Config, DEFAULT_DATA_FILE, DEFAULT_WINDOW_DAYS};
use crate::errors::{TaskError, TaskResult};
use crate::task::{Task, TaskStatus};
use crate::task_store::{TaskStore, Upcoming};

#[derive(Parser, Debug)]
#[command(name = "todolist")]
#[command(about = "Keep track of school tasks and their deadlines", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Task file
    #[arg(long, global = true, env = "TODOLIST_FILE", default_value = DEFAULT_DATA_FILE)]
    pub file: PathBuf,

    /// Days ahead to look for upcoming deadlines
    #[arg(
        long,
        global = true,
        env = "TODOLIST_WINDOW_DAYS",
        default_value_t = DEFAULT_WINDOW_DAYS,
        value_parser = clap::value_parser!(i64).range(0..)
    )]
    pub window_days: i64,

    /// Log filter, e.g. "debug" or "todolist=info"
    #[arg(long, global = true, env = "TODOLIST_LOG")]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive board (default)
    Board,

    #[command(flatten)]
    Task(TaskCommand),
}

/// One-shot commands that run against the store and print a result.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    /// Add a new task
    Add {
        #[arg(short, long)]
        name: String,

        /// Subject or category
        #[arg(short, long)]
        category: String,

        /// Due date (DD-MM-YYYY)
        #[arg(short, long)]
        deadline: String,
    },

    /// List all tasks ordered by deadline
    List {
        /// Keep stored (ID) order instead
        #[arg(long)]
        by_id: bool,
    },

    /// Show every field of one task
    Show { id: u32 },

    /// Edit a task; omitted fields stay unchanged
    Edit {
        id: u32,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        /// New due date (DD-MM-YYYY)
        #[arg(short, long)]
        deadline: Option<String>,
    },

    /// Delete a task and renumber the rest
    Delete { id: u32 },

    /// Set task status: 1/2/3, a status name, or todo/doing/done
    Status { id: u32, status: String },

    /// Search task names and subjects
    Search { keyword: String },

    /// Unfinished tasks due within the reminder window
    Upcoming {
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
        days: Option<i64>,
    },
}

/// Rejects blank input for a required field.
pub fn require<'a>(field: &str, value: &'a str) -> TaskResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TaskError::EmptyField {
            field: field.to_string(),
        });
    }
    Ok(value)
}

/// Accepts a status menu number or any recognized status name.
pub fn parse_status_arg(text: &str) -> TaskResult<TaskStatus> {
    TaskStatus::from_choice(text).or_else(|_| text.parse())
}

/// Runs a one-shot command and returns the text to print.
pub fn execute(
    command: TaskCommand,
    store: &mut TaskStore,
    config: &Config,
    today: NaiveDate,
) -> TaskResult<String> {
    match command {
        TaskCommand::Add {
            name,
            category,
            deadline,
        } => {
            let name = require("Task name", &name)?;
            let category = require("Category", &category)?;
            let deadline = require("Deadline", &deadline)?;
            let task = store.add(name, category, deadline)?;
            Ok(success(&format!("Task '{}' added with ID {}", task.name, task.id)))
        }
        TaskCommand::List { by_id } => {
            let tasks = if by_id {
                store.list_by_id()
            } else {
                store.list()
            };
            if tasks.is_empty() {
                return Ok("No tasks yet. Add one with `todolist add`.".to_string());
            }
            Ok(task_table(&tasks).to_string())
        }
        TaskCommand::Show { id } => Ok(detail_table(&store.find_by_id(id)?).to_string()),
        TaskCommand::Edit {
            id,
            name,
            category,
            deadline,
        } => {
            store.edit(id, name.as_deref(), category.as_deref(), deadline.as_deref())?;
            Ok(success(&format!("Task {id} updated")))
        }
        TaskCommand::Delete { id } => {
            let name = store.delete(id)?;
            Ok(success(&format!("Task '{name}' deleted")))
        }
        TaskCommand::Status { id, status } => {
            let status = parse_status_arg(&status)?;
            let task = store.set_task_status(id, status)?;
            Ok(success(&format!(
                "Status of '{}' changed to '{}'",
                task.name, task.status
            )))
        }
        TaskCommand::Search { keyword } => {
            let keyword = require("Keyword", &keyword)?;
            let results = store.search(keyword);
            if results.is_empty() {
                return Ok(format!("No tasks match '{keyword}'"));
            }
            Ok(task_table(&results).to_string())
        }
        TaskCommand::Upcoming { days } => {
            let window = days.unwrap_or(config.window_days);
            let due = store.upcoming(window, today);
            if due.is_empty() {
                return Ok(format!("Nothing due in the next {window} days"));
            }
            // terminal bell as the reminder alert
            Ok(format!("\x07{}", upcoming_table(&due)))
        }
    }
}

fn success(message: &str) -> String {
    format!("{} {}", "✓".green(), message)
}

pub fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::NotStarted => Color::Yellow,
        TaskStatus::InProgress => Color::Cyan,
        TaskStatus::Done => Color::Green,
    }
}

pub fn task_table(tasks: &[Task]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Task").fg(Color::Cyan),
        Cell::new("Subject").fg(Color::Cyan),
        Cell::new("Deadline").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
    ]);

    for task in tasks {
        table.add_row(vec![
            Cell::new(task.id),
            Cell::new(&task.name),
            Cell::new(&task.category),
            Cell::new(task.deadline_text()),
            Cell::new(task.status).fg(status_color(task.status)),
        ]);
    }
    table
}

pub fn detail_table(task: &Task) -> Table {
    let mut table = Table::new();
    table.set_header(vec![Cell::new("Task details").fg(Color::Cyan), Cell::new("")]);
    table.add_row(vec![Cell::new("ID"), Cell::new(task.id)]);
    table.add_row(vec![Cell::new("Task"), Cell::new(&task.name)]);
    table.add_row(vec![Cell::new("Subject"), Cell::new(&task.category)]);
    table.add_row(vec![Cell::new("Deadline"), Cell::new(task.deadline_text())]);
    table.add_row(vec![
        Cell::new("Status"),
        Cell::new(task.status).fg(status_color(task.status)),
    ]);
    table.add_row(vec![Cell::new("Created"), Cell::new(task.created_at_text())]);
    table
}

pub fn upcoming_table(due: &[Upcoming]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Task").fg(Color::Cyan),
        Cell::new("Subject").fg(Color::Cyan),
        Cell::new("Deadline").fg(Color::Cyan),
        Cell::new("Days left").fg(Color::Cyan),
    ]);
    for item in due {
        let color = if item.days_left == 0 { Color::Red } else { Color::Yellow };
        table.add_row(vec![
            Cell::new(item.task.id),
            Cell::new(&item.task.name),
            Cell::new(&item.task.category),
            Cell::new(item.task.deadline_text()),
            Cell::new(item.days_left).fg(color),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, TaskStore, Config) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_file: temp_dir.path().join("tasks.json"),
            ..Config::default()
        };
        let store = TaskStore::open(&config.data_file);
        (temp_dir, store, config)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn run(store: &mut TaskStore, config: &Config, args: &[&str]) -> TaskResult<String> {
        let mut argv = vec!["todolist"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Commands::Task(command)) => execute(command, store, config, today()),
            other => panic!("expected a task command, got {other:?}"),
        }
    }

    #[test]
    fn test_add_and_list() {
        let (_temp, mut store, config) = setup();
        let out = run(
            &mut store,
            &config,
            &["add", "-n", "Essay", "-c", "History", "-d", "10-06-2024"],
        )
        .unwrap();
        assert!(out.contains("Essay"));

        let out = run(&mut store, &config, &["list"]).unwrap();
        assert!(out.contains("History"));
        assert!(out.contains("10-06-2024"));
        assert!(out.contains("Belum Selesai"));
    }

    #[test]
    fn test_add_rejects_blank_name() {
        let (_temp, mut store, config) = setup();
        let err = run(
            &mut store,
            &config,
            &["add", "-n", "  ", "-c", "History", "-d", "10-06-2024"],
        )
        .unwrap_err();
        assert!(matches!(err, TaskError::EmptyField { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_status_accepts_menu_number() {
        let (_temp, mut store, config) = setup();
        store.add("Essay", "History", "10-06-2024").unwrap();

        run(&mut store, &config, &["status", "1", "3"]).unwrap();
        assert_eq!(store.find_by_id(1).unwrap().status, TaskStatus::Done);

        run(&mut store, &config, &["status", "1", "doing"]).unwrap();
        assert_eq!(store.find_by_id(1).unwrap().status, TaskStatus::InProgress);

        let err = run(&mut store, &config, &["status", "1", "7"]).unwrap_err();
        assert!(matches!(err, TaskError::InvalidStatus { .. }));
    }

    #[test]
    fn test_non_numeric_id_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["todolist", "delete", "two"]).is_err());
    }

    #[test]
    fn test_search_requires_keyword() {
        let (_temp, mut store, config) = setup();
        let err = run(&mut store, &config, &["search", ""]).unwrap_err();
        assert!(matches!(err, TaskError::EmptyField { .. }));
    }

    #[test]
    fn test_upcoming_rings_bell_only_when_due() {
        let (_temp, mut store, config) = setup();
        let out = run(&mut store, &config, &["upcoming"]).unwrap();
        assert!(!out.starts_with('\x07'));

        store.add("Quiz", "Biology", "02-06-2024").unwrap();
        let out = run(&mut store, &config, &["upcoming"]).unwrap();
        assert!(out.starts_with('\x07'));
        assert!(out.contains("Quiz"));
    }

    #[test]
    fn test_show_missing_task() {
        let (_temp, mut store, config) = setup();
        assert_eq!(
            run(&mut store, &config, &["show", "4"]),
            Err(TaskError::NotFound { id: 4 })
        );
    }

    #[test]
    fn test_list_by_id_keeps_stored_order() {
        let (_temp, mut store, config) = setup();
        store.add("Late", "History", "20-06-2024").unwrap();
        store.add("Early", "Biology", "01-06-2024").unwrap();

        let sorted = run(&mut store, &config, &["list"]).unwrap();
        assert!(sorted.find("Early").unwrap() < sorted.find("Late").unwrap());

        let by_id = run(&mut store, &config, &["list", "--by-id"]).unwrap();
        assert!(by_id.find("Late").unwrap() < by_id.find("Early").unwrap());
    }

    #[test]
    fn test_board_is_not_a_task_command() {
        let cli = Cli::try_parse_from(["todolist", "board"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Board));
    }

    #[test]
    fn test_no_subcommand_means_board() {
        let cli = Cli::try_parse_from(["todolist"]).unwrap();
        assert!(cli.command.is_none());
    }
}
