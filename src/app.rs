//! State behind the interactive board. Tasks live in the store; this only
//! tracks what the user is looking at and the outcome of the last action.

use chrono::NaiveDate;
use tracing::debug;

use crate::cli::{parse_status_arg, require};
use crate::errors::{TaskError, TaskResult};
use crate::task::Task;
use crate::task_store::{TaskStore, Upcoming};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Info(String),
    Error(String),
}

#[derive(Debug)]
pub struct App {
    pub store: TaskStore,
    pub window_days: i64,
    pub selected: usize,
    pub filter: Option<String>,
    /// Show stored (ID) order instead of deadline order.
    pub by_id: bool,
    pub message: Option<Message>,
    pub detail: Option<Task>,
}

impl App {
    pub fn new(store: TaskStore, window_days: i64) -> Self {
        Self {
            store,
            window_days,
            selected: 0,
            filter: None,
            by_id: false,
            message: None,
            detail: None,
        }
    }

    /// Rows currently on screen: search results when a filter is set,
    /// otherwise every task by deadline or by ID.
    pub fn visible_tasks(&self) -> Vec<Task> {
        match &self.filter {
            Some(keyword) => self.store.search(keyword),
            None if self.by_id => self.store.list_by_id(),
            None => self.store.list(),
        }
    }

    pub fn toggle_order(&mut self) {
        self.by_id = !self.by_id;
        self.selected = 0;
    }

    pub fn upcoming(&self, today: NaiveDate) -> Vec<Upcoming> {
        self.store.upcoming(self.window_days, today)
    }

    pub fn selected_task(&self) -> Option<Task> {
        self.visible_tasks().into_iter().nth(self.selected)
    }

    pub fn select_next(&mut self) {
        let count = self.visible_tasks().len();
        if count > 0 && self.selected < count - 1 {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_tasks().len();
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }
    }

    /// Blank input means the highlighted row; anything else must be a number.
    pub fn resolve_id(&self, input: &str) -> TaskResult<u32> {
        let input = input.trim();
        if input.is_empty() {
            return self
                .selected_task()
                .map(|t| t.id)
                .ok_or_else(|| TaskError::EmptyField {
                    field: "Task ID".to_string(),
                });
        }
        input.parse().map_err(|_| TaskError::InvalidId {
            input: input.to_string(),
        })
    }

    pub fn add(&mut self, name: &str, category: &str, deadline: &str) {
        let result = self.try_add(name, category, deadline);
        self.report(result.map(|t| format!("Task '{}' added with ID {}", t.name, t.id)));
    }

    fn try_add(&mut self, name: &str, category: &str, deadline: &str) -> TaskResult<Task> {
        let name = require("Task name", name)?;
        let category = require("Category", category)?;
        let deadline = require("Deadline", deadline)?;
        self.store.add(name, category, deadline)
    }

    pub fn edit(&mut self, id_input: &str, name: &str, category: &str, deadline: &str) {
        let result = self.resolve_id(id_input).and_then(|id| {
            self.store
                .edit(id, Some(name), Some(category), Some(deadline))
        });
        self.report(result.map(|t| format!("Task {} updated", t.id)));
    }

    pub fn delete(&mut self, id_input: &str) {
        let result = self
            .resolve_id(id_input)
            .and_then(|id| self.store.delete(id));
        self.report(result.map(|name| format!("Task '{name}' deleted")));
        self.detail = None;
    }

    pub fn set_status(&mut self, id_input: &str, choice: &str) {
        let result = self.resolve_id(id_input).and_then(|id| {
            let status = parse_status_arg(choice)?;
            self.store.set_task_status(id, status)
        });
        self.report(result.map(|t| format!("Status of '{}' changed to '{}'", t.name, t.status)));
    }

    pub fn search(&mut self, keyword: &str) {
        match require("Keyword", keyword) {
            Ok(keyword) => {
                let hits = self.store.search(keyword).len();
                self.filter = Some(keyword.to_string());
                self.selected = 0;
                let message = if hits == 0 {
                    format!("No tasks match '{keyword}'")
                } else {
                    format!("{hits} task(s) match '{keyword}'")
                };
                self.message = Some(Message::Info(message));
            }
            Err(err) => self.message = Some(Message::Error(err.to_string())),
        }
    }

    pub fn clear_search(&mut self) {
        self.filter = None;
        self.selected = 0;
        self.message = None;
    }

    pub fn toggle_detail(&mut self) {
        self.detail = match self.detail {
            Some(_) => None,
            None => self.selected_task(),
        };
    }

    fn report(&mut self, result: TaskResult<String>) {
        self.message = Some(match result {
            Ok(text) => Message::Info(text),
            Err(err) => {
                debug!(error = %err, "board action failed");
                Message::Error(err.to_string())
            }
        });
        if let Some(id) = self.detail.as_ref().map(|t| t.id) {
            self.detail = self.store.find_by_id(id).ok();
        }
        self.clamp_selection();
    }
}
