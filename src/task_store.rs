//! The task collection and its JSON file persistence.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::errors::{TaskError, TaskResult};
use crate::task::{parse_deadline, Task, TaskStatus};

/// A task that is due inside the reminder window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upcoming {
    pub task: Task,
    pub days_left: i64,
}

/// Owns the ordered task list. Every mutation is written back to `path`.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            path: path.into(),
            tasks: Vec::new(),
        };
        store.load();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Replaces the in-memory list with the file contents. A missing or
    /// unreadable file leaves the store empty.
    pub fn load(&mut self) {
        self.tasks = match self.read_file() {
            Ok(Some(tasks)) => tasks,
            Ok(None) => {
                debug!(path = %self.path.display(), "no task file yet, starting empty");
                Vec::new()
            }
            Err(err) => {
                warn!(error = %err, "task file could not be loaded, starting empty");
                Vec::new()
            }
        };

        let dense = self
            .tasks
            .iter()
            .enumerate()
            .all(|(i, t)| t.id as usize == i + 1);
        if !dense {
            warn!(path = %self.path.display(), "task ids were not sequential, renumbering");
            self.renumber();
        }
        debug!(count = self.tasks.len(), "loaded tasks");
    }

    fn read_file(&self) -> TaskResult<Option<Vec<Task>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let read_error = |reason: String| TaskError::PersistenceRead {
            path: self.path.display().to_string(),
            reason,
        };
        let data = fs::read_to_string(&self.path).map_err(|e| read_error(e.to_string()))?;
        let tasks = serde_json::from_str(&data).map_err(|e| read_error(e.to_string()))?;
        Ok(Some(tasks))
    }

    /// Rewrites the whole file through a temporary sibling and a rename.
    pub fn save(&self) -> TaskResult<()> {
        let write_error = |reason: String| TaskError::PersistenceWrite {
            path: self.path.display().to_string(),
            reason,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }

        let data = serde_json::to_string_pretty(&self.tasks).map_err(|e| write_error(e.to_string()))?;
        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, data).map_err(|e| write_error(e.to_string()))?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_error(e.to_string()));
        }
        debug!(path = %self.path.display(), count = self.tasks.len(), "saved tasks");
        Ok(())
    }

    /// Keeps the current list if it could be written, otherwise puts
    /// `previous` back and returns the write error.
    fn commit(&mut self, previous: Vec<Task>) -> TaskResult<()> {
        if let Err(err) = self.save() {
            warn!(error = %err, "save failed, change rolled back");
            self.tasks = previous;
            return Err(err);
        }
        Ok(())
    }

    pub fn add(&mut self, name: &str, category: &str, deadline_text: &str) -> TaskResult<Task> {
        let deadline = parse_deadline(deadline_text)?;
        let task = Task::new(
            self.tasks.len() as u32 + 1,
            name.trim(),
            category.trim(),
            deadline,
        );
        let previous = self.tasks.clone();
        self.tasks.push(task.clone());
        self.commit(previous)?;
        info!(id = task.id, name = %task.name, "added task");
        Ok(task)
    }

    /// All tasks ordered by deadline. Equal deadlines keep their stored order.
    pub fn list(&self) -> Vec<Task> {
        let mut tasks = self.tasks.clone();
        tasks.sort_by_key(|t| t.deadline);
        tasks
    }

    /// All tasks in stored order, which is also id order.
    pub fn list_by_id(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn find_by_id(&self, id: u32) -> TaskResult<Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(TaskError::NotFound { id })
    }

    /// Updates the given fields. Blank fields are left alone. Nothing changes
    /// unless every supplied field is valid.
    pub fn edit(
        &mut self,
        id: u32,
        name: Option<&str>,
        category: Option<&str>,
        deadline_text: Option<&str>,
    ) -> TaskResult<Task> {
        let index = self.index_of(id)?;
        let deadline = match non_blank(deadline_text) {
            Some(text) => Some(parse_deadline(text)?),
            None => None,
        };

        let previous = self.tasks.clone();
        let task = &mut self.tasks[index];
        if let Some(name) = non_blank(name) {
            task.name = name.to_string();
        }
        if let Some(category) = non_blank(category) {
            task.category = category.to_string();
        }
        if let Some(deadline) = deadline {
            task.deadline = deadline;
        }
        let updated = task.clone();
        self.commit(previous)?;
        info!(id, "edited task");
        Ok(updated)
    }

    /// Removes a task and renumbers the rest. Returns the removed task's name.
    pub fn delete(&mut self, id: u32) -> TaskResult<String> {
        let index = self.index_of(id)?;
        let previous = self.tasks.clone();
        let removed = self.tasks.remove(index);
        self.renumber();
        self.commit(previous)?;
        info!(id, name = %removed.name, "deleted task");
        Ok(removed.name)
    }

    pub fn set_status(&mut self, id: u32, status: &str) -> TaskResult<Task> {
        let status: TaskStatus = status.parse()?;
        self.set_task_status(id, status)
    }

    pub fn set_task_status(&mut self, id: u32, status: TaskStatus) -> TaskResult<Task> {
        let index = self.index_of(id)?;
        let previous = self.tasks.clone();
        self.tasks[index].status = status;
        let updated = self.tasks[index].clone();
        self.commit(previous)?;
        info!(id, status = %status, "changed task status");
        Ok(updated)
    }

    /// Tasks whose name or category contains `keyword`, ignoring case,
    /// ordered by deadline.
    pub fn search(&self, keyword: &str) -> Vec<Task> {
        let needle = keyword.to_lowercase();
        let mut results: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| t.matches(&needle))
            .cloned()
            .collect();
        results.sort_by_key(|t| t.deadline);
        results
    }

    /// Unfinished tasks due between `reference` and `window_days` days after
    /// it, soonest first.
    pub fn upcoming(&self, window_days: i64, reference: NaiveDate) -> Vec<Upcoming> {
        let mut due: Vec<Upcoming> = self
            .tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Done)
            .filter_map(|t| {
                let days_left = (t.deadline - reference).num_days();
                (0..=window_days).contains(&days_left).then(|| Upcoming {
                    task: t.clone(),
                    days_left,
                })
            })
            .collect();
        due.sort_by_key(|u| u.days_left);
        due
    }

    fn index_of(&self, id: u32) -> TaskResult<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TaskError::NotFound { id })
    }

    fn renumber(&mut self) {
        for (i, task) in self.tasks.iter_mut().enumerate() {
            task.id = i as u32 + 1;
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
