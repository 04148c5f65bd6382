//! Personal task tracker: a JSON-backed task store with a command-line and
//! terminal board front end.

pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
pub mod task;
pub mod task_store;
pub mod ui;

pub use errors::{TaskError, TaskResult};
pub use task::{Task, TaskStatus};
pub use task_store::{TaskStore, Upcoming};
