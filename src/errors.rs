//! Error types for the task store and its console callers.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Invalid date '{input}', expected DD-MM-YYYY")]
    InvalidDateFormat { input: String },

    #[error("Task with ID {id} not found")]
    NotFound { id: u32 },

    #[error("Invalid status '{status}', choose one of: Belum Selesai, Sedang Dikerjakan, Selesai")]
    InvalidStatus { status: String },

    #[error("ID must be a number, got '{input}'")]
    InvalidId { input: String },

    #[error("{field} cannot be empty")]
    EmptyField { field: String },

    #[error("Failed to read '{path}': {reason}")]
    PersistenceRead { path: String, reason: String },

    #[error("Failed to write '{path}': {reason}")]
    PersistenceWrite { path: String, reason: String },
}

pub type TaskResult<T> = Result<T, TaskError>;
