use chrono::{Local, NaiveDate, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};

use crate::errors::{TaskError, TaskResult};

pub const DATE_FORMAT: &str = "%d-%m-%Y";
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "Belum Selesai")]
    NotStarted,
    #[serde(rename = "Sedang Dikerjakan")]
    InProgress,
    #[serde(rename = "Selesai")]
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::NotStarted, Self::InProgress, Self::Done];

    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Belum Selesai",
            Self::InProgress => "Sedang Dikerjakan",
            Self::Done => "Selesai",
        }
    }

    /// Maps a status menu choice ("1".."3") to a status.
    pub fn from_choice(choice: &str) -> TaskResult<Self> {
        match choice.trim() {
            "1" => Ok(Self::NotStarted),
            "2" => Ok(Self::InProgress),
            "3" => Ok(Self::Done),
            other => Err(TaskError::InvalidStatus {
                status: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "belum selesai" | "not-started" | "notstarted" | "not_started" | "todo" => {
                Ok(Self::NotStarted)
            }
            "sedang dikerjakan" | "in-progress" | "inprogress" | "in_progress" | "doing" => {
                Ok(Self::InProgress)
            }
            "selesai" | "done" | "completed" => Ok(Self::Done),
            _ => Err(TaskError::InvalidStatus {
                status: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u32,
    #[serde(rename = "nama_tugas")]
    pub name: String,
    #[serde(rename = "mata_pelajaran")]
    pub category: String,
    #[serde(with = "date_format")]
    pub deadline: NaiveDate,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(rename = "tanggal_dibuat", with = "timestamp_format")]
    pub created_at: NaiveDateTime,
}

impl Task {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        category: impl Into<String>,
        deadline: NaiveDate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            deadline,
            status: TaskStatus::NotStarted,
            // whole seconds, matching the on-disk timestamp
            created_at: Local::now().naive_local().trunc_subsecs(0),
        }
    }

    pub fn deadline_text(&self) -> String {
        self.deadline.format(DATE_FORMAT).to_string()
    }

    pub fn created_at_text(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Case-insensitive match against name or category. `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.category.to_lowercase().contains(needle)
    }
}

/// Parses a `DD-MM-YYYY` deadline, rejecting impossible dates such as 31-02.
pub fn parse_deadline(text: &str) -> TaskResult<NaiveDate> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| TaskError::InvalidDateFormat {
        input: trimmed.to_string(),
    })
}

mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
