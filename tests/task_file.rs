use std::fs;

use chrono::NaiveDate;
use tempfile::TempDir;
use todolist::{TaskError, TaskStatus, TaskStore};

#[test]
fn test_store_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data").join("tasks.json");

    {
        let mut store = TaskStore::open(&path);
        store.add("Essay", "History", "10-06-2024").unwrap();
        store.add("Worksheet", "Mathematics", "03-06-2024").unwrap();
        store.add("Poster", "Art", "05-06-2024").unwrap();
        store.set_status(2, "Sedang Dikerjakan").unwrap();
        store.delete(1).unwrap();
    }

    let store = TaskStore::open(&path);
    let tasks = store.list();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, 1);
    assert_eq!(tasks[0].name, "Worksheet");
    assert_eq!(tasks[0].status, TaskStatus::InProgress);
    assert_eq!(tasks[1].id, 2);
    assert_eq!(tasks[1].name, "Poster");

    let due = store.upcoming(3, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].task.name, "Worksheet");
    assert_eq!(due[0].days_left, 2);
}

#[test]
fn test_reads_file_written_by_hand() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tasks.json");
    fs::write(
        &path,
        r#"[
  {
    "id": 1,
    "nama_tugas": "Makalah",
    "mata_pelajaran": "Sejarah",
    "deadline": "15-08-2024",
    "status": "Selesai",
    "tanggal_dibuat": "01-08-2024 19:30:05"
  }
]"#,
    )
    .unwrap();

    let mut store = TaskStore::open(&path);
    let task = store.find_by_id(1).unwrap();
    assert_eq!(task.category, "Sejarah");
    assert_eq!(task.status, TaskStatus::Done);
    assert_eq!(task.created_at_text(), "01-08-2024 19:30:05");

    store.edit(1, Some("Makalah revisi"), None, None).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[0]["nama_tugas"], "Makalah revisi");
    assert_eq!(raw[0]["tanggal_dibuat"], "01-08-2024 19:30:05");
    assert_eq!(raw[0]["status"], "Selesai");
}

#[test]
fn test_every_failure_kind_is_distinct() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = TaskStore::open(temp_dir.path().join("tasks.json"));
    store.add("Essay", "History", "10-06-2024").unwrap();

    assert!(matches!(
        store.add("Quiz", "Biology", "31-02-2025"),
        Err(TaskError::InvalidDateFormat { .. })
    ));
    assert!(matches!(store.delete(42), Err(TaskError::NotFound { id: 42 })));
    assert!(matches!(
        store.set_status(1, "maybe"),
        Err(TaskError::InvalidStatus { .. })
    ));
    assert_eq!(store.len(), 1);
}
