use std::fs;

use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use weekplan::error::StoreError;
use weekplan::models::{Category, NewTask, Priority, Weekday};
use weekplan::repository::TaskRepository;
use weekplan::storage::{export_tasks, import_tasks, TaskStore};

fn sample_repo() -> TaskRepository {
    let mut repo = TaskRepository::new();
    repo.add(
        NewTask::new("Farmers market", Weekday::Saturday)
            .category(Category::Shopping)
            .priority(Priority::High)
            .description("bring bags")
            .due(Utc.with_ymd_and_hms(2025, 3, 8, 9, 30, 0).unwrap()),
    )
    .unwrap();
    repo.add(NewTask::new("Expense report", Weekday::Monday).category(Category::Work).completed(true))
        .unwrap();
    repo
}

#[test]
fn save_then_load_roundtrips() {
    let dir = tempdir().expect("tempdir");
    let store = TaskStore::new(dir.path().join("tasks.json"));
    let repo = sample_repo();

    store.save(repo.tasks());
    let loaded = store.load();

    assert_eq!(loaded, repo.tasks());
}

#[test]
fn stored_record_shape() {
    let dir = tempdir().expect("tempdir");
    let store = TaskStore::new(dir.path().join("tasks.json"));
    store.save(sample_repo().tasks());

    let raw = fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &value[0];
    assert_eq!(first["category"], "shopping");
    assert_eq!(first["weekday"], "saturday");
    assert_eq!(first["priority"], "high");
    assert_eq!(first["isWeekend"], true);
    assert_eq!(first["dueDate"], "2025-03-08T09:30:00.000Z");
    assert!(first["createdAt"].as_str().unwrap().ends_with('Z'));
    assert!(value[1].get("dueDate").is_none());
    assert!(value[1].get("description").is_none());
}

#[test]
fn load_missing_slot_is_empty() {
    let dir = tempdir().expect("tempdir");
    let store = TaskStore::new(dir.path().join("absent.json"));
    assert!(store.load().is_empty());
}

#[test]
fn load_fails_open_on_corrupt_data() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("tasks.json");
    let store = TaskStore::new(&path);

    fs::write(&path, "{not json").unwrap();
    assert!(store.load().is_empty());

    fs::write(&path, r#"[{"id":"x","title":"t","category":"chores","weekday":"monday","priority":"low","isWeekend":false,"createdAt":"2025-01-01T00:00:00.000Z"}]"#).unwrap();
    assert!(store.load().is_empty());

    fs::write(&path, r#"[{"id":"x","title":"t","category":"work","weekday":"monday","priority":"low","isWeekend":false,"createdAt":"yesterday"}]"#).unwrap();
    assert!(store.load().is_empty());
}

#[test]
fn save_and_clear_swallow_failures() {
    let dir = tempdir().expect("tempdir");
    let store = TaskStore::new(dir.path().join("missing-dir").join("tasks.json"));

    store.save(sample_repo().tasks());
    store.clear();
    assert!(store.load().is_empty());
}

#[test]
fn clear_removes_the_slot() {
    let dir = tempdir().expect("tempdir");
    let store = TaskStore::new(dir.path().join("tasks.json"));
    store.save(sample_repo().tasks());
    assert_eq!(store.load().len(), 2);

    store.clear();
    assert!(!store.path().exists());
    assert!(store.load().is_empty());
}

#[test]
fn export_uses_canonical_timestamps_and_imports_back() {
    let repo = sample_repo();
    let text = export_tasks(repo.tasks()).unwrap();

    assert!(text.contains('\n'));
    assert!(text.contains("\"dueDate\": \"2025-03-08T09:30:00.000Z\""));

    let imported = import_tasks(&text).unwrap();
    assert_eq!(imported, repo.tasks());
}

#[test]
fn import_requires_an_array() {
    assert!(matches!(import_tasks(r#"{"id": "x"}"#), Err(StoreError::InvalidFormat)));
    assert!(matches!(import_tasks("\"not an array\""), Err(StoreError::InvalidFormat)));
    assert!(matches!(import_tasks("not json"), Err(StoreError::Parse(_))));
    assert!(import_tasks("[]").unwrap().is_empty());
}

#[test]
fn import_reconstructs_dates() {
    let text = r#"[
        {
            "id": "task_1_abc",
            "title": "Hike",
            "category": "weekend-fun",
            "weekday": "sunday",
            "priority": "medium",
            "isWeekend": true,
            "createdAt": "2025-03-01T10:00:00+02:00",
            "dueDate": ""
        }
    ]"#;
    let tasks = import_tasks(text).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].created_at, Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap());
    assert_eq!(tasks[0].due_date, None);
    assert!(!tasks[0].completed);
    assert_eq!(tasks[0].category, Category::WeekendFun);
}

#[test]
fn import_rejects_unknown_keys() {
    let text = r#"[{"id":"x","title":"t","category":"work","weekday":"funday","priority":"low","isWeekend":false,"createdAt":"2025-01-01T00:00:00.000Z"}]"#;
    assert!(matches!(import_tasks(text), Err(StoreError::Parse(_))));
}

fn record(id: &str, title: &str) -> String {
    format!(
        r#"{{"id":"{}","title":"{}","category":"work","weekday":"monday","priority":"low","isWeekend":false,"createdAt":"2025-01-01T00:00:00.000Z"}}"#,
        id, title
    )
}

#[test]
fn import_rejects_duplicate_ids() {
    let text = format!("[{},{},{}]", record("task_1_a", "One"), record("task_1_b", "Two"), record("task_1_a", "Three"));
    match import_tasks(&text) {
        Err(StoreError::DuplicateId(id)) => assert_eq!(id, "task_1_a"),
        other => panic!("expected duplicate id error, got {:?}", other),
    }
}

#[test]
fn import_rejects_blank_titles() {
    let text = format!("[{},{}]", record("task_1_a", "One"), record("task_1_b", "  "));
    match import_tasks(&text) {
        Err(StoreError::BlankTitle(id)) => assert_eq!(id, "task_1_b"),
        other => panic!("expected blank title error, got {:?}", other),
    }
}

#[test]
fn create_parent_dir_lets_saves_land() {
    let dir = tempdir().expect("tempdir");
    let store = TaskStore::new(dir.path().join("nested").join("deeper").join("tasks.json"));

    store.create_parent_dir().unwrap();
    store.save(sample_repo().tasks());
    assert_eq!(store.load().len(), 2);

    store.create_parent_dir().unwrap();
    assert_eq!(store.load().len(), 2);
}
