use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use weekplan::commands::*;
use weekplan::models::{Category, FilterOptions, Priority, Weekday};
use weekplan::repository::TaskRepository;
use weekplan::storage::TaskStore;

fn with_test_db<F>(f: F)
where
    F: FnOnce(&mut TaskRepository, &TaskStore, PathBuf),
{
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("tasks.json");
    let store = TaskStore::new(&db_path);
    let mut repo = TaskRepository::open(store.clone());

    f(&mut repo, &store, dir.path().to_path_buf());
}

#[test]
fn test_add_and_list() {
    with_test_db(|repo, store, _dir| {
        cmd_add(repo, "Test Task".into(), Some(Weekday::Tuesday), Some(Category::Work), Some(Priority::High), None, None, true);

        let tasks = store.load();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Test Task");
        assert_eq!(tasks[0].category, Category::Work);
        assert_eq!(tasks[0].weekday, Weekday::Tuesday);
        assert!(!tasks[0].is_weekend);
    });
}

#[test]
fn test_add_defaults_category_from_weekday() {
    with_test_db(|repo, store, _dir| {
        cmd_add(repo, "Picnic".into(), Some(Weekday::Saturday), None, None, None, None, true);
        cmd_add(repo, "Standup".into(), Some(Weekday::Monday), None, None, None, None, true);

        let tasks = store.load();
        assert_eq!(tasks[0].category, Category::WeekendFun);
        assert!(tasks[0].is_weekend);
        assert_eq!(tasks[0].priority, Priority::Medium);
        assert_eq!(tasks[1].category, Category::Work);
    });
}

#[test]
fn test_add_rejects_blank_title_and_bad_due_date() {
    with_test_db(|repo, store, _dir| {
        cmd_add(repo, "   ".into(), Some(Weekday::Monday), None, None, None, None, true);
        cmd_add(repo, "Report".into(), Some(Weekday::Monday), None, None, None, Some("next week".into()), true);

        assert!(store.load().is_empty());
        assert!(repo.is_empty());
    });
}

#[test]
fn test_toggle_task_by_suffix() {
    with_test_db(|repo, store, _dir| {
        cmd_add(repo, "Task to complete".into(), Some(Weekday::Friday), None, None, None, None, true);
        let id = repo.tasks()[0].id.clone();
        let suffix = &id[id.len() - 9..];

        cmd_toggle(repo, suffix, true);
        assert!(store.load()[0].completed);

        cmd_toggle(repo, &id, true);
        assert!(!store.load()[0].completed);
    });
}

#[test]
fn test_edit_task() {
    with_test_db(|repo, store, _dir| {
        cmd_add(repo, "Draft".into(), Some(Weekday::Monday), None, None, Some("notes".into()), Some("2025-12-01".into()), true);
        let id = repo.tasks()[0].id.clone();

        cmd_edit(repo, &id, Some("Final".into()), Some("".into()), Some(Category::Health), None, Some(Weekday::Sunday), Some("".into()), true);

        let task = &store.load()[0];
        assert_eq!(task.title, "Final");
        assert_eq!(task.description, None);
        assert_eq!(task.category, Category::Health);
        assert_eq!(task.weekday, Weekday::Sunday);
        assert_eq!(task.due_date, None);
        // stored weekend flag keeps its creation-time value
        assert!(!task.is_weekend);
    });
}

#[test]
fn test_remove_and_clear_completed() {
    with_test_db(|repo, store, _dir| {
        cmd_add(repo, "One".into(), Some(Weekday::Monday), None, None, None, None, true);
        cmd_add(repo, "Two".into(), Some(Weekday::Monday), None, None, None, None, true);
        cmd_add(repo, "Three".into(), Some(Weekday::Monday), None, None, None, None, true);
        let ids: Vec<String> = repo.tasks().iter().map(|t| t.id.clone()).collect();

        cmd_remove(repo, &ids[0], true);
        cmd_remove(repo, "no-such-task", true);
        assert_eq!(store.load().len(), 2);

        cmd_toggle(repo, &ids[1], true);
        cmd_clear_completed(repo, true);

        let tasks = store.load();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Three");
    });
}

#[test]
fn test_list_view_groups_by_weekday() {
    with_test_db(|repo, _store, _dir| {
        cmd_add(repo, "Sunday chores".into(), Some(Weekday::Sunday), Some(Category::Family), None, None, None, true);
        cmd_add(repo, "Monday low".into(), Some(Weekday::Monday), None, Some(Priority::Low), None, None, true);
        cmd_add(repo, "Monday high".into(), Some(Weekday::Monday), None, Some(Priority::High), None, None, true);

        let titles: Vec<String> = list_view(repo, &FilterOptions::default()).into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Monday high", "Monday low", "Sunday chores"]);

        let weekend = FilterOptions { show_weekend_only: Some(true), ..FilterOptions::default() };
        let titles: Vec<String> = list_view(repo, &weekend).into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Sunday chores"]);
    });
}

#[test]
fn test_export_import_roundtrip() {
    with_test_db(|repo, store, dir| {
        cmd_add(repo, "Keep me".into(), Some(Weekday::Wednesday), None, None, None, Some("2025-06-04".into()), true);
        let export_path = dir.join("export.json");
        cmd_export(repo, Some(export_path.as_path()), true);
        let exported = repo.tasks().to_vec();

        cmd_reset(repo, true);
        assert!(store.load().is_empty());

        cmd_import(repo, &export_path, true);
        assert_eq!(store.load(), exported);
    });
}

#[test]
fn test_import_rejects_non_array() {
    with_test_db(|repo, store, dir| {
        cmd_add(repo, "Existing".into(), Some(Weekday::Monday), None, None, None, None, true);
        let bad = dir.join("bad.json");
        fs::write(&bad, r#"{"tasks": []}"#).unwrap();

        cmd_import(repo, &bad, true);

        assert_eq!(store.load().len(), 1);
        assert_eq!(repo.tasks()[0].title, "Existing");
    });
}

#[test]
fn test_import_with_duplicate_ids_keeps_existing_tasks() {
    with_test_db(|repo, store, dir| {
        cmd_add(repo, "Existing".into(), Some(Weekday::Monday), None, None, None, None, true);
        let dup = dir.join("dup.json");
        let record = r#"{"id":"task_1_dup","title":"Twin","category":"work","weekday":"monday","priority":"low","isWeekend":false,"createdAt":"2025-01-01T00:00:00.000Z"}"#;
        fs::write(&dup, format!("[{},{},{}]", record, record, record)).unwrap();

        cmd_import(repo, &dup, true);

        assert_eq!(store.load().len(), 1);
        assert_eq!(repo.tasks()[0].title, "Existing");
    });
}

#[test]
fn test_parse_due() {
    let due = parse_due("2025-12-01").unwrap();
    assert_eq!(weekplan::timestamp::format(&due), "2025-12-01T00:00:00.000Z");
    assert!(parse_due("12/01/2025").is_err());
}
