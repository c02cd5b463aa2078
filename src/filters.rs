//! Pure queries over a task collection.
//!
//! Nothing here mutates or retains the tasks it is given; every function
//! returns a fresh view.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{Aggregate, Category, FilterOptions, Priority, ProgressStats, Task, Weekday};
use crate::reference::{weekdays, CATEGORIES, WEEKDAYS};

pub fn by_weekday(tasks: &[Task], weekday: Weekday) -> Vec<Task> {
    tasks.iter().filter(|t| t.weekday == weekday).cloned().collect()
}

pub fn by_category(tasks: &[Task], category: Category) -> Vec<Task> {
    tasks.iter().filter(|t| t.category == category).cloned().collect()
}

pub fn by_completion(tasks: &[Task], completed: bool) -> Vec<Task> {
    tasks.iter().filter(|t| t.completed == completed).cloned().collect()
}

pub fn by_priority(tasks: &[Task], priority: Priority) -> Vec<Task> {
    tasks.iter().filter(|t| t.priority == priority).cloned().collect()
}

/// Tasks whose stored weekend flag equals `weekend_only`.
pub fn by_weekend_mode(tasks: &[Task], weekend_only: bool) -> Vec<Task> {
    tasks.iter().filter(|t| t.is_weekend == weekend_only).cloned().collect()
}

/// Case-insensitive substring match on title or description.
/// An empty term matches everything.
pub fn by_search_term(tasks: &[Task], term: &str) -> Vec<Task> {
    tasks.iter().filter(|t| matches_search(t, term)).cloned().collect()
}

fn matches_search(task: &Task, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    task.title.to_lowercase().contains(&needle)
        || task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle))
}

/// Whether `task` satisfies every option that is set.
pub fn matches(task: &Task, options: &FilterOptions) -> bool {
    if options.weekday.is_some_and(|w| task.weekday != w) {
        return false;
    }
    if options.category.is_some_and(|c| task.category != c) {
        return false;
    }
    if options.completed.is_some_and(|c| task.completed != c) {
        return false;
    }
    if options.priority.is_some_and(|p| task.priority != p) {
        return false;
    }
    if options.show_weekend_only.is_some_and(|w| task.is_weekend != w) {
        return false;
    }
    match options.search_term.as_deref() {
        Some(term) => matches_search(task, term),
        None => true,
    }
}

/// Applies all set options conjunctively.
pub fn combined_filter(tasks: &[Task], options: &FilterOptions) -> Vec<Task> {
    tasks.iter().filter(|t| matches(t, options)).cloned().collect()
}

/// Display ordering: pending before completed, then high to low priority,
/// then newest first. Ties fall back to the id so the order is total.
pub fn display_order(a: &Task, b: &Task) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| a.priority.cmp(&b.priority))
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn sort_for_display(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(display_order);
    sorted
}

pub fn aggregate(tasks: &[Task]) -> Aggregate {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();
    summarize(total, completed)
}

/// Rounds half up like the percentages shown in the progress view.
fn summarize(total: usize, completed: usize) -> Aggregate {
    let percentage = if total == 0 {
        0
    } else {
        ((200 * completed + total) / (2 * total)) as u32
    };
    Aggregate { total, completed, percentage }
}

/// One bucket per weekday, empty days included.
pub fn aggregate_by_weekday(tasks: &[Task]) -> BTreeMap<Weekday, Aggregate> {
    let mut counts: BTreeMap<Weekday, (usize, usize)> =
        WEEKDAYS.iter().map(|w| (w.key, (0, 0))).collect();
    for t in tasks {
        let entry = counts.entry(t.weekday).or_default();
        entry.0 += 1;
        if t.completed {
            entry.1 += 1;
        }
    }
    counts.into_iter().map(|(k, (total, done))| (k, summarize(total, done))).collect()
}

/// One bucket per category, empty categories included.
pub fn aggregate_by_category(tasks: &[Task]) -> BTreeMap<Category, Aggregate> {
    let mut counts: BTreeMap<Category, (usize, usize)> =
        CATEGORIES.iter().map(|c| (c.key, (0, 0))).collect();
    for t in tasks {
        let entry = counts.entry(t.category).or_default();
        entry.0 += 1;
        if t.completed {
            entry.1 += 1;
        }
    }
    counts.into_iter().map(|(k, (total, done))| (k, summarize(total, done))).collect()
}

/// Overall progress (weekend tasks only in weekend mode) plus per-weekday and
/// per-category buckets over the whole collection.
pub fn progress_stats(tasks: &[Task], weekend_mode: bool) -> ProgressStats {
    let overall = if weekend_mode {
        aggregate(&by_weekend_mode(tasks, true))
    } else {
        aggregate(tasks)
    };
    ProgressStats {
        overall,
        by_weekday: aggregate_by_weekday(tasks),
        by_category: aggregate_by_category(tasks),
    }
}

/// Weekdays shown by the week navigation.
pub fn visible_weekdays(weekend_mode: bool) -> Vec<Weekday> {
    weekdays(weekend_mode.then_some(true)).into_iter().map(|w| w.key).collect()
}
