use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::filters::{aggregate, by_weekday, combined_filter, display_order, progress_stats, visible_weekdays};
use crate::models::{Category, FilterOptions, NewTask, Priority, Task, TaskUpdate, Weekday};
use crate::reference::{category_info, current_weekday, suggested_categories_for, weekday_info};
use crate::repository::TaskRepository;
use crate::storage::{export_tasks, export_to_path, import_from_path};

/// Parses a `YYYY-MM-DD` due date as midnight UTC.
pub fn parse_due(due: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDate::parse_from_str(due.trim(), "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// Resolves a full id or a unique suffix of one.
pub fn resolve_id(repo: &TaskRepository, needle: &str) -> Option<String> {
    if let Some(t) = repo.get(needle) {
        return Some(t.id.clone());
    }
    if needle.is_empty() {
        return None;
    }
    let mut candidates = repo.tasks().iter().filter(|t| t.id.ends_with(needle));
    match (candidates.next(), candidates.next()) {
        (Some(t), None) => Some(t.id.clone()),
        _ => None,
    }
}

/// Adds a new task.
///
/// The weekday defaults to today and the category to the first suggestion
/// for that weekday.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    repo: &mut TaskRepository,
    title: String,
    weekday: Option<Weekday>,
    category: Option<Category>,
    priority: Option<Priority>,
    description: Option<String>,
    due: Option<String>,
    silent: bool,
) {
    let weekday = weekday.unwrap_or_else(current_weekday);
    let category = category
        .or_else(|| suggested_categories_for(weekday).first().map(|c| c.key))
        .unwrap_or(Category::Other);

    let mut data = NewTask::new(title, weekday)
        .category(category)
        .priority(priority.unwrap_or(Priority::Medium));
    data.description = description;
    if let Some(d) = due {
        match parse_due(&d) {
            Ok(date) => data.due_date = Some(date),
            Err(e) => {
                if !silent { eprintln!("Invalid due date '{}': {}. Use YYYY-MM-DD.", d, e); }
                return;
            }
        }
    }

    match repo.add(data) {
        Ok(task) => {
            if !silent { println!("Task added to {} (id = {})", weekday_info(task.weekday).label, task.id); }
        }
        Err(e) => {
            if !silent { eprintln!("{}", e); }
        }
    }
}

/// Flips a task between pending and done.
pub fn cmd_toggle(repo: &mut TaskRepository, id: &str, silent: bool) {
    let Some(id) = resolve_id(repo, id) else {
        if !silent { eprintln!("Task {} not found.", id); }
        return;
    };
    if let Some(done) = repo.toggle_complete(&id) {
        if !silent {
            let state = if done { "complete" } else { "pending" };
            println!("Task {} marked as {}.", id, state);
        }
    }
}

/// Removes a task by id.
pub fn cmd_remove(repo: &mut TaskRepository, id: &str, silent: bool) {
    match resolve_id(repo, id) {
        Some(id) if repo.remove(&id) => {
            if !silent { println!("Task {} removed.", id); }
        }
        _ => {
            if !silent { eprintln!("Task {} not found.", id); }
        }
    }
}

/// Edits an existing task's fields. An empty description or due date clears it.
#[allow(clippy::too_many_arguments)]
pub fn cmd_edit(
    repo: &mut TaskRepository,
    id: &str,
    title: Option<String>,
    description: Option<String>,
    category: Option<Category>,
    priority: Option<Priority>,
    weekday: Option<Weekday>,
    due: Option<String>,
    silent: bool,
) {
    let Some(id) = resolve_id(repo, id) else {
        if !silent { eprintln!("Task {} not found.", id); }
        return;
    };

    let mut update = TaskUpdate {
        title,
        description: description.map(|d| Some(d).filter(|d| !d.trim().is_empty())),
        category,
        priority,
        weekday,
        ..TaskUpdate::default()
    };
    if let Some(d) = due {
        if d.trim().is_empty() {
            update.due_date = Some(None);
        } else {
            match parse_due(&d) {
                Ok(date) => update.due_date = Some(Some(date)),
                Err(e) => {
                    if !silent { eprintln!("Invalid due date '{}': {}. Use YYYY-MM-DD.", d, e); }
                    return;
                }
            }
        }
    }
    if update.is_empty() {
        if !silent { eprintln!("Nothing to update."); }
        return;
    }

    match repo.update(&id, update) {
        Ok(true) => {
            if !silent { println!("Task {} updated.", id); }
        }
        Ok(false) => {
            if !silent { eprintln!("Task {} not found.", id); }
        }
        Err(e) => {
            if !silent { eprintln!("{}", e); }
        }
    }
}

/// Removes every completed task.
pub fn cmd_clear_completed(repo: &mut TaskRepository, silent: bool) {
    let removed = repo.clear_completed();
    if !silent {
        if removed == 0 {
            println!("No completed tasks to clear.");
        } else {
            println!("Cleared {} completed task(s).", removed);
        }
    }
}

/// Tasks matching `options`, grouped by weekday and in display order within a day.
pub fn list_view(repo: &TaskRepository, options: &FilterOptions) -> Vec<Task> {
    let mut tasks = combined_filter(repo.tasks(), options);
    tasks.sort_by(|a, b| a.weekday.cmp(&b.weekday).then_with(|| display_order(a, b)));
    tasks
}

/// Lists tasks in a formatted table.
pub fn cmd_list(repo: &TaskRepository, options: &FilterOptions) {
    let tasks = list_view(repo, options);
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Day").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in &tasks {
        let priority_color = if t.completed {
            Color::Grey
        } else {
            match t.priority {
                Priority::High => Color::Red,
                Priority::Medium => Color::Yellow,
                Priority::Low => Color::Green,
            }
        };
        let status = if t.completed { "Done" } else { "Pending" };
        let status_color = if t.completed { Color::Green } else { Color::Yellow };
        let title = match &t.description {
            Some(d) => format!("{}\n{}", t.title, d),
            None => t.title.clone(),
        };

        table.add_row(vec![
            Cell::new(&t.id),
            Cell::new(weekday_info(t.weekday).short_label),
            Cell::new(title),
            Cell::new(category_info(t.category).label),
            Cell::new(t.priority).fg(priority_color),
            Cell::new(t.due_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()),
            Cell::new(status).fg(status_color),
        ]);
    }

    println!("{table}");
    let summary = aggregate(&tasks);
    println!("{}/{} completed ({}%)", summary.completed, summary.total, summary.percentage);
}

/// Prints overall, per-day and per-category progress.
pub fn cmd_stats(repo: &TaskRepository, day: Option<Weekday>, weekend_mode: bool) {
    let stats = progress_stats(repo.tasks(), weekend_mode);
    let day = day.unwrap_or_else(current_weekday);
    let today = aggregate(&by_weekday(repo.tasks(), day));

    println!(
        "{}: {} of {} tasks completed ({}%)",
        weekday_info(day).label,
        today.completed,
        today.total,
        today.percentage
    );
    println!(
        "{}: {} of {} tasks completed ({}%)",
        if weekend_mode { "Weekend" } else { "Week" },
        stats.overall.completed,
        stats.overall.total,
        stats.overall.percentage
    );

    let mut days = Table::new();
    days.load_preset(UTF8_FULL).set_header(vec!["Day", "Done", "Total", "%"]);
    for w in visible_weekdays(weekend_mode) {
        let agg = stats.by_weekday.get(&w).copied().unwrap_or_default();
        days.add_row(vec![
            weekday_info(w).label.to_string(),
            agg.completed.to_string(),
            agg.total.to_string(),
            agg.percentage.to_string(),
        ]);
    }
    println!("{days}");

    let mut cats = Table::new();
    cats.load_preset(UTF8_FULL).set_header(vec!["Category", "Done", "Total", "%"]);
    for (c, agg) in stats.by_category.iter().filter(|(_, a)| a.total > 0) {
        cats.add_row(vec![
            category_info(*c).label.to_string(),
            agg.completed.to_string(),
            agg.total.to_string(),
            agg.percentage.to_string(),
        ]);
    }
    println!("{cats}");
}

/// Lists the visible weekdays with their task counts and suggested categories.
pub fn cmd_days(repo: &TaskRepository, weekend_mode: bool) {
    let today = current_weekday();
    let stats = progress_stats(repo.tasks(), weekend_mode);
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Day", "Tasks", "Suggested categories"]);
    for w in visible_weekdays(weekend_mode) {
        let agg = stats.by_weekday.get(&w).copied().unwrap_or_default();
        let mut label = Cell::new(weekday_info(w).label);
        if w == today {
            label = label.add_attribute(Attribute::Bold);
        }
        let suggested: Vec<&str> = suggested_categories_for(w).iter().map(|c| c.label).collect();
        table.add_row(vec![
            label,
            Cell::new(format!("{}/{}", agg.completed, agg.total)),
            Cell::new(suggested.join(", ")),
        ]);
    }
    println!("{table}");
}

/// Exports all tasks as pretty JSON to `output`, or stdout when absent.
pub fn cmd_export(repo: &TaskRepository, output: Option<&Path>, silent: bool) {
    match output {
        Some(path) => match export_to_path(repo.tasks(), path) {
            Ok(()) => {
                if !silent { println!("Exported {} task(s) to {}.", repo.len(), path.display()); }
            }
            Err(e) => {
                if !silent { eprintln!("Failed to export tasks: {}", e); }
            }
        },
        None => match export_tasks(repo.tasks()) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                if !silent { eprintln!("Failed to export tasks: {}", e); }
            }
        },
    }
}

/// Replaces the collection with the tasks in `path`.
pub fn cmd_import(repo: &mut TaskRepository, path: &Path, silent: bool) {
    match import_from_path(path) {
        Ok(tasks) => {
            let count = tasks.len();
            repo.replace_all(tasks);
            if !silent { println!("Imported {} task(s).", count); }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to import tasks: {}", e); }
        }
    }
}

/// Deletes every task and the storage file.
pub fn cmd_reset(repo: &mut TaskRepository, force: bool) {
    if !force {
        print!("Are you sure you want to delete all tasks? This cannot be undone. [y/N] ");
        let _ = io::stdout().flush();
        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() || input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return;
        }
    }
    repo.clear_all();
    println!("Database reset successfully.");
}
