use tracing::debug;
use uuid::Uuid;

use crate::error::TaskError;
use crate::models::{NewTask, Task, TaskUpdate};
use crate::reference::is_weekend;
use crate::storage::TaskStore;
use crate::timestamp;

/// Owns the in-memory task collection.
///
/// All mutations go through `&mut self`, so there is exactly one writer.
/// When a store is attached, every mutation that changes the collection is
/// followed by exactly one best-effort save of the full collection.
#[derive(Debug, Default)]
pub struct TaskRepository {
    tasks: Vec<Task>,
    store: Option<TaskStore>,
}

impl TaskRepository {
    /// Creates an empty repository that is not persisted anywhere.
    pub fn new() -> Self {
        TaskRepository::default()
    }

    /// Loads the collection from `store` and persists subsequent mutations to it.
    pub fn open(store: TaskStore) -> Self {
        let tasks = store.load();
        TaskRepository { tasks, store: Some(store) }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Adds a new task and returns it.
    ///
    /// Assigns the id and creation time and derives the weekend flag from
    /// the weekday. Blank titles are rejected.
    pub fn add(&mut self, data: NewTask) -> Result<&Task, TaskError> {
        let title = normalize_title(&data.title)?;
        let task = Task {
            id: self.generate_id(),
            title,
            description: normalize_description(data.description),
            completed: data.completed,
            category: data.category,
            weekday: data.weekday,
            priority: data.priority,
            is_weekend: is_weekend(data.weekday),
            created_at: timestamp::now(),
            due_date: data.due_date,
        };
        debug!(id = %task.id, weekday = %task.weekday, "adding task");
        self.tasks.push(task);
        self.commit();
        let idx = self.tasks.len() - 1;
        Ok(&self.tasks[idx])
    }

    /// Merges `update` into the task with `id`.
    ///
    /// Returns `Ok(false)` when no task matches. The id, creation time and
    /// stored weekend flag are never touched.
    pub fn update(&mut self, id: &str, update: TaskUpdate) -> Result<bool, TaskError> {
        let title = match &update.title {
            Some(t) => Some(normalize_title(t)?),
            None => None,
        };
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        if let Some(t) = title { task.title = t; }
        if let Some(d) = update.description { task.description = normalize_description(d); }
        if let Some(c) = update.completed { task.completed = c; }
        if let Some(c) = update.category { task.category = c; }
        if let Some(w) = update.weekday { task.weekday = w; }
        if let Some(p) = update.priority { task.priority = p; }
        if let Some(d) = update.due_date { task.due_date = d; }
        self.commit();
        Ok(true)
    }

    /// Deletes the task with `id`. Returns whether one was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let len_before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != len_before;
        if removed {
            self.commit();
        }
        removed
    }

    /// Flips completion of the task with `id` and returns the new state.
    pub fn toggle_complete(&mut self, id: &str) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        let state = task.completed;
        self.commit();
        Some(state)
    }

    /// Removes every completed task and returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let len_before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = len_before - self.tasks.len();
        if removed > 0 {
            self.commit();
        }
        removed
    }

    /// Replaces the whole collection, e.g. after an import.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.commit();
    }

    /// Empties the collection and removes the stored slot.
    pub fn clear_all(&mut self) {
        self.tasks.clear();
        if let Some(store) = &self.store {
            store.clear();
        }
    }

    fn commit(&self) {
        if let Some(store) = &self.store {
            store.save(&self.tasks);
        }
    }

    /// `task_<unix millis>_<9 random hex chars>`, unique within the collection.
    fn generate_id(&self) -> String {
        loop {
            let random = Uuid::new_v4().simple().to_string();
            let id = format!("task_{}_{}", timestamp::now().timestamp_millis(), &random[..9]);
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

fn normalize_title(title: &str) -> Result<String, TaskError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskError::BlankTitle);
    }
    Ok(trimmed.to_string())
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
