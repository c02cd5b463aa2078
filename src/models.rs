use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the seven weekday buckets a task is planned on.
///
/// Declaration order is calendar order starting on Monday.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Position in the Monday-first week.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Storage key of the weekday.
    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

/// Fixed task classification.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Work,
    Personal,
    Health,
    Shopping,
    WeekendFun,
    Family,
    Hobbies,
    Other,
}

impl Category {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Health => "health",
            Category::Shopping => "shopping",
            Category::WeekendFun => "weekend-fun",
            Category::Family => "family",
            Category::Hobbies => "hobbies",
            Category::Other => "other",
        }
    }
}

/// Task priority. `Ord` follows display order: high sorts first.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// Represents a single planned task.
///
/// The serialized shape is the persisted record: camelCase keys, enumerated
/// text values and canonical timestamp strings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, assigned at creation.
    pub id: String,
    /// Non-blank title.
    pub title: String,
    /// Optional free-form details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the task has been completed.
    #[serde(default)]
    pub completed: bool,
    pub category: Category,
    /// The weekday the task is planned on.
    pub weekday: Weekday,
    pub priority: Priority,
    /// Whether the weekday was Saturday or Sunday when the task was created.
    /// Not recomputed when the weekday is edited later.
    pub is_weekend: bool,
    /// Creation instant, millisecond precision.
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    /// Optional due instant.
    #[serde(default, with = "crate::timestamp::option", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    /// Weekend flag derived from the current weekday rather than the stored one.
    pub fn falls_on_weekend(&self) -> bool {
        crate::reference::is_weekend(self.weekday)
    }
}

/// Caller-supplied data for a new task. Identity, creation time and the
/// weekend flag are assigned by the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub category: Category,
    pub weekday: Weekday,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    /// A pending, medium priority task in the `other` category.
    pub fn new(title: impl Into<String>, weekday: Weekday) -> Self {
        NewTask {
            title: title.into(),
            description: None,
            completed: false,
            category: Category::Other,
            weekday,
            priority: Priority::Medium,
            due_date: None,
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn due(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Partial update merged into an existing task. `None` leaves a field as is;
/// the nested options clear the optional fields with `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub category: Option<Category>,
    pub weekday: Option<Weekday>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        *self == TaskUpdate::default()
    }
}

/// Conjunctive filter: every `Some` field must match, `None` fields are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub category: Option<Category>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub search_term: Option<String>,
    pub weekday: Option<Weekday>,
    /// Matches the task's stored weekend flag against this value.
    pub show_weekend_only: Option<bool>,
}

/// Completion summary over a set of tasks.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub total: usize,
    pub completed: usize,
    /// Rounded completion percentage, `0` for an empty set.
    pub percentage: u32,
}

/// Everything the progress view shows.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProgressStats {
    pub overall: Aggregate,
    pub by_weekday: std::collections::BTreeMap<Weekday, Aggregate>,
    pub by_category: std::collections::BTreeMap<Category, Aggregate>,
}
