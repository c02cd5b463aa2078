use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local};

use crate::error::ReferenceError;
use crate::models::{Category, Priority, Weekday};

/// Static metadata for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayInfo {
    pub key: Weekday,
    pub label: &'static str,
    pub short_label: &'static str,
    pub is_weekend: bool,
}

/// Static metadata for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub key: Category,
    pub label: &'static str,
    pub is_weekend_category: bool,
}

/// The week, Monday first. Indexed by `Weekday::index`.
pub const WEEKDAYS: [WeekdayInfo; 7] = [
    WeekdayInfo { key: Weekday::Monday, label: "Monday", short_label: "Mon", is_weekend: false },
    WeekdayInfo { key: Weekday::Tuesday, label: "Tuesday", short_label: "Tue", is_weekend: false },
    WeekdayInfo { key: Weekday::Wednesday, label: "Wednesday", short_label: "Wed", is_weekend: false },
    WeekdayInfo { key: Weekday::Thursday, label: "Thursday", short_label: "Thu", is_weekend: false },
    WeekdayInfo { key: Weekday::Friday, label: "Friday", short_label: "Fri", is_weekend: false },
    WeekdayInfo { key: Weekday::Saturday, label: "Saturday", short_label: "Sat", is_weekend: true },
    WeekdayInfo { key: Weekday::Sunday, label: "Sunday", short_label: "Sun", is_weekend: true },
];

/// All categories in display order. Indexed by `Category::index`.
pub const CATEGORIES: [CategoryInfo; 8] = [
    CategoryInfo { key: Category::Work, label: "Work", is_weekend_category: false },
    CategoryInfo { key: Category::Personal, label: "Personal", is_weekend_category: false },
    CategoryInfo { key: Category::Health, label: "Health", is_weekend_category: false },
    CategoryInfo { key: Category::Shopping, label: "Shopping", is_weekend_category: false },
    CategoryInfo { key: Category::WeekendFun, label: "Weekend Fun", is_weekend_category: true },
    CategoryInfo { key: Category::Family, label: "Family Time", is_weekend_category: true },
    CategoryInfo { key: Category::Hobbies, label: "Hobbies", is_weekend_category: true },
    CategoryInfo { key: Category::Other, label: "Other", is_weekend_category: false },
];

const WEEKEND_GENERAL: [Category; 4] = [Category::Personal, Category::Health, Category::Shopping, Category::Other];
const WORKDAY_FIRST: [Category; 3] = [Category::Work, Category::Personal, Category::Health];

/// Metadata for a weekday.
pub fn weekday_info(weekday: Weekday) -> &'static WeekdayInfo {
    &WEEKDAYS[weekday.index()]
}

/// Metadata for a category.
pub fn category_info(category: Category) -> &'static CategoryInfo {
    &CATEGORIES[category.index()]
}

/// Looks up a weekday by its storage key.
pub fn lookup_weekday(key: &str) -> Result<&'static WeekdayInfo, ReferenceError> {
    WEEKDAYS
        .iter()
        .find(|w| w.key.as_str() == key)
        .ok_or_else(|| ReferenceError::UnknownWeekday(key.to_string()))
}

/// Looks up a category by its storage key.
pub fn lookup_category(key: &str) -> Result<&'static CategoryInfo, ReferenceError> {
    CATEGORIES
        .iter()
        .find(|c| c.key.as_str() == key)
        .ok_or_else(|| ReferenceError::UnknownCategory(key.to_string()))
}

pub fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Saturday | Weekday::Sunday)
}

/// Weekdays filtered by their weekend flag; `None` returns the whole week.
pub fn weekdays(weekend_only: Option<bool>) -> Vec<&'static WeekdayInfo> {
    WEEKDAYS
        .iter()
        .filter(|w| weekend_only.map_or(true, |flag| w.is_weekend == flag))
        .collect()
}

/// Categories filtered by their weekend flag; `None` returns all of them.
pub fn categories(weekend_only: Option<bool>) -> Vec<&'static CategoryInfo> {
    CATEGORIES
        .iter()
        .filter(|c| weekend_only.map_or(true, |flag| c.is_weekend_category == flag))
        .collect()
}

/// Categories offered first when planning a task on `weekday`.
///
/// Weekend days lead with the weekend categories followed by a few general
/// ones; working days lead with work, personal and health.
pub fn suggested_categories_for(weekday: Weekday) -> Vec<&'static CategoryInfo> {
    let general = categories(Some(false));
    if is_weekend(weekday) {
        let mut out = categories(Some(true));
        out.extend(general.into_iter().filter(|c| WEEKEND_GENERAL.contains(&c.key)));
        out
    } else {
        let (first, rest): (Vec<_>, Vec<_>) = general.into_iter().partition(|c| WORKDAY_FIRST.contains(&c.key));
        first.into_iter().chain(rest).collect()
    }
}

/// The following day, wrapping Sunday to Monday.
pub fn next_weekday(current: Weekday) -> Weekday {
    WEEKDAYS[(current.index() + 1) % WEEKDAYS.len()].key
}

/// The preceding day, wrapping Monday to Sunday.
pub fn previous_weekday(current: Weekday) -> Weekday {
    WEEKDAYS[(current.index() + WEEKDAYS.len() - 1) % WEEKDAYS.len()].key
}

/// Today's weekday on the local clock.
pub fn current_weekday() -> Weekday {
    Weekday::from(Local::now().weekday())
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        WEEKDAYS[day.num_days_from_monday() as usize].key
    }
}

impl FromStr for Weekday {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup_weekday(&s.trim().to_lowercase()).map(|w| w.key)
    }
}

impl FromStr for Category {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup_category(&s.trim().to_lowercase()).map(|c| c.key)
    }
}

impl FromStr for Priority {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == key)
            .ok_or(ReferenceError::UnknownPriority(key))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_indexed_by_key() {
        for (i, info) in WEEKDAYS.iter().enumerate() {
            assert_eq!(info.key.index(), i);
        }
        for (i, info) in CATEGORIES.iter().enumerate() {
            assert_eq!(info.key.index(), i);
        }
    }

    #[test]
    fn weekend_flags() {
        assert_eq!(WEEKDAYS.iter().filter(|w| w.is_weekend).count(), 2);
        assert_eq!(CATEGORIES.iter().filter(|c| c.is_weekend_category).count(), 3);
        for info in WEEKDAYS.iter() {
            assert_eq!(info.is_weekend, is_weekend(info.key));
        }
    }

    #[test]
    fn unknown_keys_are_reported() {
        assert_eq!(lookup_weekday("funday"), Err(ReferenceError::UnknownWeekday("funday".into())));
        assert_eq!(lookup_category("chores"), Err(ReferenceError::UnknownCategory("chores".into())));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn parses_storage_keys() {
        assert_eq!("Weekend-Fun".parse::<Category>(), Ok(Category::WeekendFun));
        assert_eq!(" sunday ".parse::<Weekday>(), Ok(Weekday::Sunday));
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
    }

    #[test]
    fn chrono_weekdays_map_onto_the_week() {
        assert_eq!(Weekday::from(chrono::Weekday::Mon), Weekday::Monday);
        assert_eq!(Weekday::from(chrono::Weekday::Sun), Weekday::Sunday);
    }
}
