//! # Weekplan
//!
//! A weekly task planner for the terminal. Tasks are planned on one of the
//! seven weekdays, carry a category and priority, and can be viewed per day,
//! filtered, searched and summarised. A weekend mode narrows every view to
//! Saturday and Sunday.
//!
//! The collection lives in a single JSON file (see [`storage::default_path`]),
//! rewritten after every change.

pub mod commands;
pub mod error;
pub mod filters;
pub mod models;
pub mod reference;
pub mod repository;
pub mod storage;
pub mod timestamp;
pub mod tui;
