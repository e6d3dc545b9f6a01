//! # Reminders Feature
//!
//! Persistent reminders fired by a single dispatcher task.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Heap-scheduled reminders with JSON persistence

pub mod scheduler;
pub mod store;

pub use scheduler::{AlertCallback, ReminderScheduler};
pub use store::{Reminder, ReminderStatus, ReminderStore, DATETIME_FORMAT};
