//! JSON-backed reminder persistence
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Wholesale-file store with atomic write-then-rename

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::SkillResult;

/// Wire format for stored due timestamps.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lifecycle of a reminder. Transitions only go pending → completed (timer
/// fired) or pending → cancelled; never backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Pending,
    Completed,
    Cancelled,
}

/// One persisted reminder record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    /// Due instant in local time, stored as `%Y-%m-%d %H:%M:%S`.
    #[serde(rename = "datetime", with = "wire_datetime")]
    pub due: NaiveDateTime,
    pub status: ReminderStatus,
}

/// Serde adapter for the stored datetime format.
mod wire_datetime {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::DATETIME_FORMAT;

    pub fn serialize<S>(due: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&due.format(DATETIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Durable store for the reminder list.
///
/// The durability model is wholesale: the full array is read at startup and
/// rewritten after every mutation. Writes go to a temp file first and are
/// renamed into place so a crash mid-write cannot corrupt the store.
pub struct ReminderStore {
    path: PathBuf,
}

impl ReminderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ReminderStore { path: path.into() }
    }

    /// Read all reminders. A missing file is an empty store; an unreadable
    /// one is logged and treated as empty rather than blocking startup.
    pub fn load(&self) -> Vec<Reminder> {
        if !self.path.exists() {
            return Vec::new();
        }
        match fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(reminders) => reminders,
                Err(e) => {
                    warn!("could not parse {}: {e}", self.path.display());
                    Vec::new()
                }
            },
            Err(e) => {
                warn!("could not read {}: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    /// Write the full reminder list.
    pub fn save(&self, reminders: &[Reminder]) -> SkillResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(reminders)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}
