//! # Calendar Feature
//!
//! Date-keyed event book with JSON persistence.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Add, list and remove events keyed by normalized date

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::{Local, NaiveDate, NaiveTime};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::{SkillError, SkillResult};

/// One calendar entry. Dates are normalized to `YYYY-MM-DD`, times to
/// 24-hour `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub date: String,
    pub time: Option<String>,
    pub description: Option<String>,
}

/// Events grouped by date, persisted wholesale to one JSON file the same
/// way the reminder store does it.
pub struct CalendarBook {
    path: PathBuf,
    events: HashMap<String, Vec<Event>>,
}

impl CalendarBook {
    /// Load the book from `path`. A missing or unreadable file starts an
    /// empty calendar.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let events = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(contents) => match serde_json::from_str(&contents) {
                    Ok(events) => events,
                    Err(e) => {
                        warn!("could not parse {}: {e}", path.display());
                        HashMap::new()
                    }
                },
                Err(e) => {
                    warn!("could not read {}: {e}", path.display());
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };
        CalendarBook { path, events }
    }

    fn save(&self) -> SkillResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.events)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Add an event on `date` (`YYYY-MM-DD` or `MM/DD/YYYY`), optionally at
    /// `time` (`HH:MM` or `HH:MM AM/PM`).
    pub fn add_event(
        &mut self,
        title: &str,
        date: &str,
        time: Option<&str>,
        description: Option<&str>,
    ) -> SkillResult<String> {
        let date = normalize_date(date)?;
        let time = match time {
            Some(t) => Some(normalize_time(t)?),
            None => None,
        };

        let event = Event {
            title: title.trim().to_string(),
            date: date.clone(),
            time,
            description: description.map(str::to_string),
        };
        self.events.entry(date.clone()).or_default().push(event);
        self.save()?;
        Ok(format!("Event '{}' added to calendar for {date}", title.trim()))
    }

    /// Events for `date`, defaulting to today. An empty day is reported as
    /// a not-found error carrying the normalized date.
    pub fn get_events(&self, date: Option<&str>) -> SkillResult<Vec<Event>> {
        let date = match date {
            Some(d) => normalize_date(d)?,
            None => Local::now().date_naive().format("%Y-%m-%d").to_string(),
        };
        match self.events.get(&date) {
            Some(events) if !events.is_empty() => Ok(events.clone()),
            _ => Err(SkillError::NotFound(format!(
                "No events scheduled for {date}"
            ))),
        }
    }

    /// Remove every event titled `title` (case-insensitive), restricted to
    /// `date` when one is given, otherwise across all dates. Days left
    /// empty are dropped from the book.
    pub fn remove_event(&mut self, title: &str, date: Option<&str>) -> SkillResult<String> {
        let wanted = title.trim().to_lowercase();
        let mut found = false;

        match date {
            Some(d) => {
                let date = normalize_date(d)?;
                let day = self.events.get_mut(&date).ok_or_else(|| {
                    SkillError::NotFound(format!("No events scheduled for {date}"))
                })?;
                day.retain(|e| {
                    let matches = e.title.to_lowercase() == wanted;
                    found |= matches;
                    !matches
                });
                if !found {
                    return Err(SkillError::NotFound(format!(
                        "No event '{title}' found for {date}"
                    )));
                }
                if day.is_empty() {
                    self.events.remove(&date);
                }
            }
            None => {
                for day in self.events.values_mut() {
                    let before = day.len();
                    day.retain(|e| e.title.to_lowercase() != wanted);
                    found |= day.len() < before;
                }
                self.events.retain(|_, day| !day.is_empty());
                if !found {
                    return Err(SkillError::NotFound(format!(
                        "No event '{title}' found in calendar"
                    )));
                }
            }
        }

        self.save()?;
        Ok(format!("Event '{title}' removed from calendar"))
    }
}

fn normalize_date(s: &str) -> SkillResult<String> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%m/%d/%Y"))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| {
            SkillError::Parse(format!(
                "Invalid date format: {trimmed}. Please use YYYY-MM-DD or MM/DD/YYYY."
            ))
        })
}

fn normalize_time(s: &str) -> SkillResult<String> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(&trimmed.to_uppercase(), "%I:%M %p"))
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| {
            SkillError::Parse(format!(
                "Invalid time format: {trimmed}. Please use HH:MM or HH:MM AM/PM."
            ))
        })
}
