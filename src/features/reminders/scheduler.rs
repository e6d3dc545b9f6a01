//! Deadline-heap reminder scheduling
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Single dispatcher task over a min-heap, mark-and-skip cancellation

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, info, warn};
use tokio::sync::{Mutex, Notify};
use uuid::Uuid;

use crate::core::{SkillError, SkillResult};

use super::store::{Reminder, ReminderStatus, ReminderStore};

/// Alert sink invoked when a reminder fires. The orchestrator registers its
/// speech channel here; without one, alerts land in the log.
pub type AlertCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Armed deadline for one pending reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TimerEntry {
    due: NaiveDateTime,
    id: String,
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due.cmp(&other.due).then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// All mutable scheduler state sits behind one lock: the reminder list and
/// the armed-deadline heap are always mutated together.
struct SchedulerState {
    reminders: Vec<Reminder>,
    queue: BinaryHeap<Reverse<TimerEntry>>,
    alert: Option<AlertCallback>,
}

/// Owns the reminder set, persists every mutation, and fires alerts from a
/// single dispatcher task polling the earliest deadline.
///
/// Cancellation is mark-and-skip: cancelling flips the persisted status and
/// the dispatcher skips any heap entry whose reminder is no longer pending,
/// so a deadline that pops after a cancel has no side effects. The status
/// field is the authority, not the heap.
pub struct ReminderScheduler {
    state: Mutex<SchedulerState>,
    notify: Notify,
    store: ReminderStore,
}

impl ReminderScheduler {
    /// Load persisted reminders and re-arm every pending one whose due time
    /// is still ahead. Pending reminders with an elapsed due time stay
    /// pending on disk and are filtered out of listings lazily.
    pub fn load(store: ReminderStore) -> Self {
        let reminders = store.load();
        let now = Local::now().naive_local();
        let mut queue = BinaryHeap::new();
        let mut armed = 0usize;
        for r in &reminders {
            if r.status == ReminderStatus::Pending && r.due > now {
                queue.push(Reverse(TimerEntry {
                    due: r.due,
                    id: r.id.clone(),
                }));
                armed += 1;
            }
        }
        if !reminders.is_empty() {
            info!(
                "loaded {} reminders from {}, re-armed {armed}",
                reminders.len(),
                store.path().display()
            );
        }
        ReminderScheduler {
            state: Mutex::new(SchedulerState {
                reminders,
                queue,
                alert: None,
            }),
            notify: Notify::new(),
            store,
        }
    }

    /// Register the alert sink. Replaces any previous one.
    pub async fn set_alert(&self, callback: AlertCallback) {
        self.state.lock().await.alert = Some(callback);
    }

    /// Spawn the dispatcher task. One task serves every reminder.
    pub fn start(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let scheduler = Arc::clone(self);
        info!("reminder dispatcher started");
        tokio::spawn(async move {
            loop {
                scheduler.tick().await;
            }
        })
    }

    /// Wait for the earliest deadline (or a wakeup) and fire if elapsed.
    async fn tick(&self) {
        let next_due = {
            let state = self.state.lock().await;
            state.queue.peek().map(|Reverse(entry)| entry.due)
        };
        match next_due {
            None => self.notify.notified().await,
            Some(due) => {
                let now = Local::now().naive_local();
                if due > now {
                    let wait = (due - now).to_std().unwrap_or(Duration::ZERO);
                    tokio::select! {
                        _ = tokio::time::sleep(wait) => {}
                        _ = self.notify.notified() => {}
                    }
                } else {
                    self.fire_earliest().await;
                }
            }
        }
    }

    /// Pop the earliest deadline and fire it if its reminder is still
    /// pending. Idempotent: entries for cancelled or already-completed
    /// reminders are dropped without side effects.
    pub(crate) async fn fire_earliest(&self) {
        let fired = {
            let mut state = self.state.lock().await;
            let entry = match state.queue.pop() {
                Some(Reverse(entry)) => entry,
                None => return,
            };
            if entry.due > Local::now().naive_local() {
                // Raced with a newly armed earlier deadline; put it back.
                state.queue.push(Reverse(entry));
                return;
            }
            let reminder = state
                .reminders
                .iter_mut()
                .find(|r| r.id == entry.id && r.status == ReminderStatus::Pending);
            match reminder {
                None => {
                    debug!("skipping stale timer entry for {}", entry.id);
                    None
                }
                Some(reminder) => {
                    reminder.status = ReminderStatus::Completed;
                    let title = reminder.title.clone();
                    if let Err(e) = self.store.save(&state.reminders) {
                        warn!("could not persist fired reminder {}: {e}", entry.id);
                    }
                    Some((title, state.alert.clone()))
                }
            }
        };

        if let Some((title, alert)) = fired {
            let message = format!("Reminder: {title}");
            match alert {
                Some(callback) => callback(message),
                None => info!("{message}"),
            }
        }
    }

    /// Create a reminder due at `time` (formats `HH:MM` or `HH:MM AM/PM`)
    /// on `date` (formats `YYYY-MM-DD` or `MM/DD/YYYY`; default today).
    ///
    /// An explicit date in the past is rejected; a time-only reminder whose
    /// time already passed today silently rolls to the same time tomorrow.
    /// The record is persisted before its deadline is armed, so an arming
    /// failure can never lose it.
    pub async fn add_reminder(
        &self,
        title: &str,
        time_str: &str,
        date_str: Option<&str>,
    ) -> SkillResult<String> {
        if title.trim().is_empty() {
            return Err(SkillError::Validation(
                "No reminder title provided".to_string(),
            ));
        }

        let now = Local::now().naive_local();
        let time = parse_time(time_str)?;
        let explicit_date = match date_str {
            Some(d) => Some(parse_date(d)?),
            None => None,
        };

        let mut due = NaiveDateTime::new(explicit_date.unwrap_or_else(|| now.date()), time);
        if due < now {
            if explicit_date.is_some() {
                return Err(SkillError::Validation(
                    "Cannot set reminder for a past date and time.".to_string(),
                ));
            }
            // Time-only and already passed today: assume tomorrow.
            due += chrono::Duration::days(1);
        }

        let reminder = Reminder {
            id: Uuid::new_v4().to_string(),
            title: title.trim().to_string(),
            due,
            status: ReminderStatus::Pending,
        };

        {
            let mut state = self.state.lock().await;
            state.reminders.push(reminder.clone());
            // Persist first; the in-memory record survives either way.
            self.store.save(&state.reminders)?;
            state.queue.push(Reverse(TimerEntry {
                due,
                id: reminder.id.clone(),
            }));
        }
        self.notify.notify_one();

        debug!("armed reminder {} for {due}", reminder.id);
        Ok(format!(
            "Reminder set for {} on {}: {}",
            due.format("%I:%M %p"),
            due.format("%A, %B %d, %Y"),
            reminder.title
        ))
    }

    /// Reminders matching `filter` (all when `None`). Filtering for pending
    /// also suppresses entries whose due time already elapsed; that is a
    /// read-time view only, the stored status is untouched.
    pub async fn get_reminders(&self, filter: Option<ReminderStatus>) -> Vec<Reminder> {
        let now = Local::now().naive_local();
        let state = self.state.lock().await;
        state
            .reminders
            .iter()
            .filter(|r| match filter {
                None => true,
                Some(status) => {
                    r.status == status && !(status == ReminderStatus::Pending && r.due < now)
                }
            })
            .cloned()
            .collect()
    }

    /// Cancel a pending reminder by id or title; id takes precedence. The
    /// armed deadline stays in the heap and is skipped when it pops.
    pub async fn cancel_reminder(
        &self,
        id: Option<&str>,
        title: Option<&str>,
    ) -> SkillResult<String> {
        if id.is_none() && title.is_none() {
            return Err(SkillError::Validation(
                "Either reminder ID or title must be provided.".to_string(),
            ));
        }

        let mut state = self.state.lock().await;
        let found = state.reminders.iter_mut().find(|r| {
            r.status == ReminderStatus::Pending
                && match id {
                    Some(id) => r.id == id,
                    None => title
                        .map(|t| r.title.eq_ignore_ascii_case(t.trim()))
                        .unwrap_or(false),
                }
        });

        match found {
            Some(reminder) => {
                reminder.status = ReminderStatus::Cancelled;
                let cancelled_id = reminder.id.clone();
                self.store.save(&state.reminders)?;
                info!("cancelled reminder {cancelled_id}");
                Ok("Reminder cancelled successfully.".to_string())
            }
            None => Err(SkillError::NotFound(match id {
                Some(id) => format!("No active reminder found with ID: {id}"),
                None => format!(
                    "No active reminder found with title: {}",
                    title.unwrap_or_default()
                ),
            })),
        }
    }

    /// Drop every reminder that is no longer pending. Idempotent; an empty
    /// sweep is reported as nothing-to-clear, not success.
    pub async fn clear_completed_reminders(&self) -> SkillResult<String> {
        let mut state = self.state.lock().await;
        let before = state.reminders.len();
        state
            .reminders
            .retain(|r| r.status == ReminderStatus::Pending);
        let removed = before - state.reminders.len();
        if removed == 0 {
            return Err(SkillError::NotFound(
                "No completed or cancelled reminders to clear.".to_string(),
            ));
        }
        self.store.save(&state.reminders)?;
        Ok(format!("Cleared {removed} completed or cancelled reminders."))
    }

    /// Insert a prebuilt record and arm its deadline, bypassing the past
    /// checks. Lets tests exercise the fire path with elapsed due times.
    #[cfg(test)]
    pub(crate) async fn insert_for_test(&self, reminder: Reminder) {
        let mut state = self.state.lock().await;
        state.queue.push(Reverse(TimerEntry {
            due: reminder.due,
            id: reminder.id.clone(),
        }));
        state.reminders.push(reminder);
    }
}

/// Accepts 24-hour `HH:MM` or 12-hour `HH:MM AM/PM` (space optional).
fn parse_time(s: &str) -> SkillResult<NaiveTime> {
    let trimmed = s.trim();
    let mut upper = trimmed.to_uppercase();
    // Tolerate "5:30pm" by re-inserting the space %p expects.
    if (upper.ends_with("AM") || upper.ends_with("PM")) && !upper.ends_with(" AM") && !upper.ends_with(" PM")
    {
        let suffix = upper.split_off(upper.len() - 2);
        upper = format!("{} {suffix}", upper.trim_end());
    }
    NaiveTime::parse_from_str(&upper, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(&upper, "%I:%M %p"))
        .map_err(|_| {
            SkillError::Parse(format!(
                "Invalid time format: {trimmed}. Please use HH:MM or HH:MM AM/PM."
            ))
        })
}

/// Accepts `YYYY-MM-DD` or `MM/DD/YYYY`.
fn parse_date(s: &str) -> SkillResult<NaiveDate> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%m/%d/%Y"))
        .map_err(|_| {
            SkillError::Parse(format!(
                "Invalid date format: {trimmed}. Please use YYYY-MM-DD or MM/DD/YYYY."
            ))
        })
}
