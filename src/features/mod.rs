// Feature modules: each directory is one assistant skill.

pub mod apps;
pub mod calendar;
pub mod lookup;
pub mod reminders;
pub mod responses;
pub mod router;

pub use apps::AppLauncher;
pub use calendar::{CalendarBook, Event};
pub use lookup::LookupSkill;
pub use reminders::{Reminder, ReminderScheduler, ReminderStatus, ReminderStore};
pub use responses::ResponseRepository;
pub use router::{Action, ActionKind, CommandRouter, ParsedCommand};
