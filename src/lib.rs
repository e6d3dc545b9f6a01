// Core layer - shared types and configuration
pub mod core;

// Features layer - all skill modules
pub mod features;

// Ports layer - seams to speech, web services and the desktop
pub mod ports;

// Application layer
pub mod assistant;

pub use core::{Config, SkillError, SkillResult};

pub use features::{
    // Routing
    Action, ActionKind, CommandRouter, ParsedCommand,
    // Reminders
    Reminder, ReminderScheduler, ReminderStatus, ReminderStore,
    // Responses
    ResponseRepository,
    // Calendar
    CalendarBook, Event,
    // Apps
    AppLauncher,
    // Lookup
    LookupSkill,
};

pub use ports::{
    ConsoleSpeech, DesktopSystem, HttpWebInfo, SpeechPort, SystemPort, WebInfoPort,
};

pub use assistant::{Assistant, Reply};
