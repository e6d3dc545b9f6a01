//! # Command Router Feature
//!
//! Rule-based natural-language routing from raw utterances to typed actions.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Reminder and calendar rule blocks
//! - 1.0.0: Initial ordered rule table with wake-word handling

pub mod action;
pub mod router;
pub mod rules;

pub use action::{Action, ParsedCommand};
pub use router::CommandRouter;
pub use rules::{default_rules, ActionKind, Rule};
