//! Typed actions produced by the router
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Replaced string-keyed parameter maps at the dispatch boundary

use std::collections::HashMap;

use super::rules::ActionKind;

/// A routed command with its parameters extracted.
///
/// Intermediate form between the rule table and [`Action`]; kept public so
/// tests can assert on raw captures and overrides.
#[derive(Debug, Clone)]
pub struct ParsedCommand {
    pub kind: ActionKind,
    pub params: HashMap<String, String>,
}

/// One utterance, fully classified. The orchestrator matches exhaustively
/// over this instead of string-comparing action names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    OpenApp { app_name: String },
    WebSearch { query: String, engine: Option<String> },
    GetInfo { query: String },
    PlayYoutube { video: String },
    OpenWebsite { url: String },
    GetWeather { city: String },
    GetNews { category: String },
    GetTime,
    GetDate,
    GetSystemInfo,
    Shutdown { delay_secs: u32 },
    Restart { delay_secs: u32 },
    CancelShutdown,
    SetReminder { title: String, time: String, date: Option<String> },
    ListReminders,
    CancelReminder { title: String },
    ClearReminders,
    AddEvent { title: String, date: String, time: Option<String> },
    GetEvents { date: Option<String> },
    RemoveEvent { title: String },
    AskQuestion { query: String },
    Exit,
    Greet,
    Thanks,
    Unknown { text: String },
}

impl Action {
    /// Build a typed action from a parsed command. Missing parameters
    /// degrade to empty strings (the capability validates and reports),
    /// never to a panic.
    pub fn from_parsed(cmd: ParsedCommand) -> Action {
        let mut p = cmd.params;

        match cmd.kind {
            ActionKind::OpenApp => Action::OpenApp { app_name: take(&mut p, "app_name") },
            ActionKind::WebSearch => Action::WebSearch {
                query: take(&mut p, "query"),
                engine: p.remove("engine"),
            },
            ActionKind::GetInfo => Action::GetInfo { query: take(&mut p, "query") },
            ActionKind::PlayYoutube => Action::PlayYoutube { video: take(&mut p, "video") },
            ActionKind::OpenWebsite => Action::OpenWebsite { url: take(&mut p, "url") },
            ActionKind::GetWeather => Action::GetWeather { city: take(&mut p, "city") },
            ActionKind::GetNews => Action::GetNews {
                category: p.remove("category").unwrap_or_else(|| "general".to_string()),
            },
            ActionKind::GetTime => Action::GetTime,
            ActionKind::GetDate => Action::GetDate,
            ActionKind::GetSystemInfo => Action::GetSystemInfo,
            ActionKind::Shutdown => Action::Shutdown {
                delay_secs: parse_delay(p.remove("delay")),
            },
            ActionKind::Restart => Action::Restart {
                delay_secs: parse_delay(p.remove("delay")),
            },
            ActionKind::CancelShutdown => Action::CancelShutdown,
            ActionKind::SetReminder => Action::SetReminder {
                title: take(&mut p, "title"),
                time: take(&mut p, "time"),
                date: p.remove("date"),
            },
            ActionKind::ListReminders => Action::ListReminders,
            ActionKind::CancelReminder => Action::CancelReminder { title: take(&mut p, "title") },
            ActionKind::ClearReminders => Action::ClearReminders,
            ActionKind::AddEvent => Action::AddEvent {
                title: take(&mut p, "title"),
                date: take(&mut p, "date"),
                time: p.remove("time"),
            },
            ActionKind::GetEvents => Action::GetEvents { date: p.remove("date") },
            ActionKind::RemoveEvent => Action::RemoveEvent { title: take(&mut p, "title") },
            ActionKind::AskQuestion => Action::AskQuestion { query: take(&mut p, "query") },
            ActionKind::Exit => Action::Exit,
            ActionKind::Greet => Action::Greet,
            ActionKind::Thanks => Action::Thanks,
            ActionKind::Unknown => Action::Unknown { text: take(&mut p, "text") },
        }
    }
}

/// Remove a parameter, degrading to an empty string when absent.
fn take(p: &mut HashMap<String, String>, key: &str) -> String {
    p.remove(key).unwrap_or_default()
}

/// Spoken delays are small integers; anything unparsable means "now".
fn parse_delay(delay: Option<String>) -> u32 {
    delay.and_then(|d| d.parse().ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(kind: ActionKind, params: &[(&str, &str)]) -> ParsedCommand {
        ParsedCommand {
            kind,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_open_app_from_parsed() {
        let action = Action::from_parsed(parsed(ActionKind::OpenApp, &[("app_name", "chrome")]));
        assert_eq!(action, Action::OpenApp { app_name: "chrome".to_string() });
    }

    #[test]
    fn test_missing_param_degrades_to_empty() {
        let action = Action::from_parsed(parsed(ActionKind::OpenApp, &[]));
        assert_eq!(action, Action::OpenApp { app_name: String::new() });
    }

    #[test]
    fn test_news_category_defaults_to_general() {
        let action = Action::from_parsed(parsed(ActionKind::GetNews, &[]));
        assert_eq!(action, Action::GetNews { category: "general".to_string() });
    }

    #[test]
    fn test_shutdown_delay_parsing() {
        let action = Action::from_parsed(parsed(ActionKind::Shutdown, &[("delay", "30")]));
        assert_eq!(action, Action::Shutdown { delay_secs: 30 });

        let action = Action::from_parsed(parsed(ActionKind::Shutdown, &[("delay", "soon")]));
        assert_eq!(action, Action::Shutdown { delay_secs: 0 });
    }

    #[test]
    fn test_reminder_optional_date() {
        let action = Action::from_parsed(parsed(
            ActionKind::SetReminder,
            &[("title", "call mom"), ("time", "09:00")],
        ));
        assert_eq!(
            action,
            Action::SetReminder {
                title: "call mom".to_string(),
                time: "09:00".to_string(),
                date: None,
            }
        );
    }
}
