//! # Assistant Orchestrator
//!
//! The conversation loop: listen, gate on the wake word, route, dispatch
//! to a skill, speak the reply.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Exhaustive dispatch over typed actions

use std::sync::Arc;

use log::{error, info};

use crate::core::{Config, SkillError};
use crate::features::{
    Action, AppLauncher, CalendarBook, CommandRouter, LookupSkill, ReminderScheduler,
    ReminderStatus, ResponseRepository,
};
use crate::ports::{SpeechPort, SystemPort};

/// Outcome of one dispatched utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub success: bool,
    pub message: String,
    pub exit: bool,
}

impl Reply {
    fn ok(message: String) -> Reply {
        Reply {
            success: true,
            message,
            exit: false,
        }
    }

    fn failed(message: String) -> Reply {
        Reply {
            success: false,
            message,
            exit: false,
        }
    }
}

/// Wires the router, skills and ports into one conversation loop.
pub struct Assistant {
    config: Config,
    router: CommandRouter,
    responses: ResponseRepository,
    reminders: Arc<ReminderScheduler>,
    calendar: CalendarBook,
    apps: AppLauncher,
    lookup: LookupSkill,
    system: Arc<dyn SystemPort>,
}

impl Assistant {
    pub fn new(
        config: Config,
        reminders: Arc<ReminderScheduler>,
        calendar: CalendarBook,
        apps: AppLauncher,
        lookup: LookupSkill,
        system: Arc<dyn SystemPort>,
    ) -> Self {
        let router = CommandRouter::new(&config.wake_word);
        let responses = ResponseRepository::with_overrides(&config.store_path("responses.json"));
        Assistant {
            config,
            router,
            responses,
            reminders,
            calendar,
            apps,
            lookup,
            system,
        }
    }

    /// Dispatch one utterance and produce the spoken reply.
    ///
    /// Skill errors never propagate out of here: they are logged and turned
    /// into a spoken failure message, with the generic error pool covering
    /// skills that fail without a user-facing phrasing.
    pub async fn respond(&mut self, text: &str) -> Reply {
        let action = self.router.route(text);
        info!("dispatching {action:?}");

        let result = match action {
            Action::OpenApp { app_name } => self.apps.open_app(&app_name),
            Action::WebSearch { query, engine } => {
                self.lookup.search(&query, engine.as_deref())
            }
            Action::GetInfo { query } => self.lookup.get_info(&query).await,
            Action::PlayYoutube { video } => self.lookup.play_youtube(&video),
            Action::OpenWebsite { url } => self.system.open_website(&url),
            Action::GetWeather { city } => self.lookup.get_weather(&city).await,
            Action::GetNews { category } => self.lookup.get_news(&category).await,
            Action::GetTime => Ok(format!(
                "It's {}",
                chrono::Local::now().format("%I:%M %p")
            )),
            Action::GetDate => Ok(format!(
                "Today is {}",
                chrono::Local::now().format("%A, %B %d, %Y")
            )),
            Action::GetSystemInfo => Ok(self.system.system_info().to_string()),
            Action::Shutdown { delay_secs } => self.system.shutdown(delay_secs),
            Action::Restart { delay_secs } => self.system.restart(delay_secs),
            Action::CancelShutdown => self.system.cancel_shutdown(),
            Action::SetReminder { title, time, date } => {
                self.reminders
                    .add_reminder(&title, &time, date.as_deref())
                    .await
            }
            Action::ListReminders => Ok(self.format_pending_reminders().await),
            Action::CancelReminder { title } => {
                self.reminders.cancel_reminder(None, Some(&title)).await
            }
            Action::ClearReminders => self.reminders.clear_completed_reminders().await,
            Action::AddEvent { title, date, time } => {
                self.calendar.add_event(&title, &date, time.as_deref(), None)
            }
            Action::GetEvents { date } => self
                .calendar
                .get_events(date.as_deref())
                .map(format_events),
            Action::RemoveEvent { title } => self.calendar.remove_event(&title, None),
            Action::AskQuestion { query } => self.lookup.ask_question(&query).await,
            Action::Greet => Ok(self.responses.random("greeting")),
            Action::Thanks => Ok(self.responses.random("thanks")),
            Action::Exit => {
                return Reply {
                    success: true,
                    message: self.responses.random("farewell"),
                    exit: true,
                }
            }
            Action::Unknown { .. } => {
                return Reply::failed(self.responses.random("unknown_command"))
            }
        };

        match result {
            Ok(message) if message.is_empty() => Reply::ok(self.responses.random("success")),
            Ok(message) => Reply::ok(message),
            Err(e) => {
                error!("skill failed: {e}");
                let message = match &e {
                    // These carry phrasings meant for the user.
                    SkillError::Validation(m)
                    | SkillError::NotFound(m)
                    | SkillError::Parse(m)
                    | SkillError::Unsupported(m) => m.clone(),
                    SkillError::Persistence(_) | SkillError::Upstream(_) => {
                        self.responses.random("error")
                    }
                };
                Reply::failed(message)
            }
        }
    }

    async fn format_pending_reminders(&self) -> String {
        let pending = self.reminders.get_reminders(Some(ReminderStatus::Pending)).await;
        if pending.is_empty() {
            return "You have no pending reminders.".to_string();
        }
        let mut lines = vec![format!("You have {} pending reminders:", pending.len())];
        for (i, r) in pending.iter().enumerate() {
            lines.push(format!(
                "{}. {} at {} on {}",
                i + 1,
                r.title,
                r.due.format("%I:%M %p"),
                r.due.format("%A, %B %d, %Y")
            ));
        }
        lines.join("\n")
    }

    /// Run the conversation loop until the user says goodbye or input ends.
    pub async fn run(&mut self, speech: &mut dyn SpeechPort) {
        info!("{} ready (wake word {:?})", self.config.assistant_name, self.config.wake_word);
        speech.speak(&self.responses.random("greeting")).await;

        loop {
            let heard = match speech.listen().await {
                Some(line) => line,
                // Channel closed; say goodbye and stop.
                None => {
                    speech.speak(&self.responses.random("farewell")).await;
                    break;
                }
            };
            let heard = heard.trim();
            // Silence is not an exit; keep listening.
            if heard.is_empty() {
                continue;
            }
            if !self.router.is_wake_word(heard) {
                continue;
            }
            let reply = self.respond(heard).await;
            speech.speak(&reply.message).await;
            if reply.exit {
                break;
            }
        }
        info!("conversation loop ended");
    }
}

fn format_events(events: Vec<crate::features::Event>) -> String {
    let mut lines = vec![format!("You have {} events:", events.len())];
    for (i, event) in events.iter().enumerate() {
        let when = match &event.time {
            Some(time) => format!("{} at {}", event.date, time),
            None => event.date.clone(),
        };
        lines.push(format!("{}. {} on {}", i + 1, event.title, when));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::core::SkillResult;
    use crate::features::ReminderStore;
    use crate::ports::{
        Headline, SystemReport, TopicSummary, WeatherReport, WebInfoPort,
    };

    struct FakeSystem {
        opened: Mutex<Vec<String>>,
    }

    impl SystemPort for FakeSystem {
        fn launch(&self, _program: &str) -> SkillResult<()> {
            Ok(())
        }

        fn open_website(&self, url: &str) -> SkillResult<String> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(format!("Opening {url}"))
        }

        fn system_info(&self) -> SystemReport {
            SystemReport {
                os_name: "TestOS".to_string(),
                os_version: "1".to_string(),
                kernel_version: "1".to_string(),
                host_name: "box".to_string(),
                arch: "x86_64".to_string(),
                total_memory_mb: 8,
            }
        }

        fn shutdown(&self, _delay_secs: u32) -> SkillResult<String> {
            Err(SkillError::Unsupported(
                "Shutdown functionality is only available on Windows".to_string(),
            ))
        }

        fn restart(&self, _delay_secs: u32) -> SkillResult<String> {
            Err(SkillError::Unsupported(
                "Restart functionality is only available on Windows".to_string(),
            ))
        }

        fn cancel_shutdown(&self) -> SkillResult<String> {
            Err(SkillError::Unsupported(
                "Cancel shutdown functionality is only available on Windows".to_string(),
            ))
        }
    }

    struct FakeWeb;

    #[async_trait]
    impl WebInfoPort for FakeWeb {
        async fn weather(&self, _city: &str) -> SkillResult<WeatherReport> {
            Ok(WeatherReport {
                city: "Paris".to_string(),
                country: "FR".to_string(),
                temperature: 18.0,
                feels_like: 18.0,
                description: "clear sky".to_string(),
                humidity: 60,
                wind_speed: 3.0,
            })
        }

        async fn news(&self, _category: &str) -> SkillResult<Vec<Headline>> {
            Ok(vec![Headline {
                title: "Story".to_string(),
                source: "Wire".to_string(),
            }])
        }

        async fn topic_summary(&self, _topic: &str) -> SkillResult<TopicSummary> {
            Ok(TopicSummary {
                title: "Topic".to_string(),
                summary: "Summary.".to_string(),
            })
        }

        async fn compute(&self, _query: &str) -> SkillResult<String> {
            Ok("42".to_string())
        }
    }

    /// Scripted speech channel for loop tests.
    struct ScriptedSpeech {
        script: Vec<String>,
    }

    #[async_trait]
    impl SpeechPort for ScriptedSpeech {
        async fn listen(&mut self) -> Option<String> {
            if self.script.is_empty() {
                None
            } else {
                Some(self.script.remove(0))
            }
        }

        async fn speak(&self, _text: &str) {}
    }

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("valet-assistant-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn assistant() -> Assistant {
        let data_dir = temp_dir();
        let config = Config {
            assistant_name: "Valet".to_string(),
            wake_word: "valet".to_string(),
            data_dir: data_dir.clone(),
            weather_api_key: String::new(),
            news_api_key: String::new(),
            wolfram_api_key: String::new(),
            search_engines: HashMap::from([(
                "google".to_string(),
                "https://www.google.com/search".to_string(),
            )]),
            default_search_engine: "google".to_string(),
            default_applications: HashMap::new(),
        };
        let system: Arc<dyn SystemPort> = Arc::new(FakeSystem {
            opened: Mutex::new(Vec::new()),
        });
        let reminders = Arc::new(ReminderScheduler::load(ReminderStore::new(
            config.store_path("reminders.json"),
        )));
        let calendar = CalendarBook::load(config.store_path("calendar_events.json"));
        let apps = AppLauncher::load(
            system.clone(),
            &config.default_applications,
            config.store_path("app_paths.json"),
        );
        let lookup = LookupSkill::new(
            Arc::new(FakeWeb),
            system.clone(),
            config.search_engines.clone(),
            &config.default_search_engine,
        );
        Assistant::new(config, reminders, calendar, apps, lookup, system)
    }

    #[tokio::test]
    async fn test_time_and_date_replies() {
        let mut a = assistant();
        let reply = a.respond("valet what's the time").await;
        assert!(reply.success);
        assert!(reply.message.starts_with("It's "));

        let reply = a.respond("what's the date").await;
        assert!(reply.message.starts_with("Today is "));
    }

    #[tokio::test]
    async fn test_weather_goes_through_lookup() {
        let mut a = assistant();
        let reply = a.respond("weather in paris").await;
        assert!(reply.success);
        assert!(reply.message.contains("Paris, FR"));
    }

    #[tokio::test]
    async fn test_reminder_round_trip() {
        let mut a = assistant();
        let reply = a
            .respond("remind me to call mom at 09:00 on 2031-01-15")
            .await;
        assert!(reply.success, "{}", reply.message);
        assert!(reply.message.contains("call mom"));

        let reply = a.respond("list reminders").await;
        assert!(reply.message.contains("1. call mom"));

        let reply = a.respond("cancel the reminder to call mom").await;
        assert!(reply.success);

        let reply = a.respond("list reminders").await;
        assert_eq!(reply.message, "You have no pending reminders.");
    }

    #[tokio::test]
    async fn test_calendar_round_trip() {
        let mut a = assistant();
        let reply = a.respond("add event dentist on 2031-03-02 at 14:30").await;
        assert!(reply.success, "{}", reply.message);

        let reply = a.respond("what's on my calendar for 2031-03-02").await;
        assert!(reply.message.contains("dentist"));
        assert!(reply.message.contains("14:30"));

        let reply = a.respond("remove the event dentist").await;
        assert!(reply.success);
    }

    #[tokio::test]
    async fn test_unknown_command_uses_fallback_pool() {
        let mut a = assistant();
        let reply = a.respond("valet frobnicate the gizmo").await;
        assert!(!reply.success);
        assert!(!reply.exit);
        assert!(!reply.message.is_empty());
    }

    #[tokio::test]
    async fn test_exit_sets_flag_and_says_farewell() {
        let mut a = assistant();
        let reply = a.respond("goodbye").await;
        assert!(reply.exit);
        assert!(!reply.message.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_power_op_is_spoken_not_fatal() {
        let mut a = assistant();
        let reply = a.respond("cancel shutdown").await;
        assert!(!reply.success);
        assert!(reply.message.contains("only available on Windows"));
    }

    #[tokio::test]
    async fn test_past_reminder_date_reports_validation() {
        let mut a = assistant();
        let reply = a
            .respond("remind me to call mom at 09:00 on 2020-01-01")
            .await;
        assert!(!reply.success);
        assert!(reply.message.contains("past"));
    }

    #[tokio::test]
    async fn test_run_loop_honors_wake_word_and_exit() {
        let mut a = assistant();
        let mut speech = ScriptedSpeech {
            script: vec![
                "what's the time".to_string(),
                "valet goodbye".to_string(),
                "valet what's the time".to_string(),
            ],
        };
        a.run(&mut speech).await;
        // The un-gated first line is ignored, the goodbye exits, and the
        // third line is never consumed.
        assert_eq!(speech.script.len(), 1);
    }

    #[tokio::test]
    async fn test_run_loop_keeps_listening_through_silence() {
        let mut a = assistant();
        let mut speech = ScriptedSpeech {
            script: vec![
                String::new(),
                "   ".to_string(),
                "valet goodbye".to_string(),
            ],
        };
        a.run(&mut speech).await;
        // Empty and blank utterances are skipped, not treated as exits;
        // the goodbye after them must still be heard.
        assert!(speech.script.is_empty());
    }
}
