//! Ordered rule table for the command router
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Added reminder and calendar blocks between news and control
//! - 1.0.0: Initial table

use regex::Regex;

/// Closed set of action tags a rule can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    OpenApp,
    WebSearch,
    GetInfo,
    PlayYoutube,
    OpenWebsite,
    GetWeather,
    GetNews,
    GetTime,
    GetDate,
    GetSystemInfo,
    Shutdown,
    Restart,
    CancelShutdown,
    SetReminder,
    ListReminders,
    CancelReminder,
    ClearReminders,
    AddEvent,
    GetEvents,
    RemoveEvent,
    AskQuestion,
    Exit,
    Greet,
    Thanks,
    Unknown,
}

/// One routing rule: a pattern, the action it maps to, the named capture
/// groups it extracts, and fixed parameter overrides merged in after the
/// captures (a rule can force `engine=bing`, for example).
///
/// Rules are immutable after construction.
pub struct Rule {
    pattern: Regex,
    kind: ActionKind,
    params: &'static [&'static str],
    overrides: &'static [(&'static str, &'static str)],
}

impl Rule {
    /// Compile a rule. Patterns are case-insensitive and anchored at the
    /// start of the text only: like the router's classification contract,
    /// a rule matches a prefix of the utterance, not necessarily all of it.
    fn new(
        pattern: &str,
        kind: ActionKind,
        params: &'static [&'static str],
        overrides: &'static [(&'static str, &'static str)],
    ) -> Rule {
        let pattern = Regex::new(&format!("^(?i:{pattern})"))
            .expect("rule table pattern must compile");
        Rule {
            pattern,
            kind,
            params,
            overrides,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn params(&self) -> &'static [&'static str] {
        self.params
    }

    pub fn overrides(&self) -> &'static [(&'static str, &'static str)] {
        self.overrides
    }

    /// Construct an arbitrary rule for router tests.
    #[cfg(test)]
    pub(crate) fn test_rule(
        pattern: &str,
        kind: ActionKind,
        params: &'static [&'static str],
        overrides: &'static [(&'static str, &'static str)],
    ) -> Rule {
        Rule::new(pattern, kind, params, overrides)
    }
}

const TIME: &str = r"\d{1,2}:\d{2}(\s?[ap]m)?";
const DATE: &str = r"[\d/-]+";

/// The default rule table.
///
/// Declaration order is load-bearing: rules are tried top to bottom and the
/// first prefix match wins, so reordering entries changes routing. Known
/// consequences that callers rely on:
/// - `open <name>` always routes to `OpenApp`; the `OpenWebsite` rule only
///   fires for `go to` / `navigate to` phrasings.
/// - `what is the weather in <city>` routes to `GetInfo` because the
///   knowledge rule precedes the weather block.
/// - the bare `news` rule shadows the category variants for utterances
///   starting with "news".
pub fn default_rules() -> Vec<Rule> {
    vec![
        // App control commands
        Rule::new(r"open\s+(?P<app_name>[\w\s]+)", ActionKind::OpenApp, &["app_name"], &[]),
        Rule::new(r"launch\s+(?P<app_name>[\w\s]+)", ActionKind::OpenApp, &["app_name"], &[]),
        Rule::new(r"start\s+(?P<app_name>[\w\s]+)", ActionKind::OpenApp, &["app_name"], &[]),
        Rule::new(r"run\s+(?P<app_name>[\w\s]+)", ActionKind::OpenApp, &["app_name"], &[]),
        // Web commands
        Rule::new(r"search\s+(for\s+)?(?P<query>.+)", ActionKind::WebSearch, &["query"], &[]),
        Rule::new(r"google\s+(?P<query>.+)", ActionKind::WebSearch, &["query"], &[]),
        Rule::new(
            r"bing\s+(?P<query>.+)",
            ActionKind::WebSearch,
            &["query"],
            &[("engine", "bing")],
        ),
        Rule::new(
            r"(open|go\s+to|navigate\s+to)\s+(the\s+)?(website\s+)?(?P<url>[\w\.]+\.\w+)",
            ActionKind::OpenWebsite,
            &["url"],
            &[],
        ),
        Rule::new(
            r"(tell me about|what is|who is|search for)\s+(?P<query>.+)",
            ActionKind::GetInfo,
            &["query"],
            &[],
        ),
        Rule::new(
            r"play\s+(?P<video>.+)\s+on\s+youtube",
            ActionKind::PlayYoutube,
            &["video"],
            &[],
        ),
        Rule::new(r"youtube\s+(?P<video>.+)", ActionKind::PlayYoutube, &["video"], &[]),
        // Weather commands
        Rule::new(
            r"(what('s| is) the )?weather( like)? (in|at|for) (?P<city>[\w\s]+)",
            ActionKind::GetWeather,
            &["city"],
            &[],
        ),
        Rule::new(
            r"(how('s| is) the )?weather( like)? (in|at|for) (?P<city>[\w\s]+)",
            ActionKind::GetWeather,
            &["city"],
            &[],
        ),
        Rule::new(
            r"(what('s| is) the )?temperature (in|at|for) (?P<city>[\w\s]+)",
            ActionKind::GetWeather,
            &["city"],
            &[],
        ),
        // System commands
        Rule::new(r"(what('s| is) the )?time", ActionKind::GetTime, &[], &[]),
        Rule::new(r"(what('s| is) the )?date", ActionKind::GetDate, &[], &[]),
        Rule::new(
            r"(what('s| is) (my )?)?(system|computer) (info|information)",
            ActionKind::GetSystemInfo,
            &[],
            &[],
        ),
        Rule::new(
            r"shutdown( computer| system)?( in (?P<delay>\d+)( seconds)?)?",
            ActionKind::Shutdown,
            &["delay"],
            &[],
        ),
        Rule::new(
            r"restart( computer| system)?( in (?P<delay>\d+)( seconds)?)?",
            ActionKind::Restart,
            &["delay"],
            &[],
        ),
        Rule::new(r"cancel shutdown", ActionKind::CancelShutdown, &[], &[]),
        // News commands
        Rule::new(r"(what('s| is) the )?news", ActionKind::GetNews, &[], &[]),
        Rule::new(
            r"(what('s| is) the )?(latest|recent) news",
            ActionKind::GetNews,
            &[],
            &[],
        ),
        Rule::new(
            r"(what('s| is) the )?news (on|about|for) (?P<category>\w+)",
            ActionKind::GetNews,
            &["category"],
            &[],
        ),
        // Reminder commands
        Rule::new(
            &format!(r"remind me( to)? (?P<title>.+?) at (?P<time>{TIME})( on (?P<date>{DATE}))?"),
            ActionKind::SetReminder,
            &["title", "time", "date"],
            &[],
        ),
        Rule::new(
            &format!(
                r"(set|add|create)( a)? reminder( to| for)? (?P<title>.+?) at (?P<time>{TIME})( on (?P<date>{DATE}))?"
            ),
            ActionKind::SetReminder,
            &["title", "time", "date"],
            &[],
        ),
        Rule::new(
            r"(list|show|what are)( my| all)? reminders",
            ActionKind::ListReminders,
            &[],
            &[],
        ),
        Rule::new(
            r"cancel( the| my)? reminder( for| about| to)? (?P<title>.+)",
            ActionKind::CancelReminder,
            &["title"],
            &[],
        ),
        Rule::new(
            r"(clear|delete) (completed |old |finished )?reminders",
            ActionKind::ClearReminders,
            &[],
            &[],
        ),
        // Calendar commands
        Rule::new(
            &format!(
                r"add( an)? event (?P<title>.+?) on (?P<date>{DATE})( at (?P<time>{TIME}))?"
            ),
            ActionKind::AddEvent,
            &["title", "date", "time"],
            &[],
        ),
        Rule::new(
            &format!(
                r"(what('s| is) on my calendar|show my calendar|list events|what events do i have)( (on|for) (?P<date>{DATE}))?"
            ),
            ActionKind::GetEvents,
            &["date"],
            &[],
        ),
        Rule::new(
            r"remove( the)? event (?P<title>.+)",
            ActionKind::RemoveEvent,
            &["title"],
            &[],
        ),
        // Control commands
        Rule::new(r"(goodbye|bye|exit|quit|stop)", ActionKind::Exit, &[], &[]),
        Rule::new(r"(shut( )?down|turn off)", ActionKind::Exit, &[], &[]),
        Rule::new(r"(hello|hi|hey|greetings)", ActionKind::Greet, &[], &[]),
        Rule::new(r"(thank you|thanks)", ActionKind::Thanks, &[], &[]),
        // General questions
        Rule::new(
            r"(what is|calculate|compute|what('s| is) the value of) (?P<query>.+)",
            ActionKind::AskQuestion,
            &["query"],
            &[],
        ),
        Rule::new(r"(who is|who was) (?P<query>.+)", ActionKind::AskQuestion, &["query"], &[]),
        Rule::new(r"(how (to|do i)) (?P<query>.+)", ActionKind::AskQuestion, &["query"], &[]),
        Rule::new(r"(where is|locate) (?P<query>.+)", ActionKind::AskQuestion, &["query"], &[]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_compile() {
        let rules = default_rules();
        assert!(rules.len() > 30);
    }

    #[test]
    fn test_rule_order_is_stable() {
        // The table must start with the app-control block and end with the
        // general-question block; this guards accidental reordering.
        let rules = default_rules();
        assert_eq!(rules[0].kind(), ActionKind::OpenApp);
        assert_eq!(rules[4].kind(), ActionKind::WebSearch);
        assert_eq!(rules.last().unwrap().kind(), ActionKind::AskQuestion);
    }

    #[test]
    fn test_bing_rule_carries_engine_override() {
        let rules = default_rules();
        let bing = rules
            .iter()
            .find(|r| !r.overrides().is_empty())
            .expect("one rule has an override");
        assert_eq!(bing.kind(), ActionKind::WebSearch);
        assert_eq!(bing.overrides(), &[("engine", "bing")]);
    }

    #[test]
    fn test_patterns_match_prefix_only() {
        let rules = default_rules();
        // "open chrome and more" still matches the first rule at the start.
        assert!(rules[0].pattern().is_match("open chrome and more"));
        // But not mid-string.
        assert!(!rules[0].pattern().is_match("please open chrome"));
    }
}
