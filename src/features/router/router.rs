//! Deterministic first-match text classification
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use std::collections::HashMap;

use log::debug;
use regex::Regex;

use super::action::{Action, ParsedCommand};
use super::rules::{default_rules, ActionKind, Rule};

/// Order-sensitive rule-based command router.
///
/// Rules are tried in declaration order; the first whose pattern matches at
/// the start of the normalized text wins. There is no ranking by
/// specificity and no backtracking across rules.
///
/// Wake-word handling is two independent behaviors: [`is_wake_word`]
/// answers the gating question for the caller, while classification always
/// strips a leading `"<wake word> "` prefix regardless of gating.
///
/// [`is_wake_word`]: CommandRouter::is_wake_word
pub struct CommandRouter {
    rules: Vec<Rule>,
    wake_gate: Regex,
    wake_strip: Regex,
}

impl CommandRouter {
    /// Router over the default rule table.
    pub fn new(wake_word: &str) -> Self {
        Self::with_rules(wake_word, default_rules())
    }

    /// Router over an injected rule list (rules stay immutable afterwards).
    pub fn with_rules(wake_word: &str, rules: Vec<Rule>) -> Self {
        let escaped = regex::escape(wake_word);
        let wake_gate = Regex::new(&format!(r"^(?i:{escaped})\b"))
            .expect("wake word gate pattern must compile");
        let wake_strip = Regex::new(&format!(r"^(?i:{escaped})\s+"))
            .expect("wake word strip pattern must compile");
        CommandRouter {
            rules,
            wake_gate,
            wake_strip,
        }
    }

    /// Whether the utterance starts with the wake word (word-boundary,
    /// case-insensitive). Evaluated by the caller; classification does not
    /// depend on it.
    pub fn is_wake_word(&self, text: &str) -> bool {
        self.wake_gate.is_match(text.trim_start())
    }

    /// Classify raw text into an action tag plus extracted parameters.
    ///
    /// Never fails: unmatched or empty text degrades to
    /// [`ActionKind::Unknown`] carrying the normalized text.
    pub fn parse(&self, text: &str) -> ParsedCommand {
        let stripped = self.wake_strip.replace(text.trim_start(), "");
        let normalized = stripped.trim().to_lowercase();

        for rule in &self.rules {
            if let Some(caps) = rule.pattern().captures(&normalized) {
                let mut params = HashMap::new();
                // Captured values first...
                for &name in rule.params() {
                    if let Some(m) = caps.name(name) {
                        params.insert(name.to_string(), m.as_str().trim().to_string());
                    }
                }
                // ...then fixed overrides, which never displace a capture.
                for &(key, value) in rule.overrides() {
                    params
                        .entry(key.to_string())
                        .or_insert_with(|| value.to_string());
                }
                debug!("routed {:?} -> {:?} {:?}", normalized, rule.kind(), params);
                return ParsedCommand {
                    kind: rule.kind(),
                    params,
                };
            }
        }

        debug!("no rule matched {:?}", normalized);
        let mut params = HashMap::new();
        params.insert("text".to_string(), normalized);
        ParsedCommand {
            kind: ActionKind::Unknown,
            params,
        }
    }

    /// Classify raw text into a typed [`Action`].
    pub fn route(&self, text: &str) -> Action {
        Action::from_parsed(self.parse(text))
    }
}
