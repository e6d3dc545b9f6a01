//! # Responses Feature
//!
//! Canned reply pools with random selection and file-based overrides.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Built-in pools plus `responses.json` overlay

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use rand::seq::IndexedRandom;

/// Keyed pools of reply phrasings. Lookup never fails for the built-in
/// keys; unknown keys fall back to the `unknown_command` pool.
pub struct ResponseRepository {
    pools: HashMap<String, Vec<String>>,
}

fn built_in_pools() -> HashMap<String, Vec<String>> {
    let mut pools = HashMap::new();
    let insert = |pools: &mut HashMap<String, Vec<String>>, key: &str, lines: &[&str]| {
        pools.insert(
            key.to_string(),
            lines.iter().map(|s| s.to_string()).collect(),
        );
    };
    insert(
        &mut pools,
        "greeting",
        &[
            "Hello! How can I help you today?",
            "Hi there! What can I do for you?",
            "Good to see you! What do you need?",
        ],
    );
    insert(
        &mut pools,
        "farewell",
        &[
            "Goodbye! Have a great day!",
            "See you later!",
            "Bye! Call me if you need anything.",
        ],
    );
    insert(
        &mut pools,
        "success",
        &["Done!", "All set.", "Consider it done."],
    );
    insert(
        &mut pools,
        "error",
        &[
            "Sorry, something went wrong.",
            "I ran into a problem with that.",
            "That didn't work, I'm afraid.",
        ],
    );
    insert(
        &mut pools,
        "unknown_command",
        &[
            "I'm not sure how to help with that.",
            "Sorry, I didn't understand that command.",
            "Could you rephrase that?",
        ],
    );
    insert(
        &mut pools,
        "thanks",
        &["You're welcome!", "Happy to help!", "Anytime!"],
    );
    pools
}

impl ResponseRepository {
    /// Repository with only the built-in pools.
    pub fn new() -> Self {
        ResponseRepository {
            pools: built_in_pools(),
        }
    }

    /// Built-in pools overlaid with a JSON file mapping keys to phrase
    /// arrays. Overlay keys replace the matching built-in pool wholesale;
    /// a missing or unreadable file leaves the defaults untouched.
    pub fn with_overrides(path: &Path) -> Self {
        let mut repo = ResponseRepository::new();
        if !path.exists() {
            return repo;
        }
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<HashMap<String, Vec<String>>>(&contents) {
                Ok(overrides) => {
                    for (key, lines) in overrides {
                        if lines.is_empty() {
                            continue;
                        }
                        debug!("response pool {key:?} overridden ({} phrases)", lines.len());
                        repo.pools.insert(key, lines);
                    }
                }
                Err(e) => warn!("could not parse {}: {e}", path.display()),
            },
            Err(e) => warn!("could not read {}: {e}", path.display()),
        }
        repo
    }

    /// A random phrase from the pool for `key`, falling back to the
    /// `unknown_command` pool for keys with no pool.
    pub fn random(&self, key: &str) -> String {
        let pool = self
            .pools
            .get(key)
            .filter(|p| !p.is_empty())
            .or_else(|| self.pools.get("unknown_command"));
        match pool.and_then(|p| p.choose(&mut rand::rng())) {
            Some(phrase) => phrase.clone(),
            None => "I'm not sure how to help with that.".to_string(),
        }
    }

    /// All phrasings for `key`, empty when the key has no pool.
    pub fn all(&self, key: &str) -> &[String] {
        self.pools.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for ResponseRepository {
    fn default() -> Self {
        Self::new()
    }
}
