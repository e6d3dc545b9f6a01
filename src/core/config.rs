//! # Configuration
//!
//! Environment-driven assistant configuration with sensible defaults.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Added search engine table and default application table
//! - 1.0.0: Initial creation with wake word, data dir, and API keys

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Assistant-wide configuration, read once at startup.
///
/// Values come from the environment (a `.env` file is loaded by the binary
/// before this runs); everything has a default so the assistant starts
/// without any configuration at all, with remote lookups degrading to
/// "API key not configured" responses.
#[derive(Debug, Clone)]
pub struct Config {
    /// Display name used in log output and the console speech prefix.
    pub assistant_name: String,
    /// Trigger token that must prefix an utterance (word-boundary match).
    pub wake_word: String,
    /// Directory holding the JSON stores (reminders, calendar, app paths,
    /// response overrides).
    pub data_dir: PathBuf,
    /// OpenWeatherMap API key.
    pub weather_api_key: String,
    /// NewsAPI key.
    pub news_api_key: String,
    /// Wolfram Alpha short-answers API key.
    pub wolfram_api_key: String,
    /// Search engine name → base URL (query appended as `q` parameter).
    pub search_engines: HashMap<String, String>,
    /// Engine used when a rule does not force one.
    pub default_search_engine: String,
    /// Built-in application name → launch command table. Overlaid by the
    /// user-registered paths in `app_paths.json`.
    pub default_applications: HashMap<String, String>,
}

impl Config {
    /// Build configuration from the environment.
    pub fn from_env() -> Self {
        let assistant_name =
            env::var("VALET_NAME").unwrap_or_else(|_| "Valet".to_string());
        let wake_word = env::var("VALET_WAKE_WORD")
            .unwrap_or_else(|_| assistant_name.to_lowercase());
        let data_dir = env::var("VALET_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        Config {
            assistant_name,
            wake_word,
            data_dir,
            weather_api_key: env::var("WEATHER_API_KEY").unwrap_or_default(),
            news_api_key: env::var("NEWS_API_KEY").unwrap_or_default(),
            wolfram_api_key: env::var("WOLFRAM_API_KEY").unwrap_or_default(),
            search_engines: default_search_engines(),
            default_search_engine: env::var("VALET_SEARCH_ENGINE")
                .unwrap_or_else(|_| "google".to_string()),
            default_applications: default_applications(),
        }
    }

    /// Path of a named JSON store inside the data directory.
    pub fn store_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }
}

fn default_search_engines() -> HashMap<String, String> {
    let mut engines = HashMap::new();
    engines.insert(
        "google".to_string(),
        "https://www.google.com/search".to_string(),
    );
    engines.insert(
        "bing".to_string(),
        "https://www.bing.com/search".to_string(),
    );
    engines.insert(
        "duckduckgo".to_string(),
        "https://duckduckgo.com/".to_string(),
    );
    engines
}

/// Applications known out of the box. Launch commands are platform
/// commands, so this table is most useful on Linux/macOS; Windows users
/// register explicit paths via `register_app`.
fn default_applications() -> HashMap<String, String> {
    let mut apps = HashMap::new();
    for name in [
        "chrome", "chromium", "firefox", "code", "gedit", "nautilus",
    ] {
        apps.insert(name.to_string(), name.to_string());
    }
    apps.insert("calculator".to_string(), "gnome-calculator".to_string());
    apps.insert("terminal".to_string(), "gnome-terminal".to_string());
    apps.insert("files".to_string(), "nautilus".to_string());
    apps
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    // Env vars are process-global and the test harness runs on multiple
    // threads, so every test that touches them serializes on this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[test]
    fn test_defaults_without_env() {
        let _guard = env_lock();
        env::remove_var("VALET_NAME");
        env::remove_var("VALET_WAKE_WORD");
        env::remove_var("VALET_DATA_DIR");

        let config = Config::from_env();
        assert_eq!(config.assistant_name, "Valet");
        assert_eq!(config.wake_word, "valet");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.default_search_engine, "google");
    }

    #[test]
    fn test_wake_word_defaults_to_lowercased_name() {
        let _guard = env_lock();
        env::set_var("VALET_NAME", "Jarvis");
        env::remove_var("VALET_WAKE_WORD");

        let config = Config::from_env();
        assert_eq!(config.wake_word, "jarvis");

        env::remove_var("VALET_NAME");
    }

    #[test]
    fn test_store_path_joins_data_dir() {
        let _guard = env_lock();
        env::set_var("VALET_DATA_DIR", "/tmp/valet-test");
        let config = Config::from_env();
        assert_eq!(
            config.store_path("reminders.json"),
            PathBuf::from("/tmp/valet-test/reminders.json")
        );
        env::remove_var("VALET_DATA_DIR");
    }

    #[test]
    fn test_search_engine_table() {
        let engines = default_search_engines();
        assert!(engines.contains_key("google"));
        assert!(engines.contains_key("bing"));
        assert!(engines.contains_key("duckduckgo"));
    }
}
