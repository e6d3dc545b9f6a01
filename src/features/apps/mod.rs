//! # App Launcher Feature
//!
//! Named application launching with user-registered path overrides.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Known-app table with `app_paths.json` overlay

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use log::warn;

use crate::core::{SkillError, SkillResult};
use crate::ports::SystemPort;

/// Spoken filler that routinely leaks into the captured app name.
const FILLER_PHRASES: &[&str] = &["the", "application", "app", "program", "for me", "please"];

/// Resolves spoken application names to launchable paths.
///
/// Resolution order: user-registered paths from `app_paths.json` shadow the
/// built-in defaults, and a name known to neither is tried verbatim on the
/// search path.
pub struct AppLauncher {
    system: Arc<dyn SystemPort>,
    paths: HashMap<String, String>,
    overrides_path: PathBuf,
}

impl AppLauncher {
    /// Launcher over `defaults`, overlaid with any registered paths stored
    /// at `overrides_path`.
    pub fn load(
        system: Arc<dyn SystemPort>,
        defaults: &HashMap<String, String>,
        overrides_path: impl Into<PathBuf>,
    ) -> Self {
        let overrides_path = overrides_path.into();
        let mut paths = defaults.clone();
        if overrides_path.exists() {
            match fs::read_to_string(&overrides_path) {
                Ok(contents) => match serde_json::from_str::<HashMap<String, String>>(&contents) {
                    Ok(custom) => paths.extend(custom),
                    Err(e) => warn!("could not parse {}: {e}", overrides_path.display()),
                },
                Err(e) => warn!("could not read {}: {e}", overrides_path.display()),
            }
        }
        AppLauncher {
            system,
            paths,
            overrides_path,
        }
    }

    /// Strip filler words from a spoken app name.
    fn clean_name(raw: &str) -> String {
        let mut name = raw.trim().to_lowercase();
        for phrase in FILLER_PHRASES {
            name = name.replace(phrase, "");
        }
        name.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Launch an application by its spoken name.
    pub fn open_app(&self, raw_name: &str) -> SkillResult<String> {
        let name = Self::clean_name(raw_name);
        if name.is_empty() {
            return Err(SkillError::Validation(
                "No application name provided".to_string(),
            ));
        }

        let program = self.paths.get(&name).map(String::as_str).unwrap_or(&name);
        self.system
            .launch(program)
            .map_err(|_| SkillError::NotFound(format!("Could not find application: {name}")))?;
        Ok(format!("Opening {name}"))
    }

    /// Register a launch path for a spoken name and persist it.
    pub fn register_app(&mut self, name: &str, path: &str) -> SkillResult<String> {
        if name.trim().is_empty() || path.trim().is_empty() {
            return Err(SkillError::Validation(
                "Both application name and path are required".to_string(),
            ));
        }
        let name = name.trim().to_lowercase();
        self.paths.insert(name.clone(), path.trim().to_string());

        let mut custom: HashMap<String, String> = if self.overrides_path.exists() {
            fs::read_to_string(&self.overrides_path)
                .ok()
                .and_then(|c| serde_json::from_str(&c).ok())
                .unwrap_or_default()
        } else {
            HashMap::new()
        };
        custom.insert(name.clone(), path.trim().to_string());

        if let Some(parent) = self.overrides_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&custom)?;
        let tmp = self.overrides_path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.overrides_path)?;

        Ok(format!("Successfully registered {name}"))
    }
}
