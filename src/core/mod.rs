//! # Core Module
//!
//! Core domain types, configuration, and error handling for the assistant.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod config;
pub mod error;

// Re-export commonly used items
pub use config::Config;
pub use error::{SkillError, SkillResult};
