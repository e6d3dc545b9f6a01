//! # Ports
//!
//! Trait seams between the skills and the outside world: speech I/O, web
//! information services, and the desktop. Skills depend on the traits;
//! the binary wires in the concrete implementations.

pub mod speech;
pub mod system;
pub mod web;

pub use speech::{ConsoleSpeech, SpeechPort};
pub use system::{DesktopSystem, SystemPort, SystemReport};
pub use web::{Headline, HttpWebInfo, TopicSummary, WeatherReport, WebInfoPort};
