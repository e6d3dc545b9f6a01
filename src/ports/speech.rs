//! Speech input and output
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use async_trait::async_trait;
use log::warn;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// User-facing voice channel. `listen` yields the raw utterance; a silent
/// failure comes back as an empty string (the caller keeps listening), and
/// `None` means the channel itself is gone and no more input will arrive.
#[async_trait]
pub trait SpeechPort: Send {
    async fn listen(&mut self) -> Option<String>;
    async fn speak(&self, text: &str);
}

/// Console stand-in for a microphone and speaker: reads utterances line by
/// line from stdin and prints replies prefixed with the assistant's name.
pub struct ConsoleSpeech {
    name: String,
    lines: Lines<BufReader<Stdin>>,
}

impl ConsoleSpeech {
    pub fn new(name: &str) -> Self {
        ConsoleSpeech {
            name: name.to_string(),
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

#[async_trait]
impl SpeechPort for ConsoleSpeech {
    async fn listen(&mut self) -> Option<String> {
        match self.lines.next_line().await {
            Ok(Some(line)) => Some(line),
            // End of input: the console is closed for good.
            Ok(None) => None,
            Err(e) => {
                warn!("could not read input: {e}");
                Some(String::new())
            }
        }
    }

    async fn speak(&self, text: &str) {
        println!("{}: {}", self.name, text);
    }
}
