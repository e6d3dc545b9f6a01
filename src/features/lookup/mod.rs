//! # Lookup Feature
//!
//! Remote knowledge lookups: weather, news, topic summaries, computed
//! answers, web search and YouTube playback.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Provider chain with fallthrough to web search

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use log::debug;

use crate::core::{SkillError, SkillResult};
use crate::ports::{SystemPort, WebInfoPort};

const YOUTUBE_RESULTS_URL: &str = "https://www.youtube.com/results";

/// Answers informational questions by chaining remote providers and hands
/// browser-bound requests to the desktop.
pub struct LookupSkill {
    web: Arc<dyn WebInfoPort>,
    system: Arc<dyn SystemPort>,
    search_engines: HashMap<String, String>,
    default_engine: String,
}

impl LookupSkill {
    pub fn new(
        web: Arc<dyn WebInfoPort>,
        system: Arc<dyn SystemPort>,
        search_engines: HashMap<String, String>,
        default_engine: &str,
    ) -> Self {
        LookupSkill {
            web,
            system,
            search_engines,
            default_engine: default_engine.to_string(),
        }
    }

    /// Spoken weather report for a city.
    pub async fn get_weather(&self, city: &str) -> SkillResult<String> {
        let city = city.trim();
        if city.is_empty() {
            return Err(SkillError::Validation("Please specify a city".to_string()));
        }
        let report = self.web.weather(city).await?;
        Ok(format!(
            "The current weather in {}, {} is {} with a temperature of {}°C, \
             feels like {}°C. Humidity is {}% and wind speed is {} m/s.",
            report.city,
            report.country,
            report.description,
            report.temperature,
            report.feels_like,
            report.humidity,
            report.wind_speed
        ))
    }

    /// Numbered headline list for a news category.
    pub async fn get_news(&self, category: &str) -> SkillResult<String> {
        let headlines = self.web.news(category).await?;
        if headlines.is_empty() {
            return Err(SkillError::NotFound(format!(
                "No {category} headlines right now"
            )));
        }
        let mut response = "Here are the latest headlines:\n\n".to_string();
        for (i, headline) in headlines.iter().enumerate() {
            let _ = writeln!(response, "{}. {} - {}", i + 1, headline.title, headline.source);
        }
        Ok(response)
    }

    /// Encyclopedia summary of a topic, falling through to a web search
    /// when no summary exists.
    pub async fn get_info(&self, query: &str) -> SkillResult<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SkillError::Validation("No query provided".to_string()));
        }
        match self.web.topic_summary(query).await {
            Ok(summary) => Ok(format!("{}: {}", summary.title, summary.summary)),
            Err(e) => {
                debug!("summary lookup failed ({e}), falling back to search");
                self.search(query, None)
            }
        }
    }

    /// General question: computed answer first, then topic summary, then
    /// a plain web search.
    pub async fn ask_question(&self, query: &str) -> SkillResult<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SkillError::Validation("No question provided".to_string()));
        }
        match self.web.compute(query).await {
            Ok(answer) => Ok(answer),
            Err(e) => {
                debug!("computed answer failed ({e}), falling back to summary");
                self.get_info(query).await
            }
        }
    }

    /// Open a web search for `query` in the browser using `engine` (the
    /// configured default when `None`).
    pub fn search(&self, query: &str, engine: Option<&str>) -> SkillResult<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SkillError::Validation(
                "No search query provided".to_string(),
            ));
        }
        let engine = engine.unwrap_or(&self.default_engine);
        let base = self.search_engines.get(engine).ok_or_else(|| {
            SkillError::NotFound(format!("Search engine '{engine}' not found"))
        })?;
        let url = reqwest::Url::parse_with_params(base, &[("q", query)])
            .map_err(|e| SkillError::Parse(format!("bad search URL: {e}")))?;
        self.system.open_website(url.as_str())?;
        Ok(format!("Searching for '{query}' using {engine}"))
    }

    /// Open YouTube search results for a video title in the browser.
    pub fn play_youtube(&self, video: &str) -> SkillResult<String> {
        let video = video.trim();
        if video.is_empty() {
            return Err(SkillError::Validation(
                "No video title provided".to_string(),
            ));
        }
        let url = reqwest::Url::parse_with_params(YOUTUBE_RESULTS_URL, &[("search_query", video)])
            .map_err(|e| SkillError::Parse(format!("bad YouTube URL: {e}")))?;
        self.system.open_website(url.as_str())?;
        Ok(format!("Playing '{video}' on YouTube"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::ports::{Headline, SystemReport, TopicSummary, WeatherReport};

    /// Canned provider: each answer is either fixed data or an upstream
    /// failure, so fallthrough chains can be exercised without a network.
    struct FakeWeb {
        summary_ok: bool,
        compute_ok: bool,
    }

    #[async_trait]
    impl WebInfoPort for FakeWeb {
        async fn weather(&self, _city: &str) -> SkillResult<WeatherReport> {
            Ok(WeatherReport {
                city: "Paris".to_string(),
                country: "FR".to_string(),
                temperature: 18.0,
                feels_like: 16.5,
                description: "clear sky".to_string(),
                humidity: 60,
                wind_speed: 3.2,
            })
        }

        async fn news(&self, category: &str) -> SkillResult<Vec<Headline>> {
            if category == "empty" {
                return Ok(Vec::new());
            }
            Ok(vec![
                Headline {
                    title: "First story".to_string(),
                    source: "Wire".to_string(),
                },
                Headline {
                    title: "Second story".to_string(),
                    source: "Desk".to_string(),
                },
            ])
        }

        async fn topic_summary(&self, topic: &str) -> SkillResult<TopicSummary> {
            if !self.summary_ok {
                return Err(SkillError::NotFound(format!(
                    "No results found for '{topic}'"
                )));
            }
            Ok(TopicSummary {
                title: "Ada Lovelace".to_string(),
                summary: "English mathematician.".to_string(),
            })
        }

        async fn compute(&self, _query: &str) -> SkillResult<String> {
            if !self.compute_ok {
                return Err(SkillError::Upstream(
                    "I don't know how to answer that".to_string(),
                ));
            }
            Ok("42".to_string())
        }
    }

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
                os_name: "test".to_string(),
                os_version: String::new(),
                kernel_version: String::new(),
                host_name: String::new(),
                arch: String::new(),
                total_memory_mb: 0,
            }
        }

        fn shutdown(&self, _delay_secs: u32) -> SkillResult<String> {
            Err(SkillError::Unsupported("test".to_string()))
        }

        fn restart(&self, _delay_secs: u32) -> SkillResult<String> {
            Err(SkillError::Unsupported("test".to_string()))
        }

        fn cancel_shutdown(&self) -> SkillResult<String> {
            Err(SkillError::Unsupported("test".to_string()))
        }
    }

    fn skill(summary_ok: bool, compute_ok: bool) -> (LookupSkill, Arc<FakeSystem>) {
        let system = Arc::new(FakeSystem {
            opened: Mutex::new(Vec::new()),
        });
        let engines = HashMap::from([
            (
                "google".to_string(),
                "https://www.google.com/search".to_string(),
            ),
            ("bing".to_string(), "https://www.bing.com/search".to_string()),
        ]);
        let skill = LookupSkill::new(
            Arc::new(FakeWeb {
                summary_ok,
                compute_ok,
            }),
            system.clone(),
            engines,
            "google",
        );
        (skill, system)
    }

    #[tokio::test]
    async fn test_weather_phrasing() {
        let (skill, _) = skill(true, true);
        let text = skill.get_weather("paris").await.unwrap();
        assert_eq!(
            text,
            "The current weather in Paris, FR is clear sky with a temperature of 18°C, \
             feels like 16.5°C. Humidity is 60% and wind speed is 3.2 m/s."
        );
    }

    #[tokio::test]
    async fn test_weather_requires_city() {
        let (skill, _) = skill(true, true);
        assert!(matches!(
            skill.get_weather("  ").await,
            Err(SkillError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_news_numbering() {
        let (skill, _) = skill(true, true);
        let text = skill.get_news("general").await.unwrap();
        assert!(text.starts_with("Here are the latest headlines:\n\n"));
        assert!(text.contains("1. First story - Wire"));
        assert!(text.contains("2. Second story - Desk"));
    }

    #[tokio::test]
    async fn test_empty_news_reports_not_found() {
        let (skill, _) = skill(true, true);
        assert!(matches!(
            skill.get_news("empty").await,
            Err(SkillError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_info_formats_summary() {
        let (skill, _) = skill(true, true);
        let text = skill.get_info("ada lovelace").await.unwrap();
        assert_eq!(text, "Ada Lovelace: English mathematician.");
    }

    #[tokio::test]
    async fn test_info_falls_back_to_search() {
        let (skill, system) = skill(false, true);
        let text = skill.get_info("zzyzzx").await.unwrap();
        assert_eq!(text, "Searching for 'zzyzzx' using google");
        let opened = system.opened.lock().unwrap();
        assert!(opened[0].starts_with("https://www.google.com/search?q=zzyzzx"));
    }

    #[tokio::test]
    async fn test_question_prefers_computed_answer() {
        let (skill, _) = skill(true, true);
        assert_eq!(skill.ask_question("2+2").await.unwrap(), "42");
    }

    #[tokio::test]
    async fn test_question_chains_down_to_search() {
        let (skill, system) = skill(false, false);
        let text = skill.ask_question("mystery").await.unwrap();
        assert!(text.starts_with("Searching for 'mystery'"));
        assert_eq!(system.opened.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_encodes_query_and_engine() {
        let (skill, system) = skill(true, true);
        let text = skill.search("rust async", Some("bing")).unwrap();
        assert_eq!(text, "Searching for 'rust async' using bing");
        assert_eq!(
            system.opened.lock().unwrap()[0],
            "https://www.bing.com/search?q=rust+async"
        );
    }

    #[tokio::test]
    async fn test_unknown_engine_is_rejected() {
        let (skill, _) = skill(true, true);
        let err = skill.search("rust", Some("altavista")).unwrap_err();
        assert!(err.to_string().contains("'altavista' not found"));
    }

    #[tokio::test]
    async fn test_play_youtube_opens_results() {
        let (skill, system) = skill(true, true);
        let text = skill.play_youtube("lofi beats").unwrap();
        assert_eq!(text, "Playing 'lofi beats' on YouTube");
        assert_eq!(
            system.opened.lock().unwrap()[0],
            "https://www.youtube.com/results?search_query=lofi+beats"
        );
    }
}
