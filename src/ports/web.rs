//! Web information services
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Weather, headlines, topic summaries and computed answers

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use crate::core::{SkillError, SkillResult};

/// Current conditions for one city, metric units.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub description: String,
    pub humidity: u8,
    pub wind_speed: f64,
}

/// One news headline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub title: String,
    pub source: String,
}

/// Encyclopedia-style summary of a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSummary {
    pub title: String,
    pub summary: String,
}

/// Remote knowledge services the lookup skill draws on. Each method maps
/// to one upstream provider; failures surface as [`SkillError::Upstream`]
/// so the skill can fall through to the next provider.
#[async_trait]
pub trait WebInfoPort: Send + Sync {
    /// Current weather for a city.
    async fn weather(&self, city: &str) -> SkillResult<WeatherReport>;

    /// Top headlines for a news category.
    async fn news(&self, category: &str) -> SkillResult<Vec<Headline>>;

    /// Short encyclopedia summary of a topic.
    async fn topic_summary(&self, topic: &str) -> SkillResult<TopicSummary>;

    /// Short computed answer to a factual or mathematical question.
    async fn compute(&self, query: &str) -> SkillResult<String>;
}

// ===== HTTP implementation =====

const WEATHER_URL: &str = "http://api.openweathermap.org/data/2.5/weather";
const NEWS_URL: &str = "https://newsapi.org/v2/top-headlines";
const WIKIPEDIA_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";
const WOLFRAM_URL: &str = "http://api.wolframalpha.com/v1/result";

/// [`WebInfoPort`] over the public OpenWeatherMap, NewsAPI, Wikipedia and
/// Wolfram Alpha endpoints. Keys are optional; a call whose provider has
/// no key fails with a not-configured error instead of an HTTP error.
pub struct HttpWebInfo {
    client: reqwest::Client,
    weather_api_key: String,
    news_api_key: String,
    wolfram_api_key: String,
}

#[derive(Deserialize)]
struct OwmResponse {
    name: String,
    sys: OwmSys,
    main: OwmMain,
    weather: Vec<OwmWeather>,
    wind: OwmWind,
}

#[derive(Deserialize)]
struct OwmSys {
    country: String,
}

#[derive(Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Deserialize)]
struct OwmWeather {
    description: String,
}

#[derive(Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Deserialize)]
struct NewsResponse {
    status: String,
    #[serde(default)]
    articles: Vec<NewsArticle>,
}

#[derive(Deserialize)]
struct NewsArticle {
    title: String,
    source: NewsSource,
}

#[derive(Deserialize)]
struct NewsSource {
    name: String,
}

#[derive(Deserialize)]
struct WikiSummary {
    title: String,
    extract: String,
}

impl HttpWebInfo {
    pub fn new(weather_api_key: &str, news_api_key: &str, wolfram_api_key: &str) -> Self {
        HttpWebInfo {
            client: reqwest::Client::new(),
            weather_api_key: weather_api_key.to_string(),
            news_api_key: news_api_key.to_string(),
            wolfram_api_key: wolfram_api_key.to_string(),
        }
    }
}

#[async_trait]
impl WebInfoPort for HttpWebInfo {
    async fn weather(&self, city: &str) -> SkillResult<WeatherReport> {
        if self.weather_api_key.is_empty() {
            return Err(SkillError::Upstream(
                "Weather API key not configured".to_string(),
            ));
        }
        debug!("fetching weather for {city:?}");
        let response = self
            .client
            .get(WEATHER_URL)
            .query(&[
                ("q", city),
                ("appid", self.weather_api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| SkillError::Upstream(e.to_string()))?;
        if !response.status().is_success() {
            return Err(SkillError::Upstream(format!(
                "weather lookup failed for {city:?} ({})",
                response.status()
            )));
        }
        let data: OwmResponse = response
            .json()
            .await
            .map_err(|e| SkillError::Upstream(e.to_string()))?;
        let description = data
            .weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_default();
        Ok(WeatherReport {
            city: data.name,
            country: data.sys.country,
            temperature: data.main.temp,
            feels_like: data.main.feels_like,
            description,
            humidity: data.main.humidity,
            wind_speed: data.wind.speed,
        })
    }

    async fn news(&self, category: &str) -> SkillResult<Vec<Headline>> {
        if self.news_api_key.is_empty() {
            return Err(SkillError::Upstream(
                "News API key not configured".to_string(),
            ));
        }
        debug!("fetching {category:?} headlines");
        let response = self
            .client
            .get(NEWS_URL)
            .query(&[
                ("category", category),
                ("country", "us"),
                ("apiKey", self.news_api_key.as_str()),
                ("pageSize", "5"),
            ])
            .send()
            .await
            .map_err(|e| SkillError::Upstream(e.to_string()))?;
        let data: NewsResponse = response
            .json()
            .await
            .map_err(|e| SkillError::Upstream(e.to_string()))?;
        if data.status != "ok" {
            return Err(SkillError::Upstream(
                "news lookup failed".to_string(),
            ));
        }
        Ok(data
            .articles
            .into_iter()
            .map(|a| Headline {
                title: a.title,
                source: a.source.name,
            })
            .collect())
    }

    async fn topic_summary(&self, topic: &str) -> SkillResult<TopicSummary> {
        debug!("fetching summary for {topic:?}");
        let response = self
            .client
            .get(summary_url(topic))
            .send()
            .await
            .map_err(|e| SkillError::Upstream(e.to_string()))?;
        if !response.status().is_success() {
            return Err(SkillError::NotFound(format!(
                "No results found for '{topic}'"
            )));
        }
        let data: WikiSummary = response
            .json()
            .await
            .map_err(|e| SkillError::Upstream(e.to_string()))?;
        Ok(TopicSummary {
            title: data.title,
            summary: data.extract,
        })
    }

    async fn compute(&self, query: &str) -> SkillResult<String> {
        if self.wolfram_api_key.is_empty() {
            return Err(SkillError::Upstream(
                "Wolfram Alpha API key not configured".to_string(),
            ));
        }
        debug!("asking for a computed answer to {query:?}");
        let response = self
            .client
            .get(WOLFRAM_URL)
            .query(&[
                ("appid", self.wolfram_api_key.as_str()),
                ("i", query),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| SkillError::Upstream(e.to_string()))?;
        if !response.status().is_success() {
            return Err(SkillError::Upstream(
                "I don't know how to answer that".to_string(),
            ));
        }
        response
            .text()
            .await
            .map_err(|e| SkillError::Upstream(e.to_string()))
    }
}

/// Summary endpoint URL for a topic. Spaces become underscores first (the
/// endpoint's title convention); everything else is percent-encoded by the
/// URL type's path-segment rules.
fn summary_url(topic: &str) -> reqwest::Url {
    let title = topic.trim().replace(' ', "_");
    let mut url =
        reqwest::Url::parse(WIKIPEDIA_URL).expect("summary endpoint URL must parse");
    url.path_segments_mut()
        .expect("summary endpoint URL has a path")
        .push(&title);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_url_encodes_topics() {
        assert_eq!(
            summary_url("Ada Lovelace").as_str(),
            format!("{WIKIPEDIA_URL}/Ada_Lovelace")
        );
        assert_eq!(
            summary_url("caf\u{e9}").as_str(),
            format!("{WIKIPEDIA_URL}/caf%C3%A9")
        );
        // A slash in the topic must stay one encoded segment.
        assert_eq!(
            summary_url("AC/DC").as_str(),
            format!("{WIKIPEDIA_URL}/AC%2FDC")
        );
    }

    #[tokio::test]
    async fn test_missing_keys_fail_without_network() {
        let port = HttpWebInfo::new("", "", "");
        let err = port.weather("paris").await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
        let err = port.news("general").await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
        let err = port.compute("2+2").await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }
}
