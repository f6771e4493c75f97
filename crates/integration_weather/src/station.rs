//! Multi-station observation feeds
//!
//! Some providers publish one record per station for a whole region instead
//! of answering for a single point. The target station is found by scoring
//! station names against a keyword set.

use async_trait::async_trait;
use domain::WeatherSnapshot;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::client::{WeatherClient, build_http_client, send_for_body};
use crate::config::StationFeedConfig;
use crate::error::WeatherError;
use crate::fields::{FieldTable, Record};

/// Extra score for a name containing the priority keyword
const PRIORITY_BONUS: u32 = 3;

/// One record of a station feed, scored against the keyword set
#[derive(Debug, Clone, PartialEq)]
pub struct StationCandidate {
    /// Station name as published
    pub name: String,
    /// The complete record, resolved later through a [`FieldTable`]
    pub raw_fields: Record,
    /// Keyword score
    pub match_score: u32,
}

/// Keyword scorer picking the target station out of a feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationSelector {
    keywords: Vec<String>,
    priority_keyword: Option<String>,
}

impl StationSelector {
    /// Create a selector; keywords are matched case-insensitively
    #[must_use]
    pub fn new(keywords: &[String], priority_keyword: Option<&str>) -> Self {
        let keywords = keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        let priority_keyword = priority_keyword
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty());

        Self {
            keywords,
            priority_keyword,
        }
    }

    /// Score a station name
    ///
    /// +1 per keyword contained in the trimmed, lower-cased name, plus
    /// [`PRIORITY_BONUS`] when the priority keyword is contained.
    #[must_use]
    pub fn score(&self, name: &str) -> u32 {
        let name = name.trim().to_lowercase();
        let keyword_hits = self
            .keywords
            .iter()
            .filter(|k| name.contains(k.as_str()))
            .count();
        let bonus = match &self.priority_keyword {
            Some(priority) if name.contains(priority.as_str()) => PRIORITY_BONUS,
            _ => 0,
        };
        u32::try_from(keyword_hits).unwrap_or(u32::MAX).saturating_add(bonus)
    }

    /// Pick the highest-scoring candidate
    ///
    /// Ties go to the candidate seen first.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::StationNotFound`] when no candidate scores
    /// above zero (including an empty feed).
    pub fn select<I>(&self, candidates: I) -> Result<StationCandidate, WeatherError>
    where
        I: IntoIterator<Item = StationCandidate>,
    {
        let mut best: Option<StationCandidate> = None;

        for mut candidate in candidates {
            candidate.match_score = self.score(&candidate.name);
            let better = best
                .as_ref()
                .is_none_or(|current| candidate.match_score > current.match_score);
            if better {
                best = Some(candidate);
            }
        }

        best.filter(|c| c.match_score > 0)
            .ok_or_else(|| WeatherError::StationNotFound(self.keywords.join(", ")))
    }
}

/// Client for a JSON station feed (AEMET-style conventional observations)
#[derive(Debug)]
pub struct StationFeedClient {
    client: Client,
    config: StationFeedConfig,
    selector: StationSelector,
    fields: FieldTable,
}

impl StationFeedClient {
    /// Create a client resolving records through the AEMET field table
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: StationFeedConfig) -> Result<Self, WeatherError> {
        Self::with_field_table(config, FieldTable::AEMET)
    }

    /// Create a client for a feed with its own field naming
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_field_table(
        config: StationFeedConfig,
        fields: FieldTable,
    ) -> Result<Self, WeatherError> {
        let client = build_http_client(config.timeout_secs)?;
        let selector = StationSelector::new(&config.keywords, config.priority_keyword.as_deref());
        Ok(Self {
            client,
            config,
            selector,
            fields,
        })
    }

    fn api_key(&self) -> Result<&str, WeatherError> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                WeatherError::ConfigurationError("station feed API key is not configured".into())
            })
    }

    /// Parse the feed body into named candidates
    ///
    /// Records that are not objects or carry no resolvable name are skipped.
    fn candidates(&self, body: &str) -> Result<Vec<StationCandidate>, WeatherError> {
        let payload: Value =
            serde_json::from_str(body).map_err(|e| WeatherError::ParseError(e.to_string()))?;

        let Value::Array(records) = payload else {
            return Err(WeatherError::ParseError(
                "expected a JSON array of station records".to_string(),
            ));
        };

        Ok(records
            .into_iter()
            .filter_map(|record| match record {
                Value::Object(fields) => Some(fields),
                _ => None,
            })
            .filter_map(|fields| {
                self.fields.station_name(&fields).map(|name| StationCandidate {
                    name,
                    raw_fields: fields,
                    match_score: 0,
                })
            })
            .collect())
    }
}

#[async_trait]
impl WeatherClient for StationFeedClient {
    #[instrument(skip(self))]
    async fn fetch_snapshot(&self) -> Result<WeatherSnapshot, WeatherError> {
        let api_key = self.api_key()?;
        debug!(url = %self.config.url, "Fetching station feed");

        let request = self
            .client
            .get(&self.config.url)
            .header("api_key", api_key)
            .header(reqwest::header::ACCEPT, "application/json");
        let body = send_for_body(request, self.config.timeout_secs).await?;

        let candidates = self.candidates(&body)?;
        let total = candidates.len();
        let station = self.selector.select(candidates)?;

        info!(
            station = %station.name,
            score = station.match_score,
            candidates = total,
            "Selected station"
        );

        let observation = self.fields.observation(&station.raw_fields);
        Ok(WeatherSnapshot {
            source_name: Some(station.name),
            observation: Some(observation),
            hourly: Vec::new(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "station_feed"
    }
}
