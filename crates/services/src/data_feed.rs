// Match statistics collection from the public statistics feed

use chrono::{Duration as ChronoDuration, NaiveDate};
use corners_models::{CornerResult, Fixture, ScheduledEventsResponse, ScrapedMatchStats, StatisticsResponse};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of one HTTP fetch. Only `Data` carries a payload; callers log the
/// other two and move on.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Data(T),
    Empty,
    Failed(String),
}

impl<T> FetchOutcome<T> {
    /// Payload of a `Data` outcome.
    pub fn data(self) -> Option<T> {
        match self {
            FetchOutcome::Data(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, FetchOutcome::Data(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Data(value) => FetchOutcome::Data(f(value)),
            FetchOutcome::Empty => FetchOutcome::Empty,
            FetchOutcome::Failed(reason) => FetchOutcome::Failed(reason),
        }
    }
}

pub(crate) fn http_client(user_agent: &str, timeout_secs: u64) -> anyhow::Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// Send `request` and decode a JSON body. 404 and 204 are `Empty`; any other
/// non-success status, transport error or undecodable body is `Failed`.
pub(crate) async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> FetchOutcome<T> {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return FetchOutcome::Failed(format!("request error: {}", e)),
    };

    let status = response.status();
    if status == StatusCode::NOT_FOUND || status == StatusCode::NO_CONTENT {
        return FetchOutcome::Empty;
    }
    if !status.is_success() {
        return FetchOutcome::Failed(format!("HTTP {}", status));
    }

    match response.json::<T>().await {
        Ok(body) => FetchOutcome::Data(body),
        Err(e) => FetchOutcome::Failed(format!("invalid body: {}", e)),
    }
}

/// Connection settings for the match statistics feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SofascoreConfig {
    pub base_url: String,
    /// Unique-tournament ids kept when listing a day's events
    pub tournament_ids: Vec<u32>,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Pause between consecutive statistics requests
    pub request_delay_ms: u64,
}

impl Default for SofascoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.sofascore.com/api/v1".to_string(),
            // Premier League, Bundesliga, Serie A, Ligue 1, LaLiga
            tournament_ids: vec![8, 17, 23, 34, 35],
            user_agent: "Mozilla/5.0".to_string(),
            request_timeout_secs: 15,
            request_delay_ms: 0,
        }
    }
}

/// Client for the match statistics feed: daily events, per-match statistics
/// and corner counts.
pub struct SofascoreClient {
    client: Client,
    config: SofascoreConfig,
}

impl SofascoreClient {
    pub fn new(config: SofascoreConfig) -> anyhow::Result<Self> {
        let client = http_client(&config.user_agent, config.request_timeout_secs)?;
        Ok(Self { client, config })
    }

    /// Scheduled events for `date` in the configured tournaments.
    pub async fn fixtures_for_date(&self, date: NaiveDate) -> FetchOutcome<Vec<Fixture>> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let url = format!("{}/sport/football/scheduled-events/{}", self.config.base_url, date_str);

        let fixtures: Vec<Fixture> = match fetch_json::<ScheduledEventsResponse>(self.client.get(&url)).await {
            FetchOutcome::Data(body) => body
                .events
                .into_iter()
                .filter(|event| {
                    event
                        .unique_tournament_id()
                        .is_some_and(|id| self.config.tournament_ids.contains(&id))
                })
                .filter_map(|event| event.into_fixture(&date_str))
                .collect(),
            FetchOutcome::Empty => return FetchOutcome::Empty,
            FetchOutcome::Failed(reason) => return FetchOutcome::Failed(reason),
        };

        if fixtures.is_empty() {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Data(fixtures)
        }
    }

    /// Raw statistics groups for one event.
    pub async fn match_statistics(&self, event_id: u64) -> FetchOutcome<StatisticsResponse> {
        let url = format!("{}/event/{}/statistics", self.config.base_url, event_id);
        fetch_json(self.client.get(&url)).await
    }

    /// Whole-match corner counts for one fixture, `None` unless both sides
    /// are whole numbers.
    pub async fn corner_result(&self, fixture: &Fixture) -> Option<CornerResult> {
        let stats = self.statistics_for(fixture).await?;
        let Some((home, away)) = stats.corner_counts() else {
            debug!("⏭️  Match {} has no integer corner counts", fixture.id);
            return None;
        };

        Some(CornerResult {
            match_id: fixture.id,
            date: fixture.date.clone(),
            home_team: fixture.home_team.clone(),
            away_team: fixture.away_team.clone(),
            home_corner_kicks: home,
            away_corner_kicks: away,
            total_corners: home + away,
        })
    }

    /// Statistics rows for every tracked match in the `days` days ending at
    /// `end`, newest day first.
    pub async fn scrape_statistics(&self, end: NaiveDate, days: u32) -> Vec<ScrapedMatchStats> {
        let mut rows = Vec::new();
        for fixture in self.fixtures_in_window(end, days).await {
            if let Some(stats) = self.statistics_for(&fixture).await {
                rows.push(ScrapedMatchStats::from_metrics(&fixture, &stats.whole_match_metrics()));
            }
        }
        info!("✅ Collected statistics for {} matches", rows.len());
        rows
    }

    /// Corner results for every tracked match in the window.
    pub async fn scrape_corners(&self, end: NaiveDate, days: u32) -> Vec<CornerResult> {
        let mut rows = Vec::new();
        for fixture in self.fixtures_in_window(end, days).await {
            if let Some(result) = self.corner_result(&fixture).await {
                rows.push(result);
            }
        }
        info!("✅ Collected corner results for {} matches", rows.len());
        rows
    }

    async fn fixtures_in_window(&self, end: NaiveDate, days: u32) -> Vec<Fixture> {
        let mut fixtures = Vec::new();
        for delta in 0..days {
            let day = end - ChronoDuration::days(i64::from(delta));
            info!("📅 Processing {}", day);
            match self.fixtures_for_date(day).await {
                FetchOutcome::Data(found) => fixtures.extend(found),
                FetchOutcome::Empty => debug!("No tracked fixtures on {}", day),
                FetchOutcome::Failed(reason) => warn!("⚠️  Fixture listing for {} failed: {}", day, reason),
            }
        }
        fixtures
    }

    async fn statistics_for(&self, fixture: &Fixture) -> Option<StatisticsResponse> {
        if self.config.request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;
        }

        debug!("⚽ Match {}: {} vs {}", fixture.id, fixture.home_team, fixture.away_team);
        match self.match_statistics(fixture.id).await {
            FetchOutcome::Data(stats) => Some(stats),
            FetchOutcome::Empty => {
                warn!("❌ No statistics for match {}", fixture.id);
                None
            }
            FetchOutcome::Failed(reason) => {
                warn!("❌ Statistics for match {} failed: {}", fixture.id, reason);
                None
            }
        }
    }
}
