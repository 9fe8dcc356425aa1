// Daily fixtures from the fixtures API, cached on disk per league

use chrono::NaiveDate;
use corners_models::{read_json_artifact, write_json_atomic, ApiFixture, Fixture, FixturesResponse};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use crate::data_feed::{fetch_json, http_client, FetchOutcome};

/// Fixtures API credentials and the leagues to query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixturesApiConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    pub league_ids: Vec<u32>,
    pub season: u32,
    pub request_timeout_secs: u64,
}

impl Default for FixturesApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://v3.football.api-sports.io".to_string(),
            api_key: String::new(),
            // Premier League, LaLiga, Bundesliga, Ligue 1, Serie A
            league_ids: vec![39, 140, 78, 61, 135],
            season: 2024,
            request_timeout_secs: 15,
        }
    }
}

/// Fixtures API client with a per-date, per-league JSON cache on disk.
pub struct FixturesClient {
    client: Client,
    config: FixturesApiConfig,
    cache_dir: PathBuf,
}

impl FixturesClient {
    pub fn new(config: FixturesApiConfig, cache_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let client = http_client("corners-rs", config.request_timeout_secs)?;
        Ok(Self { client, config, cache_dir: cache_dir.into() })
    }

    /// Cache file for one (date, league) query.
    pub fn cache_path(&self, date: NaiveDate, league_id: u32) -> PathBuf {
        cache_file(&self.cache_dir, date, league_id)
    }

    /// Fixtures on `date` across all configured leagues. A non-empty cached
    /// response is used as is; otherwise the API is queried and a successful
    /// response is written to the cache. Failed leagues are skipped.
    pub async fn fixtures_for_date(&self, date: NaiveDate) -> Vec<Fixture> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let mut fixtures = Vec::new();

        for &league_id in &self.config.league_ids {
            let league_fixtures = match self.cached(date, league_id) {
                Some(cached) => {
                    debug!("📦 Cache hit for league {} on {}", league_id, date_str);
                    cached
                }
                None => match self.fetch_league(&date_str, league_id).await {
                    FetchOutcome::Data(fetched) => {
                        if let Err(e) = write_json_atomic(&self.cache_path(date, league_id), &fetched) {
                            warn!("⚠️  Could not cache fixtures for league {}: {}", league_id, e);
                        }
                        fetched
                    }
                    FetchOutcome::Empty => Vec::new(),
                    FetchOutcome::Failed(reason) => {
                        warn!("❌ Fixtures request for league {} failed: {}", league_id, reason);
                        Vec::new()
                    }
                },
            };
            fixtures.extend(league_fixtures.iter().map(|f| f.to_fixture(&date_str)));
        }

        info!("📦 {} fixtures on {}", fixtures.len(), date_str);
        fixtures
    }

    fn cached(&self, date: NaiveDate, league_id: u32) -> Option<Vec<ApiFixture>> {
        let path = self.cache_path(date, league_id);
        if !path.exists() {
            return None;
        }
        match read_json_artifact::<Vec<ApiFixture>>(&path) {
            Ok(cached) if !cached.is_empty() => Some(cached),
            Ok(_) => None,
            Err(e) => {
                warn!("⚠️  Ignoring unreadable cache file {}: {}", path.display(), e);
                None
            }
        }
    }

    async fn fetch_league(&self, date_str: &str, league_id: u32) -> FetchOutcome<Vec<ApiFixture>> {
        let request = self
            .client
            .get(format!("{}/fixtures", self.config.base_url))
            .header("x-apisports-key", &self.config.api_key)
            .query(&[
                ("league", league_id.to_string()),
                ("season", self.config.season.to_string()),
                ("date", date_str.to_string()),
            ]);

        fetch_json::<FixturesResponse>(request).await.map(|body| body.response)
    }
}

fn cache_file(cache_dir: &Path, date: NaiveDate, league_id: u32) -> PathBuf {
    cache_dir.join(format!("fixtures_{}_league_{}.json", date.format("%Y-%m-%d"), league_id))
}
