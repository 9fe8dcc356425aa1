// Bookmaker totals odds

use corners_models::{OddsEvent, TOTALS_MARKET};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;
use crate::data_feed::{fetch_json, http_client, FetchOutcome};

/// Odds API credentials and bookmaker regions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OddsApiConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    pub regions: String,
    pub request_timeout_secs: u64,
}

impl Default for OddsApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.the-odds-api.com/v4".to_string(),
            api_key: String::new(),
            regions: "eu".to_string(),
            request_timeout_secs: 15,
        }
    }
}

/// Client for bookmaker totals quotes.
pub struct OddsApiClient {
    client: Client,
    config: OddsApiConfig,
}

impl OddsApiClient {
    /// Fails when no API key is configured.
    pub fn new(config: OddsApiConfig) -> anyhow::Result<Self> {
        if config.api_key.is_empty() {
            anyhow::bail!("odds API key is not configured");
        }
        let client = http_client("corners-rs", config.request_timeout_secs)?;
        Ok(Self { client, config })
    }

    /// Upcoming soccer events with totals markets in decimal odds.
    pub async fn soccer_totals(&self) -> FetchOutcome<Vec<OddsEvent>> {
        let request = self
            .client
            .get(format!("{}/sports/soccer/odds", self.config.base_url))
            .query(&[
                ("regions", self.config.regions.as_str()),
                ("markets", TOTALS_MARKET),
                ("dateFormat", "iso"),
                ("oddsFormat", "decimal"),
                ("apiKey", self.config.api_key.as_str()),
            ]);

        let outcome = fetch_json::<Vec<OddsEvent>>(request).await;
        if let FetchOutcome::Data(events) = &outcome {
            info!("📊 Received {} events with totals odds", events.len());
        }
        outcome
    }
}
