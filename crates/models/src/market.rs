// Bookmaker listings as returned by the odds source

use serde::{Deserialize, Serialize};
use crate::betting::{Direction, TotalsQuote};

pub const TOTALS_MARKET: &str = "totals";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OddsEvent {
    #[serde(default)]
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub commence_time: Option<String>,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bookmaker {
    #[serde(default)]
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub markets: Vec<Market>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Market {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Outcome {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub point: Option<f64>,
}

impl OddsEvent {
    /// Every over/under price across all bookmakers' totals markets.
    /// Outcomes without a line or with an unrecognised direction are skipped.
    pub fn totals_quotes(&self, match_label: &str) -> Vec<TotalsQuote> {
        let mut quotes = Vec::new();

        for bookmaker in &self.bookmakers {
            for market in bookmaker.markets.iter().filter(|m| m.key == TOTALS_MARKET) {
                for outcome in &market.outcomes {
                    let (Some(line), Ok(direction)) = (outcome.point, outcome.name.parse::<Direction>()) else {
                        continue;
                    };
                    quotes.push(TotalsQuote {
                        match_label: match_label.to_string(),
                        bookmaker: bookmaker.title.clone(),
                        line,
                        direction,
                        odds: outcome.price,
                    });
                }
            }
        }

        quotes
    }
}
