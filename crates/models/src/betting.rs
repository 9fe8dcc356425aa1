use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::error::CornersError;

/// Side of a totals line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    Over,
    Under,
}

impl FromStr for Direction {
    type Err = CornersError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label.trim().to_ascii_lowercase().as_str() {
            "over" => Ok(Direction::Over),
            "under" => Ok(Direction::Under),
            other => Err(CornersError::InvalidOdds(format!("unknown totals direction '{}'", other))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Over => write!(f, "Over"),
            Direction::Under => write!(f, "Under"),
        }
    }
}

/// A single over/under price offered by a bookmaker for a match total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TotalsQuote {
    pub match_label: String,
    pub bookmaker: String,
    pub line: f64,
    pub direction: Direction,
    /// Decimal odds
    pub odds: f64,
}

/// A quote whose model probability beats the bookmaker's price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValueBet {
    #[serde(rename = "match")]
    pub match_label: String,
    pub expected_total: f64,
    pub line: f64,
    pub direction: Direction,
    pub odds: f64,
    pub implied_probability: f64,
    pub probability: f64,
    pub value: f64,
    pub bookmaker: String,
}

impl ValueBet {
    /// Human readable alert body.
    pub fn alert_message(&self) -> String {
        format!(
            "🎯 **Value Bet**:\n📊 {}\n📈 Line: {} {} @ {} ({})\n📌 Expected: {:.2} | Value: {:.3}",
            self.match_label,
            self.direction,
            self.line,
            self.odds,
            self.bookmaker,
            self.expected_total,
            self.value,
        )
    }
}
