use serde::{Deserialize, Serialize};

/// Expected corners for both sides of one fixture.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchPrediction {
    pub home_team: String,
    pub away_team: String,
    pub home_expected: f64,
    pub away_expected: f64,
    pub total_expected: f64,
}

impl MatchPrediction {
    pub fn new(home_team: String, away_team: String, home_expected: f64, away_expected: f64) -> Self {
        Self {
            home_team,
            away_team,
            home_expected,
            away_expected,
            total_expected: home_expected + away_expected,
        }
    }

    pub fn label(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }

    /// Total rounded to two decimals, as shown in tables.
    pub fn display_total(&self) -> f64 {
        round_to(self.total_expected, 2)
    }
}

/// One line of the daily prediction table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRow {
    #[serde(rename = "match")]
    pub match_label: String,
    pub expected_corners: f64,
}

impl From<&MatchPrediction> for PredictionRow {
    fn from(prediction: &MatchPrediction) -> Self {
        Self {
            match_label: prediction.label(),
            expected_corners: prediction.display_total(),
        }
    }
}

/// A replayed historical match with its prediction outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationRecord {
    pub home_team: String,
    pub away_team: String,
    pub expected_corners: f64,
    pub total_corners: f64,
    pub expected_rounded: i64,
    pub total_rounded: i64,
    pub hit: bool,
    pub abs_error: i64,
    pub extreme_miss: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamAccuracy {
    pub team: String,
    /// Percentage of hits, 0–100
    pub accuracy: f64,
    pub games: u32,
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
