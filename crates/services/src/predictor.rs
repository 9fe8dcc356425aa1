// Prediction service

use corners_ml::{FeatureEngineer, PredictionModel};
use corners_models::{AliasTable, FallbackTable, Fixture, MatchPrediction};
use tracing::debug;
use crate::normalizer::{NameNormalizer, NormalizerConfig};

/// Resolves raw fixture names against the fallback roster and predicts match
/// totals with a trained model.
pub struct PredictorService<M> {
    model: M,
    fallback: FallbackTable,
    normalizer: NameNormalizer,
    engineer: FeatureEngineer,
}

impl<M: PredictionModel> PredictorService<M> {
    pub fn new(model: M, fallback: FallbackTable, aliases: AliasTable, config: NormalizerConfig) -> Self {
        let normalizer = NameNormalizer::new(fallback.canonical_names(), aliases, config);
        Self {
            model,
            fallback,
            normalizer,
            engineer: FeatureEngineer::new(),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Canonical roster name for `raw_name`, if any.
    pub fn normalize(&self, raw_name: &str) -> Option<String> {
        self.normalizer.normalize(raw_name)
    }

    /// Prediction for a pair of raw names, or `None` when either side has no
    /// roster match.
    pub fn predict_pair(&self, home_raw: &str, away_raw: &str) -> Option<MatchPrediction> {
        let (Some(home), Some(away)) = (self.normalize(home_raw), self.normalize(away_raw)) else {
            debug!("⏭️  Skipping {} vs {}: unmatched team name", home_raw, away_raw);
            return None;
        };

        let home_stats = self.fallback.get(&home)?;
        let away_stats = self.fallback.get(&away)?;

        Some(
            self.model
                .predict_match(&self.engineer, &home, home_stats, &away, away_stats),
        )
    }

    /// Predictions for every fixture with two matched teams, highest total first.
    pub fn predict_fixtures(&self, fixtures: &[Fixture]) -> Vec<MatchPrediction> {
        let mut predictions: Vec<MatchPrediction> = fixtures
            .iter()
            .filter_map(|fixture| self.predict_pair(&fixture.home_team, &fixture.away_team))
            .collect();

        predictions.sort_by(|a, b| b.total_expected.total_cmp(&a.total_expected));
        predictions
    }
}
