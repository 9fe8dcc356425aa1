// Corner prediction model: training, persistence and inference

use chrono::{DateTime, Utc};
use linfa::traits::Fit;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use corners_models::{read_json_artifact, write_json_atomic, FeatureSchema, FeatureVector, MatchPrediction, TeamStats};
use crate::booster::{BoosterParams, GradientBoostedTrees};
use crate::error::{MlError, Result};
use crate::features::{FeatureEngineer, TrainingRow};
use crate::training::{build_dataset, expm1_prediction, HyperparameterSearch, SearchConfig, SearchOutcome};

/// A model that scores one side of a fixture from its feature vector.
pub trait PredictionModel {
    fn model_name(&self) -> &str;

    /// Expected corners for one team, on the count scale.
    fn predict(&self, features: &FeatureVector) -> f64;

    /// Sum of both sides' expectations; each side is derived with itself as
    /// the team and the other as opponent.
    fn predict_match(
        &self,
        engineer: &FeatureEngineer,
        home_team: &str,
        home: &TeamStats,
        away_team: &str,
        away: &TeamStats,
    ) -> MatchPrediction {
        let home_expected = self.predict(&engineer.derive(home, away, true));
        let away_expected = self.predict(&engineer.derive(away, home, false));
        MatchPrediction::new(home_team.to_string(), away_team.to_string(), home_expected, away_expected)
    }
}

/// Boosted corner model together with the schema and hyperparameters it
/// was trained with. This is what gets written to the model artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CornerModel {
    schema: FeatureSchema,
    hyperparameters: BoosterParams,
    booster: GradientBoostedTrees,
    cv_rmse: Option<f64>,
    trained_at: DateTime<Utc>,
}

impl CornerModel {
    /// Search hyperparameters by cross-validation, then refit once on all rows.
    pub fn train(rows: &[TrainingRow], config: &SearchConfig) -> Result<(Self, SearchOutcome)> {
        let dataset = build_dataset(rows)?;
        let outcome = HyperparameterSearch::new(config.clone()).run(&dataset)?;

        info!(
            "🏁 Best hyperparameters (cv_rmse={:.5}): {:?}",
            outcome.best_cv_rmse, outcome.best_params
        );

        let booster = outcome.best_params.fit(&dataset)?;
        let model = Self {
            schema: FeatureSchema::current(),
            hyperparameters: outcome.best_params,
            booster,
            cv_rmse: Some(outcome.best_cv_rmse),
            trained_at: Utc::now(),
        };
        Ok((model, outcome))
    }

    /// Fit with fixed hyperparameters, skipping the search.
    pub fn fit_with(rows: &[TrainingRow], params: BoosterParams) -> Result<Self> {
        let dataset = build_dataset(rows)?;
        let booster = params.fit(&dataset)?;
        Ok(Self {
            schema: FeatureSchema::current(),
            hyperparameters: params,
            booster,
            cv_rmse: None,
            trained_at: Utc::now(),
        })
    }

    /// Load a saved artifact. A missing file or a schema that differs from the
    /// one the feature pipeline produces is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let model: Self = read_json_artifact(path)?;
        model.schema.ensure_matches(&FeatureSchema::current())?;
        if model.booster.n_features() != model.schema.len() {
            return Err(MlError::TrainingFailed {
                reason: format!(
                    "artifact booster expects {} features, schema lists {}",
                    model.booster.n_features(),
                    model.schema.len()
                ),
            });
        }
        info!("📦 Loaded corner model from {} (trained {})", path.display(), model.trained_at);
        Ok(model)
    }

    /// Write the artifact atomically, replacing any previous file.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_atomic(path, self)?;
        info!("💾 Saved corner model to {}", path.display());
        Ok(())
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn hyperparameters(&self) -> &BoosterParams {
        &self.hyperparameters
    }

    /// Cross-validation RMSE of the winning trial, if a search was run.
    pub fn cv_rmse(&self) -> Option<f64> {
        self.cv_rmse
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    /// Raw output on the log1p scale.
    pub fn predict_raw(&self, features: &FeatureVector) -> f64 {
        self.booster.predict_values(&features.to_array())
    }
}

impl PredictionModel for CornerModel {
    fn model_name(&self) -> &str {
        "GradientBoostedCorners"
    }

    fn predict(&self, features: &FeatureVector) -> f64 {
        expm1_prediction(self.predict_raw(features))
    }
}
