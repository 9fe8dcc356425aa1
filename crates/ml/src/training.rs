// Hyperparameter search over the boosted tree configuration

use linfa::Dataset;
use ndarray::{Array1, Array2, Ix1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use corners_models::FEATURE_COUNT;
use crate::booster::BoosterParams;
use crate::error::{MlError, Result};
use crate::evaluation::{cross_validated_rmse, KFold};
use crate::features::TrainingRow;

/// Inclusive bounds for every tuned hyperparameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchSpace {
    pub max_depth: (usize, usize),
    pub learning_rate: (f64, f64),
    pub n_estimators: (usize, usize),
    pub subsample: (f64, f64),
    pub colsample_bytree: (f64, f64),
    pub gamma: (f64, f64),
    pub reg_alpha: (f64, f64),
    pub reg_lambda: (f64, f64),
    pub min_child_weight: (usize, usize),
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self {
            max_depth: (4, 16),
            learning_rate: (0.001, 0.2),
            n_estimators: (300, 1200),
            subsample: (0.6, 1.0),
            colsample_bytree: (0.6, 1.0),
            gamma: (0.0, 1.5),
            reg_alpha: (0.0, 1.5),
            reg_lambda: (0.5, 3.0),
            min_child_weight: (1, 15),
        }
    }
}

impl SearchSpace {
    fn sample<R: Rng>(&self, rng: &mut R, seed: u64) -> BoosterParams {
        BoosterParams {
            max_depth: rng.gen_range(self.max_depth.0..=self.max_depth.1),
            learning_rate: rng.gen_range(self.learning_rate.0..=self.learning_rate.1),
            n_estimators: rng.gen_range(self.n_estimators.0..=self.n_estimators.1),
            subsample: rng.gen_range(self.subsample.0..=self.subsample.1),
            colsample_bytree: rng.gen_range(self.colsample_bytree.0..=self.colsample_bytree.1),
            gamma: rng.gen_range(self.gamma.0..=self.gamma.1),
            reg_alpha: rng.gen_range(self.reg_alpha.0..=self.reg_alpha.1),
            reg_lambda: rng.gen_range(self.reg_lambda.0..=self.reg_lambda.1),
            min_child_weight: rng.gen_range(self.min_child_weight.0..=self.min_child_weight.1) as f64,
            seed,
        }
    }

    /// A draw close to `best`: each value moves by at most `spread` of its
    /// range and stays inside the bounds.
    fn sample_near<R: Rng>(&self, best: &BoosterParams, rng: &mut R, spread: f64) -> BoosterParams {
        let float = |rng: &mut R, value: f64, (low, high): (f64, f64)| {
            let radius = (high - low) * spread;
            (value + rng.gen_range(-radius..=radius)).clamp(low, high)
        };
        let int = |rng: &mut R, value: usize, (low, high): (usize, usize)| {
            let radius = (((high - low) as f64) * spread).ceil() as i64;
            let moved = value as i64 + rng.gen_range(-radius..=radius);
            moved.clamp(low as i64, high as i64) as usize
        };

        BoosterParams {
            max_depth: int(rng, best.max_depth, self.max_depth),
            learning_rate: float(rng, best.learning_rate, self.learning_rate),
            n_estimators: int(rng, best.n_estimators, self.n_estimators),
            subsample: float(rng, best.subsample, self.subsample),
            colsample_bytree: float(rng, best.colsample_bytree, self.colsample_bytree),
            gamma: float(rng, best.gamma, self.gamma),
            reg_alpha: float(rng, best.reg_alpha, self.reg_alpha),
            reg_lambda: float(rng, best.reg_lambda, self.reg_lambda),
            min_child_weight: int(rng, best.min_child_weight as usize, self.min_child_weight) as f64,
            seed: best.seed,
        }
    }
}

/// How many trials to run and how each one is scored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    pub n_trials: usize,
    /// Folds used to score every trial
    pub n_folds: usize,
    /// Seed for fold assignment
    pub cv_seed: u64,
    /// Seed for row/column sampling inside every fitted model
    pub model_seed: u64,
    /// Seed for the search itself; `None` draws from OS entropy
    pub search_seed: Option<u64>,
    /// Share of trials, after the first half, drawn near the current best
    pub exploit_ratio: f64,
    pub space: SearchSpace,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            n_trials: 100,
            n_folds: 5,
            cv_seed: 42,
            model_seed: 42,
            search_seed: None,
            exploit_ratio: 0.5,
            space: SearchSpace::default(),
        }
    }
}

/// One evaluated configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrialResult {
    pub number: usize,
    pub params: BoosterParams,
    pub cv_rmse: f64,
}

/// Best configuration found plus the full trial history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchOutcome {
    pub best_params: BoosterParams,
    pub best_cv_rmse: f64,
    pub trials: Vec<TrialResult>,
}

/// Random search with a guided second half.
pub struct HyperparameterSearch {
    config: SearchConfig,
}

impl HyperparameterSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Minimise mean k-fold RMSE over `n_trials` candidate configurations.
    pub fn run(&self, dataset: &Dataset<f64, f64, Ix1>) -> Result<SearchOutcome> {
        let config = &self.config;
        if config.n_trials == 0 {
            return Err(MlError::InvalidHyperparameter {
                name: "n_trials",
                reason: "at least one trial is required".to_string(),
            });
        }

        let kfold = KFold::new(config.n_folds, config.cv_seed);
        let mut rng = match config.search_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            "🔍 Starting hyperparameter search: {} trials, {}-fold CV on {} rows",
            config.n_trials,
            config.n_folds,
            dataset.records().nrows()
        );

        let mut trials = Vec::with_capacity(config.n_trials);
        let mut best: Option<TrialResult> = None;

        for number in 0..config.n_trials {
            let params = match &best {
                Some(current) if number >= config.n_trials / 2 && rng.gen_bool(config.exploit_ratio.clamp(0.0, 1.0)) => {
                    config.space.sample_near(&current.params, &mut rng, 0.1)
                }
                _ => config.space.sample(&mut rng, config.model_seed),
            };

            let cv_rmse = cross_validated_rmse(&params, dataset, &kfold)?;
            debug!("🧪 Trial {}: cv_rmse={:.5} params={:?}", number, cv_rmse, params);

            let trial = TrialResult { number, params, cv_rmse };
            let improved = cv_rmse.is_finite() && best.as_ref().map_or(true, |b| cv_rmse < b.cv_rmse);
            if improved {
                info!("⭐ Trial {} is the new best: cv_rmse={:.5}", number, cv_rmse);
                best = Some(trial.clone());
            }
            trials.push(trial);
        }

        let best = best.ok_or_else(|| MlError::TrainingFailed {
            reason: "no trial produced a finite cross-validation score".to_string(),
        })?;

        Ok(SearchOutcome {
            best_params: best.params,
            best_cv_rmse: best.cv_rmse,
            trials,
        })
    }
}

/// Feature matrix and `log1p` targets for a set of training rows.
pub fn build_dataset(rows: &[TrainingRow]) -> Result<Dataset<f64, f64, Ix1>> {
    if rows.is_empty() {
        return Err(MlError::InsufficientData { rows: 0, required: 1 });
    }

    let flat: Vec<f64> = rows.iter().flat_map(|row| row.features.to_array()).collect();
    let records = Array2::from_shape_vec((rows.len(), FEATURE_COUNT), flat).map_err(|e| MlError::TrainingFailed {
        reason: format!("feature matrix shape: {}", e),
    })?;
    let targets: Array1<f64> = rows.iter().map(|row| log1p_target(row.total_corners)).collect();

    Ok(Dataset::new(records, targets))
}

/// Variance-stabilising transform applied to corner counts before fitting.
pub fn log1p_target(corners: f64) -> f64 {
    corners.ln_1p()
}

/// Inverse of [`log1p_target`], applied to raw model output.
pub fn expm1_prediction(raw: f64) -> f64 {
    raw.exp_m1()
}
