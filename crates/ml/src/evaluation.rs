// Cross-validation helpers

use linfa::traits::{Fit, PredictInplace};
use linfa::Dataset;
use ndarray::{Array1, Axis, Ix1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use crate::booster::BoosterParams;
use crate::error::{MlError, Result};

/// K-fold splitter. The first `n % k` folds hold one extra row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KFold {
    pub n_splits: usize,
    pub shuffle: bool,
    pub seed: u64,
}

impl KFold {
    /// Shuffled folds seeded with `seed`.
    pub fn new(n_splits: usize, seed: u64) -> Self {
        Self { n_splits, shuffle: true, seed }
    }

    /// `(train, validation)` row indices for every fold.
    pub fn split(&self, n_rows: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.n_splits < 2 {
            return Err(MlError::InvalidHyperparameter {
                name: "n_folds",
                reason: format!("need at least 2 folds, got {}", self.n_splits),
            });
        }
        if n_rows < self.n_splits {
            return Err(MlError::InsufficientData { rows: n_rows, required: self.n_splits });
        }

        let mut indices: Vec<usize> = (0..n_rows).collect();
        if self.shuffle {
            indices.shuffle(&mut StdRng::seed_from_u64(self.seed));
        }

        let base = n_rows / self.n_splits;
        let extra = n_rows % self.n_splits;
        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;

        for fold in 0..self.n_splits {
            let size = base + usize::from(fold < extra);
            let validation = indices[start..start + size].to_vec();
            let train = indices[..start].iter().chain(&indices[start + size..]).copied().collect();
            folds.push((train, validation));
            start += size;
        }

        Ok(folds)
    }
}

/// Root mean squared error; 0 for an empty set.
pub fn rmse(predicted: &Array1<f64>, actual: &Array1<f64>) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mse = predicted
        .iter()
        .zip(actual.iter())
        .map(|(p, a)| (p - a).powi(2))
        .sum::<f64>()
        / actual.len() as f64;
    mse.sqrt()
}

/// Mean validation RMSE of `params` over the folds of `kfold`.
pub fn cross_validated_rmse(params: &BoosterParams, dataset: &Dataset<f64, f64, Ix1>, kfold: &KFold) -> Result<f64> {
    let records = dataset.records();
    let targets = dataset.targets();
    let folds = kfold.split(records.nrows())?;

    let mut total = 0.0;
    for (train_idx, valid_idx) in &folds {
        let train = Dataset::new(records.select(Axis(0), train_idx), targets.select(Axis(0), train_idx));
        let valid_x = records.select(Axis(0), valid_idx);
        let valid_y = targets.select(Axis(0), valid_idx);

        let model = params.fit(&train)?;
        let mut predicted = model.default_target(&valid_x);
        model.predict_inplace(&valid_x, &mut predicted);
        total += rmse(&predicted, &valid_y);
    }

    Ok(total / folds.len() as f64)
}
