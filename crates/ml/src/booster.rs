//! Gradient-boosted regression trees with squared-error loss.
//!
//! Trees are grown greedily on first-order gradients with the regularised
//! split gain and leaf weights used by XGBoost (L1 `reg_alpha`, L2
//! `reg_lambda`, minimum split gain `gamma`, minimum child hessian
//! `min_child_weight`). With squared error every row has hessian 1, so child
//! weight is simply the row count.

use linfa::dataset::DatasetBase;
use linfa::traits::{Fit, PredictInplace};
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use crate::error::{MlError, Result};

/// Hyperparameters of the boosted ensemble. Fitting them through linfa's
/// `Fit` yields a [`GradientBoostedTrees`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoosterParams {
    /// Levels below the root
    pub max_depth: usize,
    /// Shrinkage applied to every leaf value
    pub learning_rate: f64,
    /// Number of boosting rounds
    pub n_estimators: usize,
    /// Fraction of rows sampled for each tree
    pub subsample: f64,
    /// Fraction of columns sampled for each tree
    pub colsample_bytree: f64,
    /// Minimum gain a split must reach
    pub gamma: f64,
    /// L1 penalty on leaf weights
    pub reg_alpha: f64,
    /// L2 penalty on leaf weights
    pub reg_lambda: f64,
    /// Minimum hessian sum (row count for squared error) in each child
    pub min_child_weight: f64,
    /// Seed for row and column sampling
    pub seed: u64,
}

impl Default for BoosterParams {
    fn default() -> Self {
        Self {
            max_depth: 6,
            learning_rate: 0.3,
            n_estimators: 100,
            subsample: 1.0,
            colsample_bytree: 1.0,
            gamma: 0.0,
            reg_alpha: 0.0,
            reg_lambda: 1.0,
            min_child_weight: 1.0,
            seed: 42,
        }
    }
}

impl BoosterParams {
    /// Reject values the fitting loop cannot work with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |name: &'static str, reason: &str| {
            Err(MlError::InvalidHyperparameter { name, reason: reason.to_string() })
        };

        if self.max_depth == 0 {
            return invalid("max_depth", "must be at least 1");
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return invalid("learning_rate", "must be in (0, 1]");
        }
        if self.n_estimators == 0 {
            return invalid("n_estimators", "must be at least 1");
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return invalid("subsample", "must be in (0, 1]");
        }
        if !(self.colsample_bytree > 0.0 && self.colsample_bytree <= 1.0) {
            return invalid("colsample_bytree", "must be in (0, 1]");
        }
        if self.gamma < 0.0 || self.reg_alpha < 0.0 || self.reg_lambda < 0.0 || self.min_child_weight < 0.0 {
            return invalid("regularisation", "gamma, reg_alpha, reg_lambda and min_child_weight must be non-negative");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
enum Node {
    Leaf { value: f64 },
    Split { feature: usize, threshold: f64, left: usize, right: usize },
}

/// One fitted tree, stored as a flat node list rooted at index 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Leaf value reached by `row`; values below a threshold go left.
    pub fn predict(&self, row: ArrayView1<f64>) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf { value } => return value,
                Node::Split { feature, threshold, left, right } => {
                    index = if row[feature] < threshold { left } else { right };
                }
            }
        }
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, Node::Leaf { .. })).count()
    }
}

/// Fitted ensemble: a base score plus the sum of every tree's leaf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GradientBoostedTrees {
    base_score: f64,
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl GradientBoostedTrees {
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Raw ensemble output for one feature row.
    pub fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        self.base_score + self.trees.iter().map(|tree| tree.predict(row)).sum::<f64>()
    }

    pub fn predict_values(&self, values: &[f64]) -> f64 {
        self.predict_row(ArrayView1::from(values))
    }
}

impl Fit<Array2<f64>, Array1<f64>, MlError> for BoosterParams {
    type Object = GradientBoostedTrees;

    fn fit(&self, dataset: &DatasetBase<Array2<f64>, Array1<f64>>) -> Result<GradientBoostedTrees> {
        self.validate()?;

        let x = dataset.records();
        let y = dataset.targets();
        let n_rows = x.nrows();
        let n_features = x.ncols();

        if n_rows == 0 || n_features == 0 {
            return Err(MlError::InsufficientData { rows: n_rows, required: 1 });
        }
        if y.len() != n_rows {
            return Err(MlError::TrainingFailed {
                reason: format!("{} targets for {} records", y.len(), n_rows),
            });
        }

        let base_score = y.mean().unwrap_or(0.0);
        let mut predictions = vec![base_score; n_rows];
        let mut rng = StdRng::seed_from_u64(self.seed);

        let n_columns = ((self.colsample_bytree * n_features as f64).ceil() as usize).clamp(1, n_features);
        let all_features: Vec<usize> = (0..n_features).collect();
        let mut trees = Vec::with_capacity(self.n_estimators);

        for _ in 0..self.n_estimators {
            let gradients: Vec<f64> = predictions.iter().zip(y.iter()).map(|(p, t)| p - t).collect();

            let mut rows: Vec<usize> = if self.subsample < 1.0 {
                (0..n_rows).filter(|_| rng.gen::<f64>() < self.subsample).collect()
            } else {
                (0..n_rows).collect()
            };
            if rows.is_empty() {
                rows = (0..n_rows).collect();
            }

            let features = if n_columns < n_features {
                let mut sampled = all_features.clone();
                sampled.shuffle(&mut rng);
                sampled.truncate(n_columns);
                sampled.sort_unstable();
                sampled
            } else {
                all_features.clone()
            };

            let tree = TreeBuilder::new(x, &gradients, self, &features).grow(rows);
            for (i, prediction) in predictions.iter_mut().enumerate() {
                *prediction += tree.predict(x.row(i));
            }
            trees.push(tree);
        }

        Ok(GradientBoostedTrees { base_score, n_features, trees })
    }
}

impl PredictInplace<Array2<f64>, Array1<f64>> for GradientBoostedTrees {
    fn predict_inplace<'a>(&'a self, x: &'a Array2<f64>, y: &mut Array1<f64>) {
        assert_eq!(x.nrows(), y.len(), "number of rows and targets must match");
        for (row, target) in x.rows().into_iter().zip(y.iter_mut()) {
            *target = self.predict_row(row);
        }
    }

    fn default_target(&self, x: &Array2<f64>) -> Array1<f64> {
        Array1::zeros(x.nrows())
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

struct TreeBuilder<'a> {
    x: &'a Array2<f64>,
    gradients: &'a [f64],
    params: &'a BoosterParams,
    features: &'a [usize],
    nodes: Vec<Node>,
}

impl<'a> TreeBuilder<'a> {
    fn new(x: &'a Array2<f64>, gradients: &'a [f64], params: &'a BoosterParams, features: &'a [usize]) -> Self {
        Self { x, gradients, params, features, nodes: Vec::new() }
    }

    fn grow(mut self, rows: Vec<usize>) -> RegressionTree {
        self.build(rows, 0);
        RegressionTree { nodes: self.nodes }
    }

    fn build(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let index = self.nodes.len();
        let grad_sum: f64 = rows.iter().map(|&r| self.gradients[r]).sum();
        let hess_sum = rows.len() as f64;
        self.nodes.push(Node::Leaf { value: self.leaf_value(grad_sum, hess_sum) });

        if depth >= self.params.max_depth || rows.len() < 2 {
            return index;
        }
        let Some(split) = self.best_split(&rows, grad_sum, hess_sum) else {
            return index;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&r| self.x[[r, split.feature]] < split.threshold);

        let left = self.build(left_rows, depth + 1);
        let right = self.build(right_rows, depth + 1);
        self.nodes[index] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        index
    }

    fn leaf_value(&self, grad_sum: f64, hess_sum: f64) -> f64 {
        let denominator = hess_sum + self.params.reg_lambda;
        if denominator <= 0.0 {
            return 0.0;
        }
        -soft_threshold(grad_sum, self.params.reg_alpha) / denominator * self.params.learning_rate
    }

    fn score(&self, grad_sum: f64, hess_sum: f64) -> f64 {
        let denominator = hess_sum + self.params.reg_lambda;
        if denominator <= 0.0 {
            return 0.0;
        }
        soft_threshold(grad_sum, self.params.reg_alpha).powi(2) / denominator
    }

    fn best_split(&self, rows: &[usize], grad_sum: f64, hess_sum: f64) -> Option<SplitCandidate> {
        let parent_score = self.score(grad_sum, hess_sum);
        let min_child = self.params.min_child_weight;
        let mut best: Option<SplitCandidate> = None;

        for &feature in self.features {
            let mut ordered: Vec<(f64, f64)> = rows
                .iter()
                .map(|&r| (self.x[[r, feature]], self.gradients[r]))
                .collect();
            ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_grad = 0.0;
            for i in 0..ordered.len() - 1 {
                left_grad += ordered[i].1;
                let left_hess = (i + 1) as f64;
                let right_hess = hess_sum - left_hess;

                // no threshold separates equal values
                if ordered[i].0 == ordered[i + 1].0 {
                    continue;
                }
                if left_hess < min_child || right_hess < min_child {
                    continue;
                }

                let right_grad = grad_sum - left_grad;
                let gain = 0.5
                    * (self.score(left_grad, left_hess) + self.score(right_grad, right_hess) - parent_score)
                    - self.params.gamma;

                if gain > best.as_ref().map_or(0.0, |b| b.gain) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: (ordered[i].0 + ordered[i + 1].0) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }
}

fn soft_threshold(grad_sum: f64, alpha: f64) -> f64 {
    grad_sum.signum() * (grad_sum.abs() - alpha).max(0.0)
}
