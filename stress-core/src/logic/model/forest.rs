//! Random Forest - bootstrap-aggregated CART trees
//!
//! Each tree sees a bootstrap resample of the training rows and samples
//! `sqrt(n_features)` candidate features per split. Prediction averages the
//! trees' class distributions.

use ndarray::{ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::classifier::Model;
use super::tree::{check_training_data, DecisionTree, MaxFeatures, TreeParams};
use crate::constants::{DEFAULT_N_ESTIMATORS, DEFAULT_SEED};
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: DEFAULT_N_ESTIMATORS,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    n_features: usize,
    n_classes: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn fit(x: ArrayView2<f64>, y: &[usize], n_classes: usize, params: ForestParams) -> Result<Self> {
        if params.n_estimators == 0 {
            return Err(CoreError::InvalidParameter("n_estimators must be >= 1".to_string()));
        }
        check_training_data(x, y, n_classes)?;

        let n = x.nrows();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_estimators);

        for t in 0..params.n_estimators {
            let tree_params = TreeParams {
                max_depth: params.max_depth,
                min_samples_split: params.min_samples_split,
                min_samples_leaf: params.min_samples_leaf,
                max_features: params.max_features,
                seed: rng.gen(),
            };

            let tree = if params.bootstrap {
                let rows: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                let x_boot = x.select(Axis(0), &rows);
                let y_boot: Vec<usize> = rows.iter().map(|&i| y[i]).collect();
                DecisionTree::fit(x_boot.view(), &y_boot, n_classes, tree_params)?
            } else {
                DecisionTree::fit(x, y, n_classes, tree_params)?
            };

            log::trace!("Tree {}: {} nodes, depth {}", t, tree.node_count(), tree.depth());
            trees.push(tree);
        }

        Ok(Self {
            params,
            n_features: x.ncols(),
            n_classes,
            trees,
        })
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Check a deserialized forest: at least one tree, every tree well formed
    pub fn validate(&self, n_features: usize, n_classes: usize) -> Result<()> {
        if self.n_features != n_features || self.n_classes != n_classes {
            return Err(CoreError::InvalidModel(format!(
                "forest shape {}x{} does not match {}x{}",
                self.n_features, self.n_classes, n_features, n_classes
            )));
        }
        if self.trees.is_empty() {
            return Err(CoreError::InvalidModel("forest has no trees".to_string()));
        }
        self.trees
            .iter()
            .try_for_each(|tree| tree.validate(n_features, n_classes))
    }
}

impl Model for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba_row(&self, row: &[f64]) -> Vec<f64> {
        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.predict_proba_row(row)) {
                *acc += p;
            }
        }
        let n = self.trees.len().max(1) as f64;
        proba.iter_mut().for_each(|p| *p /= n);
        proba
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// Three well separated blobs, every feature informative
    fn blobs() -> (Array2<f64>, Vec<usize>) {
        let mut rows = Vec::new();
        let mut y = Vec::new();
        for i in 0..30 {
            let class = i % 3;
            let jitter = (i / 3) as f64 * 0.05;
            let center = class as f64 * 5.0;
            rows.extend_from_slice(&[
                center + jitter,
                center - jitter,
                center + (i % 7) as f64 * 0.1,
                center + (i % 5) as f64 * 0.1,
            ]);
            y.push(class);
        }
        (Array2::from_shape_vec((30, 4), rows).unwrap(), y)
    }

    fn small_params(seed: u64) -> ForestParams {
        ForestParams {
            n_estimators: 15,
            seed,
            ..Default::default()
        }
    }

    #[test]
    fn test_forest_separates_blobs() {
        let (x, y) = blobs();
        let forest = RandomForest::fit(x.view(), &y, 3, small_params(42)).unwrap();
        assert_eq!(forest.trees().len(), 15);

        let predicted = forest.predict(x.view());
        let correct = predicted.iter().zip(&y).filter(|(p, t)| p == t).count();
        assert_eq!(correct, y.len());

        assert_eq!(forest.predict_row(&[0.0, 0.0, 0.2, 0.2]), 0);
        assert_eq!(forest.predict_row(&[10.0, 10.0, 10.2, 10.2]), 2);
    }

    #[test]
    fn test_proba_sums_to_one() {
        let (x, y) = blobs();
        let forest = RandomForest::fit(x.view(), &y, 3, small_params(1)).unwrap();
        let proba = forest.predict_proba_row(&[2.5, 2.5, 0.0, 0.0]);
        assert_eq!(proba.len(), 3);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_forest() {
        let (x, y) = blobs();
        let mut forest = RandomForest::fit(x.view(), &y, 3, small_params(3)).unwrap();
        assert!(forest.validate(4, 3).is_ok());
        assert!(forest.validate(20, 3).is_err());

        forest.trees.clear();
        assert!(matches!(forest.validate(4, 3), Err(CoreError::InvalidModel(_))));
    }

    #[test]
    fn test_same_seed_same_forest() {
        let (x, y) = blobs();
        let a = RandomForest::fit(x.view(), &y, 3, small_params(7)).unwrap();
        let b = RandomForest::fit(x.view(), &y, 3, small_params(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_estimators_rejected() {
        let (x, y) = blobs();
        let params = ForestParams {
            n_estimators: 0,
            ..Default::default()
        };
        assert!(matches!(
            RandomForest::fit(x.view(), &y, 3, params),
            Err(CoreError::InvalidParameter(_))
        ));
    }
}
