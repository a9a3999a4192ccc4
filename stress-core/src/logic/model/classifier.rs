//! Classifier abstraction
//!
//! `Model` is the seam between the trainers and everything downstream
//! (evaluation, artifacts, serving). `Classifier` is the persisted sum type.

use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use super::forest::{ForestParams, RandomForest};
use super::tree::{DecisionTree, TreeParams};
use crate::error::{CoreError, Result};

/// Trait for fitted classifiers over dense f64 rows
pub trait Model {
    fn n_features(&self) -> usize;
    fn n_classes(&self) -> usize;

    /// Class probabilities for one (already scaled) row
    fn predict_proba_row(&self, row: &[f64]) -> Vec<f64>;

    /// Most probable class; ties resolve to the lowest index
    fn predict_row(&self, row: &[f64]) -> usize {
        argmax(&self.predict_proba_row(row))
    }

    fn predict(&self, x: ArrayView2<f64>) -> Vec<usize> {
        x.rows()
            .into_iter()
            .map(|row| match row.as_slice() {
                Some(slice) => self.predict_row(slice),
                None => self.predict_row(&row.to_vec()),
            })
            .collect()
    }
}

pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best_idx = 0usize;
    let mut best_val = f64::NEG_INFINITY;
    for (idx, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best_idx = idx;
        }
    }
    best_idx
}

// ============================================================================
// MODEL KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    RandomForest,
    DecisionTree,
}

impl ModelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::RandomForest => "random_forest",
            ModelKind::DecisionTree => "decision_tree",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "random_forest" | "rf" => Ok(ModelKind::RandomForest),
            "decision_tree" | "dt" => Ok(ModelKind::DecisionTree),
            other => Err(CoreError::InvalidParameter(format!("unknown model kind '{}'", other))),
        }
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// A fitted model of either kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    RandomForest(RandomForest),
    DecisionTree(DecisionTree),
}

impl Classifier {
    pub fn fit_random_forest(x: ArrayView2<f64>, y: &[usize], n_classes: usize, params: ForestParams) -> Result<Self> {
        RandomForest::fit(x, y, n_classes, params).map(Classifier::RandomForest)
    }

    pub fn fit_decision_tree(x: ArrayView2<f64>, y: &[usize], n_classes: usize, params: TreeParams) -> Result<Self> {
        DecisionTree::fit(x, y, n_classes, params).map(Classifier::DecisionTree)
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Classifier::RandomForest(_) => ModelKind::RandomForest,
            Classifier::DecisionTree(_) => ModelKind::DecisionTree,
        }
    }

    /// Structural check for a classifier read back from disk
    pub fn validate(&self, n_features: usize, n_classes: usize) -> Result<()> {
        match self {
            Classifier::RandomForest(m) => m.validate(n_features, n_classes),
            Classifier::DecisionTree(m) => m.validate(n_features, n_classes),
        }
    }

    fn inner(&self) -> &dyn Model {
        match self {
            Classifier::RandomForest(m) => m as &dyn Model,
            Classifier::DecisionTree(m) => m as &dyn Model,
        }
    }
}

impl Model for Classifier {
    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn n_classes(&self) -> usize {
        self.inner().n_classes()
    }

    fn predict_proba_row(&self, row: &[f64]) -> Vec<f64> {
        self.inner().predict_proba_row(row)
    }
}
