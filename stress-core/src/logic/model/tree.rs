//! CART Decision Tree (Gini impurity)
//!
//! Nodes live in a flat arena; node 0 is the root. Samples with
//! `x[feature] <= threshold` go left. Leaves keep the class distribution
//! of the training samples that reached them.

use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::classifier::Model;
use crate::error::{CoreError, Result};

// ============================================================================
// PARAMETERS
// ============================================================================

/// How many features are examined when searching for a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    All,
    Sqrt,
    Count(usize),
}

impl MaxFeatures {
    pub fn resolve(self, n_features: usize) -> usize {
        let k = match self {
            MaxFeatures::All => n_features,
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::Count(k) => k,
        };
        k.clamp(1, n_features.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// `None` grows until leaves are pure
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    /// Seeds feature sampling (only consulted when max_features < n_features)
    pub seed: u64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::All,
            seed: crate::constants::DEFAULT_SEED,
        }
    }
}

impl TreeParams {
    fn validate(&self) -> Result<()> {
        if self.min_samples_split < 2 {
            return Err(CoreError::InvalidParameter("min_samples_split must be >= 2".to_string()));
        }
        if self.min_samples_leaf < 1 {
            return Err(CoreError::InvalidParameter("min_samples_leaf must be >= 1".to_string()));
        }
        if self.max_depth == Some(0) {
            return Err(CoreError::InvalidParameter("max_depth must be >= 1".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// TREE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Class probabilities, length `n_classes`
        distribution: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    params: TreeParams,
    n_features: usize,
    n_classes: usize,
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Fit on `x` (rows = samples) with class indices `y < n_classes`
    pub fn fit(x: ArrayView2<f64>, y: &[usize], n_classes: usize, params: TreeParams) -> Result<Self> {
        params.validate()?;
        check_training_data(x, y, n_classes)?;

        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut builder = TreeBuilder {
            x,
            y,
            n_classes,
            params: &params,
            n_candidates: params.max_features.resolve(x.ncols()),
            nodes: Vec::new(),
        };
        builder.grow((0..x.nrows()).collect(), 0, &mut rng);
        let nodes = builder.nodes;

        Ok(Self {
            n_features: x.ncols(),
            n_classes,
            params,
            nodes,
        })
    }

    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, Node::Leaf { .. })).count()
    }

    /// Longest root-to-leaf path, counted in edges
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match &nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }

    /// Check the node arena of a deserialized tree before it is used
    ///
    /// Children are always stored after their parent, so requiring
    /// `parent < child < len` also rules out cycles.
    pub fn validate(&self, n_features: usize, n_classes: usize) -> Result<()> {
        let invalid = |msg: String| Err(CoreError::InvalidModel(msg));

        if self.n_features != n_features || self.n_classes != n_classes {
            return invalid(format!(
                "tree shape {}x{} does not match {}x{}",
                self.n_features, self.n_classes, n_features, n_classes
            ));
        }
        if self.nodes.is_empty() {
            return invalid("tree has no nodes".to_string());
        }

        let len = self.nodes.len();
        for (id, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split { feature, threshold, left, right } => {
                    if *feature >= n_features {
                        return invalid(format!("node {} splits on feature {}", id, feature));
                    }
                    if threshold.is_nan() {
                        return invalid(format!("node {} has a NaN threshold", id));
                    }
                    for child in [*left, *right] {
                        if child <= id || child >= len {
                            return invalid(format!("node {} points to child {}", id, child));
                        }
                    }
                }
                Node::Leaf { distribution } => {
                    if distribution.len() != n_classes {
                        return invalid(format!(
                            "leaf {} has {} classes, expected {}",
                            id,
                            distribution.len(),
                            n_classes
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf_for(&self, row: &[f64]) -> &[f64] {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { distribution } => return distribution,
                Node::Split { feature, threshold, left, right } => {
                    let value = row.get(*feature).copied().unwrap_or(0.0);
                    id = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

impl Model for DecisionTree {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba_row(&self, row: &[f64]) -> Vec<f64> {
        self.leaf_for(row).to_vec()
    }
}

pub(crate) fn check_training_data(x: ArrayView2<f64>, y: &[usize], n_classes: usize) -> Result<()> {
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(CoreError::EmptyDataset);
    }
    if x.nrows() != y.len() {
        return Err(CoreError::InvalidParameter(format!(
            "{} rows but {} labels",
            x.nrows(),
            y.len()
        )));
    }
    if let Some(bad) = y.iter().find(|&&label| label >= n_classes) {
        return Err(CoreError::InvalidLabel(bad.to_string()));
    }
    Ok(())
}

// ============================================================================
// BUILDER
// ============================================================================

struct TreeBuilder<'x, 'y, 'p> {
    x: ArrayView2<'x, f64>,
    y: &'y [usize],
    n_classes: usize,
    params: &'p TreeParams,
    n_candidates: usize,
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl TreeBuilder<'_, '_, '_> {
    /// Grow the subtree over `indices` and return its node id
    fn grow(&mut self, indices: Vec<usize>, depth: usize, rng: &mut StdRng) -> usize {
        let counts = self.class_counts(&indices);
        let node_id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            distribution: distribution(&counts),
        });

        let n = indices.len();
        let at_max_depth = self.params.max_depth.is_some_and(|d| depth >= d);
        if at_max_depth
            || n < self.params.min_samples_split
            || n < 2 * self.params.min_samples_leaf
            || gini(&counts, n) == 0.0
        {
            return node_id;
        }

        let Some(split) = self.best_split(&indices, rng) else {
            return node_id;
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.x[[i, split.feature]] <= split.threshold);

        let left = self.grow(left_idx, depth + 1, rng);
        let right = self.grow(right_idx, depth + 1, rng);
        self.nodes[node_id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_id
    }

    /// Examine `n_candidates` features (in random order when sampling). If none
    /// of them can split the node, keep going through the remaining features.
    fn best_split(&self, indices: &[usize], rng: &mut StdRng) -> Option<SplitCandidate> {
        let n_features = self.x.ncols();
        let mut order: Vec<usize> = (0..n_features).collect();
        if self.n_candidates < n_features {
            order.shuffle(rng);
        }

        let mut best: Option<SplitCandidate> = None;
        for (visited, &feature) in order.iter().enumerate() {
            if visited >= self.n_candidates && best.is_some() {
                break;
            }
            if let Some(candidate) = self.best_split_for_feature(indices, feature) {
                if best.as_ref().map_or(true, |b| candidate.impurity < b.impurity) {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    fn best_split_for_feature(&self, indices: &[usize], feature: usize) -> Option<SplitCandidate> {
        let mut column: Vec<(f64, usize)> = indices
            .iter()
            .map(|&i| (self.x[[i, feature]], self.y[i]))
            .collect();
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n = column.len();
        let min_leaf = self.params.min_samples_leaf;
        let mut right_counts = vec![0usize; self.n_classes];
        for &(_, label) in &column {
            right_counts[label] += 1;
        }
        let mut left_counts = vec![0usize; self.n_classes];

        let mut best: Option<SplitCandidate> = None;
        for pos in 0..n - 1 {
            let (value, label) = column[pos];
            left_counts[label] += 1;
            right_counts[label] -= 1;

            let next = column[pos + 1].0;
            if value >= next {
                continue;
            }
            let n_left = pos + 1;
            let n_right = n - n_left;
            if n_left < min_leaf || n_right < min_leaf {
                continue;
            }

            let impurity = (n_left as f64 * gini(&left_counts, n_left)
                + n_right as f64 * gini(&right_counts, n_right))
                / n as f64;

            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                let mut threshold = value + (next - value) / 2.0;
                if threshold >= next {
                    threshold = value;
                }
                best = Some(SplitCandidate { feature, threshold, impurity });
            }
        }
        best
    }

    fn class_counts(&self, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in indices {
            counts[self.y[i]] += 1;
        }
        counts
    }
}

fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts.iter().map(|&c| (c as f64 / n).powi(2)).sum::<f64>()
}

fn distribution(counts: &[usize]) -> Vec<f64> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![1.0 / counts.len() as f64; counts.len()];
    }
    counts.iter().map(|&c| c as f64 / total as f64).collect()
}
