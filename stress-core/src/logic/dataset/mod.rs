//! Dataset Module - Labelled survey responses
//!
//! Loads the stress survey CSV, splits it for training/evaluation and
//! produces the exploratory summary printed before training.

pub mod record;
pub mod loader;
pub mod split;
pub mod summary;

#[cfg(test)]
mod tests;

use ndarray::Array2;

pub use loader::{load_csv, read_csv};
pub use record::{Sample, StressLevel};
pub use split::train_test_split;
pub use summary::{describe, ColumnStats, DatasetSummary};

use crate::constants::N_CLASSES;
use crate::logic::features::FEATURE_COUNT;

/// In-memory collection of samples, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Feature matrix, shape `(len, FEATURE_COUNT)`
    pub fn features(&self) -> Array2<f64> {
        let mut matrix = Array2::zeros((self.samples.len(), FEATURE_COUNT));
        for (mut row, sample) in matrix.rows_mut().into_iter().zip(&self.samples) {
            for (cell, value) in row.iter_mut().zip(sample.features.as_slice()) {
                *cell = *value;
            }
        }
        matrix
    }

    /// Class indices aligned with `features()`
    pub fn labels(&self) -> Vec<usize> {
        self.samples.iter().map(|s| s.label.index()).collect()
    }

    /// Samples at the given indices, in that order
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset::new(indices.iter().map(|&i| self.samples[i].clone()).collect())
    }

    /// Number of samples per stress level
    pub fn class_counts(&self) -> [usize; N_CLASSES] {
        let mut counts = [0usize; N_CLASSES];
        for sample in &self.samples {
            counts[sample.label.index()] += 1;
        }
        counts
    }

    /// First `n` samples
    pub fn head(&self, n: usize) -> &[Sample] {
        &self.samples[..n.min(self.samples.len())]
    }

    /// Last `n` samples
    pub fn tail(&self, n: usize) -> &[Sample] {
        &self.samples[self.samples.len().saturating_sub(n)..]
    }
}

impl FromIterator<Sample> for Dataset {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}
