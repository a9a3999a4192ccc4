//! Seeded train/test partitioning

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::Dataset;
use crate::error::{CoreError, Result};

/// Shuffle row indices with a seeded RNG and hold out `ceil(n * test_size)`
/// samples for testing. Returns `(train, test)`.
pub fn train_test_split(dataset: &Dataset, test_size: f64, seed: u64) -> Result<(Dataset, Dataset)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(CoreError::InvalidSplit(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n = dataset.len();
    let n_test = (n as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(CoreError::InvalidSplit(format!(
            "{} samples with test_size {} leaves an empty partition",
            n, test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    log::debug!("Split {} samples: {} train / {} test (seed {})", n, train_idx.len(), test_idx.len(), seed);

    Ok((dataset.subset(train_idx), dataset.subset(test_idx)))
}
