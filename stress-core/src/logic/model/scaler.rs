//! Standard Scaler
//!
//! Per-feature standardization `(x - mean) / scale`, fitted on the training
//! partition only and reused unchanged for test data and live requests.

use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Fitted standardization transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    /// Population std per feature, 1.0 where the feature is constant
    scale: Vec<f64>,
    n_samples_seen: usize,
}

impl StandardScaler {
    /// Fit mean and population std (ddof = 0) per column
    pub fn fit(x: ArrayView2<f64>) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(CoreError::EmptyDataset);
        }

        let mean = x.mean_axis(Axis(0)).ok_or(CoreError::EmptyDataset)?;
        let std = x.std_axis(Axis(0), 0.0);

        let scale = std
            .iter()
            .map(|&s| if s == 0.0 || !s.is_finite() { 1.0 } else { s })
            .collect();

        Ok(Self {
            mean: mean.to_vec(),
            scale,
            n_samples_seen: x.nrows(),
        })
    }

    pub fn fit_transform(x: ArrayView2<f64>) -> Result<(Self, Array2<f64>)> {
        let scaler = Self::fit(x)?;
        let scaled = scaler.transform(x)?;
        Ok((scaler, scaled))
    }

    /// Standardize every row of `x`
    pub fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        self.check_width(x.ncols())?;

        let mut out = x.to_owned();
        for mut row in out.rows_mut() {
            for ((v, m), s) in row.iter_mut().zip(&self.mean).zip(&self.scale) {
                *v = (*v - m) / s;
            }
        }
        Ok(out)
    }

    /// Standardize a single row
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        self.check_width(row.len())?;

        Ok(row
            .iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .map(|((v, m), s)| (v - m) / s)
            .collect())
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    pub fn n_samples_seen(&self) -> usize {
        self.n_samples_seen
    }

    fn check_width(&self, width: usize) -> Result<()> {
        if width != self.mean.len() {
            return Err(CoreError::FeatureCount {
                expected: self.mean.len(),
                actual: width,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_mean_and_scale() {
        let x = array![[1.0, 10.0], [3.0, 10.0], [5.0, 10.0]];
        let scaler = StandardScaler::fit(x.view()).unwrap();

        assert_eq!(scaler.mean(), &[3.0, 10.0]);
        // population std of [1, 3, 5]
        assert!((scaler.scale()[0] - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
        // constant column keeps scale 1
        assert_eq!(scaler.scale()[1], 1.0);
        assert_eq!(scaler.n_samples_seen(), 3);
    }

    #[test]
    fn test_transformed_training_data_is_standardized() {
        let x = array![[1.0, -2.0], [2.0, 0.0], [6.0, 4.0], [7.0, 9.0]];
        let (_, scaled) = StandardScaler::fit_transform(x.view()).unwrap();

        let mean = scaled.mean_axis(Axis(0)).unwrap();
        let std = scaled.std_axis(Axis(0), 0.0);
        for j in 0..2 {
            assert!(mean[j].abs() < 1e-12);
            assert!((std[j] - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_transform_row_matches_matrix_transform() {
        let x = array![[1.0, 2.0], [3.0, 8.0]];
        let scaler = StandardScaler::fit(x.view()).unwrap();
        let matrix = scaler.transform(x.view()).unwrap();
        let row = scaler.transform_row(&[3.0, 8.0]).unwrap();
        assert_eq!(row, matrix.row(1).to_vec());
    }

    #[test]
    fn test_transform_is_repeatable() {
        let x = array![[0.5, 4.0], [1.5, 6.0], [9.0, 1.0]];
        let scaler = StandardScaler::fit(x.view()).unwrap();
        let first = scaler.transform_row(&[2.0, 3.0]).unwrap();
        let second = scaler.transform_row(&[2.0, 3.0]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_width_mismatch() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let scaler = StandardScaler::fit(x.view()).unwrap();
        assert!(matches!(
            scaler.transform_row(&[1.0]),
            Err(CoreError::FeatureCount { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_fit_empty() {
        let x = Array2::<f64>::zeros((0, 3));
        assert!(matches!(StandardScaler::fit(x.view()), Err(CoreError::EmptyDataset)));
    }
}
