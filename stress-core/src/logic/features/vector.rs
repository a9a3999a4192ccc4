//! Feature Vector - one row of survey indicators
//!
//! The only way raw numbers enter the model. Construction checks the
//! length against `FEATURE_COUNT` and rejects NaN/inf.

use serde::{Deserialize, Serialize};

use super::layout::{feature_index, FEATURE_COLUMNS, FEATURE_COUNT};
use crate::error::{CoreError, Result};

/// Feature values in `FEATURE_COLUMNS` order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create from a fixed array
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Result<Self> {
        for (i, v) in values.iter().enumerate() {
            if !v.is_finite() {
                return Err(CoreError::NonFiniteFeature {
                    name: FEATURE_COLUMNS[i].to_string(),
                });
            }
        }
        Ok(Self { values })
    }

    /// Create from a slice, which must hold exactly `FEATURE_COUNT` values
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let array: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| CoreError::FeatureCount {
            expected: FEATURE_COUNT,
            actual: values.len(),
        })?;
        Self::from_values(array)
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).map(|i| self.values[i])
    }

    /// `(name, value)` pairs in layout order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_COLUMNS.iter().copied().zip(self.values.iter().copied())
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.named()
                .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
                .collect(),
        )
    }
}

impl TryFrom<&[f64]> for FeatureVector {
    type Error = CoreError;

    fn try_from(values: &[f64]) -> Result<Self> {
        Self::from_slice(values)
    }
}
