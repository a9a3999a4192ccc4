//! Inference Engine - scaler + classifier
//!
//! Holds the two loaded artifacts read-only. One call = one raw survey row
//! in, one stress level out.

use std::path::Path;

use super::artifact::{self, ModelArtifact, ModelMetadata};
use super::classifier::{Classifier, Model};
use super::scaler::StandardScaler;
use crate::constants::N_CLASSES;
use crate::error::{CoreError, Result};
use crate::logic::dataset::StressLevel;
use crate::logic::features::{FeatureVector, FEATURE_COUNT};

#[derive(Debug, Clone)]
pub struct Predictor {
    scaler: StandardScaler,
    model: Classifier,
    metadata: ModelMetadata,
}

impl Predictor {
    /// Load both artifacts from disk
    pub fn load(scaler_path: impl AsRef<Path>, model_path: impl AsRef<Path>) -> Result<Self> {
        let scaler = artifact::load_scaler(scaler_path)?;
        let ModelArtifact { metadata, classifier } = artifact::load_model(model_path)?;

        let predictor = Self::from_parts(scaler, classifier, metadata)?;
        log::info!(
            "Predictor ready: {} (test accuracy {:.4})",
            predictor.metadata.kind,
            predictor.metadata.test_accuracy
        );
        Ok(predictor)
    }

    /// Assemble from in-memory parts, checking they agree on the layout
    pub fn from_parts(scaler: StandardScaler, model: Classifier, metadata: ModelMetadata) -> Result<Self> {
        for width in [scaler.n_features(), model.n_features()] {
            if width != FEATURE_COUNT {
                return Err(CoreError::FeatureCount {
                    expected: FEATURE_COUNT,
                    actual: width,
                });
            }
        }
        if model.n_classes() != N_CLASSES {
            return Err(CoreError::InvalidParameter(format!(
                "model predicts {} classes, expected {}",
                model.n_classes(),
                N_CLASSES
            )));
        }
        model.validate(FEATURE_COUNT, N_CLASSES)?;

        Ok(Self { scaler, model, metadata })
    }

    /// Classify one raw row given in `FEATURE_COLUMNS` order
    pub fn predict(&self, features: &[f64]) -> Result<StressLevel> {
        let vector = FeatureVector::from_slice(features)?;
        self.predict_vector(&vector)
    }

    pub fn predict_vector(&self, vector: &FeatureVector) -> Result<StressLevel> {
        let scaled = self.scaler.transform_row(vector.as_slice())?;
        let class = self.model.predict_row(&scaled);
        StressLevel::from_index(class).ok_or_else(|| CoreError::InvalidLabel(class.to_string()))
    }

    /// Class probabilities for one raw row
    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        let vector = FeatureVector::from_slice(features)?;
        let scaled = self.scaler.transform_row(vector.as_slice())?;
        Ok(self.model.predict_proba_row(&scaled))
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn model(&self) -> &Classifier {
        &self.model
    }
}
