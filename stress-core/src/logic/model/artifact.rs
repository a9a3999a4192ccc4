//! Artifact persistence
//!
//! Scaler and model are written as JSON envelopes stamped with the feature
//! layout and a SHA-256 of the payload. Loading refuses an envelope of the
//! wrong kind, from another feature layout, or whose payload was altered.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::classifier::{Classifier, ModelKind};
use super::scaler::StandardScaler;
use crate::error::{CoreError, Result};
use crate::logic::features::{layout_hash, validate_layout, FEATURE_VERSION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Scaler,
    Model,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Scaler => write!(f, "scaler"),
            ArtifactKind::Model => write!(f, "model"),
        }
    }
}

/// On-disk wrapper around a persisted scaler or model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEnvelope {
    pub kind: ArtifactKind,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub created_at: DateTime<Utc>,
    /// Hex SHA-256 of the compact JSON encoding of `payload`
    pub checksum: String,
    pub payload: serde_json::Value,
}

/// Training provenance stored next to the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub kind: ModelKind,
    pub test_accuracy: f64,
    pub train_samples: usize,
    pub test_samples: usize,
    pub seed: u64,
    pub trained_at: DateTime<Utc>,
    pub crate_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub metadata: ModelMetadata,
    pub classifier: Classifier,
}

fn payload_checksum(payload: &serde_json::Value) -> Result<String> {
    let bytes = serde_json::to_vec(payload)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

fn save_artifact<T: Serialize>(path: &Path, kind: ArtifactKind, value: &T) -> Result<()> {
    let payload = serde_json::to_value(value)?;
    let envelope = ArtifactEnvelope {
        kind,
        feature_version: FEATURE_VERSION,
        layout_hash: layout_hash(),
        created_at: Utc::now(),
        checksum: payload_checksum(&payload)?,
        payload,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &envelope)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    log::info!("Saved {} artifact to {}", kind, path.display());
    Ok(())
}

fn load_artifact<T: DeserializeOwned>(path: &Path, kind: ArtifactKind) -> Result<T> {
    let bytes = fs::read(path)?;
    let envelope: ArtifactEnvelope = serde_json::from_slice(&bytes)?;

    if envelope.kind != kind {
        return Err(CoreError::ArtifactKind {
            expected: kind.to_string(),
            found: envelope.kind.to_string(),
        });
    }

    validate_layout(envelope.feature_version, envelope.layout_hash)?;

    if payload_checksum(&envelope.payload)? != envelope.checksum {
        return Err(CoreError::Checksum {
            path: path.display().to_string(),
        });
    }

    log::debug!("Loaded {} artifact from {} (created {})", kind, path.display(), envelope.created_at);
    Ok(serde_json::from_value(envelope.payload)?)
}

pub fn save_scaler(path: impl AsRef<Path>, scaler: &StandardScaler) -> Result<()> {
    save_artifact(path.as_ref(), ArtifactKind::Scaler, scaler)
}

pub fn load_scaler(path: impl AsRef<Path>) -> Result<StandardScaler> {
    load_artifact(path.as_ref(), ArtifactKind::Scaler)
}

pub fn save_model(path: impl AsRef<Path>, model: &ModelArtifact) -> Result<()> {
    save_artifact(path.as_ref(), ArtifactKind::Model, model)
}

pub fn load_model(path: impl AsRef<Path>) -> Result<ModelArtifact> {
    load_artifact(path.as_ref(), ArtifactKind::Model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::classifier::Model;
    use crate::logic::model::tree::TreeParams;
    use ndarray::array;
    use tempfile::tempdir;

    fn fitted() -> (StandardScaler, ModelArtifact) {
        let x = array![[1.0, 0.3], [2.0, 0.1], [8.0, 0.7], [9.0, 0.2]];
        let (scaler, scaled) = StandardScaler::fit_transform(x.view()).unwrap();
        let classifier = Classifier::fit_decision_tree(scaled.view(), &[0, 0, 2, 1], 3, TreeParams::default()).unwrap();
        let artifact = ModelArtifact {
            metadata: ModelMetadata {
                kind: classifier.kind(),
                test_accuracy: 0.75,
                train_samples: 4,
                test_samples: 1,
                seed: 42,
                trained_at: Utc::now(),
                crate_version: "test".to_string(),
            },
            classifier,
        };
        (scaler, artifact)
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempdir().unwrap();
        let (scaler, model) = fitted();

        save_scaler(dir.path().join("scaler.json"), &scaler).unwrap();
        save_model(dir.path().join("nested/model.json"), &model).unwrap();

        let scaler_back = load_scaler(dir.path().join("scaler.json")).unwrap();
        let model_back = load_model(dir.path().join("nested/model.json")).unwrap();

        assert_eq!(scaler_back, scaler);
        assert_eq!(model_back, model);

        let row = scaler_back.transform_row(&[8.5, 0.4]).unwrap();
        assert_eq!(
            model_back.classifier.predict_row(&row),
            model.classifier.predict_row(&scaler.transform_row(&[8.5, 0.4]).unwrap())
        );
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let dir = tempdir().unwrap();
        let (scaler, _) = fitted();
        let path = dir.path().join("scaler.json");
        save_scaler(&path, &scaler).unwrap();

        match load_model(&path) {
            Err(CoreError::ArtifactKind { expected, found }) => {
                assert_eq!(expected, "model");
                assert_eq!(found, "scaler");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_tampered_payload_fails_checksum() {
        let dir = tempdir().unwrap();
        let (scaler, _) = fitted();
        let path = dir.path().join("scaler.json");
        save_scaler(&path, &scaler).unwrap();

        let mut envelope: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        envelope["payload"]["mean"][0] = serde_json::json!(123.0);
        fs::write(&path, serde_json::to_vec(&envelope).unwrap()).unwrap();

        assert!(matches!(load_scaler(&path), Err(CoreError::Checksum { .. })));
    }

    #[test]
    fn test_layout_mismatch_rejected() {
        let dir = tempdir().unwrap();
        let (scaler, _) = fitted();
        let path = dir.path().join("scaler.json");
        save_scaler(&path, &scaler).unwrap();

        let mut envelope: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        envelope["layout_hash"] = serde_json::json!(1);
        fs::write(&path, serde_json::to_vec(&envelope).unwrap()).unwrap();

        assert!(matches!(load_scaler(&path), Err(CoreError::LayoutMismatch(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(load_model(dir.path().join("absent.json")), Err(CoreError::Io(_))));
    }
}
