//! Model Module - Scaler, classifiers and inference
//!
//! Training and serving share these types; only `Predictor` is needed at
//! serving time.

pub mod scaler;
pub mod tree;
pub mod forest;
pub mod classifier;
pub mod artifact;
pub mod inference;

// Re-export common types
pub use artifact::{ArtifactEnvelope, ArtifactKind, ModelArtifact, ModelMetadata};
pub use classifier::{Classifier, Model, ModelKind};
pub use forest::{ForestParams, RandomForest};
pub use inference::Predictor;
pub use scaler::StandardScaler;
pub use tree::{DecisionTree, MaxFeatures, TreeParams};

pub use crate::logic::dataset::StressLevel;
