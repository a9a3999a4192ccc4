//! Stress Core - Student Stress Level Classifier
//!
//! Offline training pipeline and inference engine for predicting a student's
//! stress level (0 = low, 1 = medium, 2 = high) from 20 survey indicators.
//!
//! # Pipeline
//!
//! ```text
//! CSV ──► Dataset ──► train/test split ──► StandardScaler (fit on train)
//!                                                 │
//!                         ┌───────────────────────┴───────────────┐
//!                         ▼                                       ▼
//!                   RandomForest                            DecisionTree
//!                         └──────────► evaluate ◄─────────────────┘
//!                                         │ best test accuracy
//!                                         ▼
//!                           scaler.json + model.json (artifacts)
//!                                         │
//!                                         ▼
//!                                 Predictor (serving)
//! ```

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{CoreError, Result};
pub use logic::dataset::{Dataset, Sample};
pub use logic::features::{FeatureVector, FEATURE_COLUMNS, FEATURE_COUNT, LABEL_COLUMN};
pub use logic::model::{Classifier, ModelKind, Predictor, StandardScaler, StressLevel};
pub use logic::training::{TrainConfig, TrainingOutcome};
