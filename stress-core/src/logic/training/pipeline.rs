//! Training pipeline
//!
//! ```text
//! Dataset ─► split(test_size, seed) ─► scaler.fit(train) ─► transform(train, test)
//!        ─► fit each ModelKind ─► evaluate on test ─► pick best accuracy
//! ```
//!
//! The scaler never sees the test partition.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::constants::{
    APP_VERSION, DEFAULT_N_ESTIMATORS, DEFAULT_SEED, DEFAULT_TEST_SIZE, MODEL_FILE, N_CLASSES, SCALER_FILE,
};
use crate::error::{CoreError, Result};
use crate::logic::dataset::{train_test_split, Dataset};
use crate::logic::evaluation::ClassificationReport;
use crate::logic::model::{
    artifact, Classifier, ForestParams, MaxFeatures, Model, ModelArtifact, ModelKind, ModelMetadata,
    StandardScaler, TreeParams,
};

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Fraction held out for evaluation
    pub test_size: f64,
    /// Seeds the split and every model
    pub seed: u64,
    /// Trees in the random forest
    pub n_estimators: usize,
    /// Depth limit applied to every tree; `None` = grow until pure
    pub max_depth: Option<usize>,
    /// Candidates in training order; on equal accuracy the earlier one wins
    pub models: Vec<ModelKind>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            test_size: DEFAULT_TEST_SIZE,
            seed: DEFAULT_SEED,
            n_estimators: DEFAULT_N_ESTIMATORS,
            max_depth: None,
            models: vec![ModelKind::RandomForest, ModelKind::DecisionTree],
        }
    }
}

// ============================================================================
// OUTCOME
// ============================================================================

/// Test-set evaluation of one trained candidate
#[derive(Debug, Clone, Serialize)]
pub struct CandidateReport {
    pub kind: ModelKind,
    pub report: ClassificationReport,
    pub fit_time_ms: u128,
}

#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub scaler: StandardScaler,
    pub model: ModelArtifact,
    pub candidates: Vec<CandidateReport>,
}

impl TrainingOutcome {
    pub fn best(&self) -> &ModelMetadata {
        &self.model.metadata
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub scaler: PathBuf,
    pub model: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            scaler: dir.join(SCALER_FILE),
            model: dir.join(MODEL_FILE),
        }
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Run the full train/evaluate/select pipeline in memory
pub fn train(dataset: &Dataset, config: &TrainConfig) -> Result<TrainingOutcome> {
    if config.models.is_empty() {
        return Err(CoreError::InvalidParameter("no model kinds configured".to_string()));
    }

    let (train_set, test_set) = train_test_split(dataset, config.test_size, config.seed)?;
    log::info!("Total samples: {}", dataset.len());
    log::info!("Training set: {} samples", train_set.len());
    log::info!("Testing set: {} samples", test_set.len());

    let y_train = train_set.labels();
    let y_test = test_set.labels();
    if train_set.class_counts().iter().filter(|&&c| c > 0).count() < 2 {
        return Err(CoreError::NotEnoughClasses);
    }

    let (scaler, x_train) = StandardScaler::fit_transform(train_set.features().view())?;
    let x_test = scaler.transform(test_set.features().view())?;
    log::info!("Preprocessing complete: scaler fitted on {} rows", scaler.n_samples_seen());

    let mut candidates = Vec::with_capacity(config.models.len());
    let mut best: Option<(Classifier, f64)> = None;

    for &kind in &config.models {
        let started = Instant::now();
        let classifier = fit_model(kind, config, x_train.view(), &y_train)?;
        let fit_time_ms = started.elapsed().as_millis();

        let predicted = classifier.predict(x_test.view());
        let report = ClassificationReport::from_predictions(&y_test, &predicted, N_CLASSES)?;
        log::info!("{} accuracy: {:.4} (fit in {} ms)", kind, report.accuracy, fit_time_ms);
        log::debug!("{} report:\n{}", kind, report);

        let accuracy = report.accuracy;
        candidates.push(CandidateReport { kind, report, fit_time_ms });

        if best.as_ref().map_or(true, |(_, best_acc)| accuracy > *best_acc) {
            best = Some((classifier, accuracy));
        }
    }

    let (classifier, test_accuracy) = best.ok_or(CoreError::NotEnoughClasses)?;
    log::info!("Selected {} (test accuracy {:.4})", classifier.kind(), test_accuracy);

    let metadata = ModelMetadata {
        kind: classifier.kind(),
        test_accuracy,
        train_samples: train_set.len(),
        test_samples: test_set.len(),
        seed: config.seed,
        trained_at: Utc::now(),
        crate_version: APP_VERSION.to_string(),
    };

    Ok(TrainingOutcome {
        scaler,
        model: ModelArtifact { metadata, classifier },
        candidates,
    })
}

fn fit_model(
    kind: ModelKind,
    config: &TrainConfig,
    x: ndarray::ArrayView2<f64>,
    y: &[usize],
) -> Result<Classifier> {
    match kind {
        ModelKind::RandomForest => {
            let params = ForestParams {
                n_estimators: config.n_estimators,
                max_depth: config.max_depth,
                seed: config.seed,
                ..Default::default()
            };
            Classifier::fit_random_forest(x, y, N_CLASSES, params)
        }
        ModelKind::DecisionTree => {
            let params = TreeParams {
                max_depth: config.max_depth,
                max_features: MaxFeatures::All,
                seed: config.seed,
                ..Default::default()
            };
            Classifier::fit_decision_tree(x, y, N_CLASSES, params)
        }
    }
}

/// Write the scaler and the selected model into `dir`
pub fn persist(outcome: &TrainingOutcome, dir: impl AsRef<Path>) -> Result<ArtifactPaths> {
    let paths = ArtifactPaths::in_dir(dir);
    artifact::save_scaler(&paths.scaler, &outcome.scaler)?;
    artifact::save_model(&paths.model, &outcome.model)?;
    Ok(paths)
}
