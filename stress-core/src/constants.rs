//! Central Configuration Constants
//!
//! Single source of truth for training and artifact defaults.

/// Random seed used for the train/test split and model fitting
pub const DEFAULT_SEED: u64 = 42;

/// Fraction of samples held out for evaluation
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Number of trees in the random forest
pub const DEFAULT_N_ESTIMATORS: usize = 100;

/// Default directory for persisted artifacts
pub const DEFAULT_ARTIFACT_DIR: &str = "artifacts";

/// Scaler artifact file name
pub const SCALER_FILE: &str = "scaler.json";

/// Model artifact file name
pub const MODEL_FILE: &str = "model.json";

/// Number of distinct stress levels
pub const N_CLASSES: usize = 3;

/// Crate version, stamped into artifacts
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get artifact directory from environment or use default
pub fn get_artifact_dir() -> String {
    std::env::var("STRESS_ARTIFACT_DIR")
        .unwrap_or_else(|_| DEFAULT_ARTIFACT_DIR.to_string())
}

/// Get training seed from environment or use default
pub fn get_seed() -> u64 {
    std::env::var("STRESS_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED)
}
