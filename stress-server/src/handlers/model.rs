//! Model metadata handler

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use stress_core::logic::features::{layout_hash, FEATURE_VERSION};
use stress_core::{ModelKind, FEATURE_COLUMNS};

use crate::{AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub model_kind: ModelKind,
    pub test_accuracy: f64,
    pub feature_columns: Vec<&'static str>,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub trained_at: DateTime<Utc>,
    pub loaded_at: DateTime<Utc>,
}

/// Describe the loaded model
pub async fn info(State(state): State<AppState>) -> AppResult<Json<ModelInfo>> {
    let (predictor, loaded_at) = state.predictor()?;
    let metadata = predictor.metadata();

    Ok(Json(ModelInfo {
        model_kind: metadata.kind,
        test_accuracy: metadata.test_accuracy,
        feature_columns: FEATURE_COLUMNS.to_vec(),
        feature_version: FEATURE_VERSION,
        layout_hash: layout_hash(),
        trained_at: metadata.trained_at,
        loaded_at,
    }))
}
