//! Prediction handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use stress_core::FeatureVector;

use crate::{AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Raw survey values in feature column order
    pub features: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub stress_level: usize,
}

/// Classify one feature vector
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(req) = body?;
    let (predictor, _) = state.predictor()?;

    let vector = FeatureVector::from_slice(&req.features)?;
    tracing::debug!("Received features: {}", vector.to_log_entry());

    let level = predictor.predict_vector(&vector)?;

    tracing::info!("Prediction: {}", level);

    Ok(Json(PredictResponse {
        stress_level: level.index(),
    }))
}
