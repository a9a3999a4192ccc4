//! Shared application state

use std::sync::Arc;

use chrono::{DateTime, Utc};
use stress_core::Predictor;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Outcome of loading the artifacts at startup; fixed for the process lifetime
#[derive(Debug)]
pub enum ModelState {
    Ready {
        predictor: Predictor,
        loaded_at: DateTime<Utc>,
    },
    Unavailable(String),
}

#[derive(Clone)]
pub struct AppState {
    pub model: Arc<ModelState>,
    pub config: Config,
}

impl AppState {
    /// Load both artifacts named by `config`; a failure is kept, not raised
    pub fn load(config: Config) -> Self {
        let model = match Predictor::load(&config.scaler_path, &config.model_path) {
            Ok(predictor) => {
                tracing::info!(
                    "Loaded {} from {} (test accuracy {:.4})",
                    predictor.metadata().kind,
                    config.model_path.display(),
                    predictor.metadata().test_accuracy
                );
                ModelState::Ready {
                    predictor,
                    loaded_at: Utc::now(),
                }
            }
            Err(e) => {
                tracing::error!("Failed to load model artifacts: {}", e);
                ModelState::Unavailable(format!("model not loaded: {}", e))
            }
        };

        Self::with_model(model, config)
    }

    pub fn with_model(model: ModelState, config: Config) -> Self {
        Self {
            model: Arc::new(model),
            config,
        }
    }

    pub fn predictor(&self) -> AppResult<(&Predictor, DateTime<Utc>)> {
        match self.model.as_ref() {
            ModelState::Ready { predictor, loaded_at } => Ok((predictor, *loaded_at)),
            ModelState::Unavailable(reason) => Err(AppError::ModelUnavailable(reason.clone())),
        }
    }
}
