//! Evaluation Module - classification metrics

pub mod metrics;

pub use metrics::{accuracy, ClassMetrics, ClassificationReport, ConfusionMatrix};
