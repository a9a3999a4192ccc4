//! Training Module - split, scale, fit, evaluate, select, persist

pub mod pipeline;


pub use pipeline::{
    persist, train, ArtifactPaths, CandidateReport, TrainConfig, TrainingOutcome,
};
