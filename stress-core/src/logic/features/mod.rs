//! Features Module - Survey Indicator Schema
//!
//! Owns the ordered list of survey indicators the model consumes.
//! Training and serving must agree on this order.

pub mod layout;
pub mod vector;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{
    FEATURE_COLUMNS, FEATURE_COUNT, FEATURE_VERSION, LABEL_COLUMN,
    LayoutMismatchError, feature_index, feature_name, layout_hash, validate_layout,
};
pub use vector::FeatureVector;
