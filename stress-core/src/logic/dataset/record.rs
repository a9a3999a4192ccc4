use serde::{Deserialize, Serialize};

use crate::constants::N_CLASSES;
use crate::error::CoreError;
use crate::logic::features::FeatureVector;

/// Target label: student stress level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StressLevel {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl StressLevel {
    pub const ALL: [StressLevel; N_CLASSES] = [StressLevel::Low, StressLevel::Medium, StressLevel::High];

    /// Class index used by the models
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            StressLevel::Low => "low",
            StressLevel::Medium => "medium",
            StressLevel::High => "high",
        }
    }

    /// Parse a label cell. Accepts integral floats such as `2.0`.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidLabel(raw.to_string());
        let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
        if value.fract() != 0.0 || value < 0.0 {
            return Err(invalid());
        }
        Self::from_index(value as usize).ok_or_else(invalid)
    }
}

impl TryFrom<u8> for StressLevel {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value as usize).ok_or_else(|| CoreError::InvalidLabel(value.to_string()))
    }
}

impl From<StressLevel> for u8 {
    fn from(level: StressLevel) -> Self {
        level as u8
    }
}

impl std::fmt::Display for StressLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.index(), self.name())
    }
}

/// One labelled survey response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Sample {
    pub features: FeatureVector,
    pub label: StressLevel,
}

impl Sample {
    pub fn new(features: FeatureVector, label: StressLevel) -> Self {
        Self { features, label }
    }
}
