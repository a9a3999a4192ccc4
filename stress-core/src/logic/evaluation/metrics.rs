//! Evaluation metrics for the stress classifier
//!
//! Accuracy, per-class precision/recall/F1 and their macro/weighted
//! averages. A class with no predicted (or no true) samples scores 0; a class
//! with neither is left out of the macro average.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::logic::dataset::StressLevel;

/// Confusion matrix for a `K`-class classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub n_classes: usize,
    /// Row-major `KxK` counts (`truth * K + predicted`)
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    pub fn from_predictions(truth: &[usize], predicted: &[usize], n_classes: usize) -> Result<Self> {
        if truth.len() != predicted.len() {
            return Err(CoreError::InvalidParameter(format!(
                "{} labels but {} predictions",
                truth.len(),
                predicted.len()
            )));
        }
        let mut cm = Self::new(n_classes);
        for (&t, &p) in truth.iter().zip(predicted) {
            if t >= n_classes || p >= n_classes {
                return Err(CoreError::InvalidLabel(t.max(p).to_string()));
            }
            cm.add(t, p);
        }
        Ok(cm)
    }

    pub fn add(&mut self, truth: usize, predicted: usize) {
        let idx = truth * self.n_classes + predicted;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes + predicted]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }
}

/// Fraction of samples on the diagonal
pub fn accuracy(cm: &ConfusionMatrix) -> f64 {
    let total = cm.total();
    if total == 0 {
        return 0.0;
    }
    let correct: u64 = (0..cm.n_classes).map(|k| cm.get(k, k) as u64).sum();
    correct as f64 / total as f64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub per_class: Vec<ClassMetrics>,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
    pub confusion: ConfusionMatrix,
}

impl ClassificationReport {
    pub fn from_predictions(truth: &[usize], predicted: &[usize], n_classes: usize) -> Result<Self> {
        let cm = ConfusionMatrix::from_predictions(truth, predicted, n_classes)?;
        Ok(Self::from_confusion(cm))
    }

    pub fn from_confusion(cm: ConfusionMatrix) -> Self {
        let k = cm.n_classes;
        let per_class: Vec<ClassMetrics> = (0..k).map(|c| class_metrics(&cm, c)).collect();

        // classes absent from both truth and predictions stay out of the macro average
        let present: Vec<f64> = (0..k)
            .map(|c| {
                let predicted: u32 = (0..k).map(|t| cm.get(t, c)).sum();
                if per_class[c].support + predicted > 0 { 1.0 } else { 0.0 }
            })
            .collect();
        let supports: Vec<f64> = per_class.iter().map(|m| m.support as f64).collect();
        let macro_avg = weighted_average(&per_class, &present);
        let weighted_avg = weighted_average(&per_class, &supports);

        Self {
            accuracy: accuracy(&cm),
            per_class,
            macro_avg,
            weighted_avg,
            confusion: cm,
        }
    }
}

fn weighted_average(per_class: &[ClassMetrics], weights: &[f64]) -> ClassMetrics {
    let norm: f64 = weights.iter().sum();
    let avg = |field: fn(&ClassMetrics) -> f64| {
        if norm == 0.0 {
            return 0.0;
        }
        per_class.iter().zip(weights).map(|(m, w)| field(m) * w).sum::<f64>() / norm
    };

    ClassMetrics {
        precision: avg(|m| m.precision),
        recall: avg(|m| m.recall),
        f1: avg(|m| m.f1),
        support: per_class.iter().map(|m| m.support).sum(),
    }
}

fn class_metrics(cm: &ConfusionMatrix, class: usize) -> ClassMetrics {
    let k = cm.n_classes;
    let tp = cm.get(class, class) as f64;
    let support: u32 = (0..k).map(|j| cm.get(class, j)).sum();
    let predicted: u32 = (0..k).map(|i| cm.get(i, class)).sum();

    let precision = if predicted == 0 { 0.0 } else { tp / predicted as f64 };
    let recall = if support == 0 { 0.0 } else { tp / support as f64 };
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };

    ClassMetrics { precision, recall, f1, support }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>14} {:>10} {:>10} {:>10} {:>10}", "", "precision", "recall", "f1-score", "support")?;
        for (class, m) in self.per_class.iter().enumerate() {
            let label = StressLevel::from_index(class)
                .map(|l| l.to_string())
                .unwrap_or_else(|| class.to_string());
            writeln!(
                f,
                "{:>14} {:>10.4} {:>10.4} {:>10.4} {:>10}",
                label, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10.4} {:>10}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        for (name, m) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>14} {:>10.4} {:>10.4} {:>10.4} {:>10}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }

        writeln!(f, "\nconfusion matrix (rows = truth, cols = predicted):")?;
        for t in 0..self.confusion.n_classes {
            let row: Vec<String> = (0..self.confusion.n_classes)
                .map(|p| format!("{:>6}", self.confusion.get(t, p)))
                .collect();
            writeln!(f, "{}", row.join(""))?;
        }
        Ok(())
    }
}
