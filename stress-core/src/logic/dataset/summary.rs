//! Exploratory summary of a dataset
//!
//! Column statistics, class balance and correlations, computed over the 20
//! features plus the label column.

use std::fmt;

use ndarray::{Array2, ArrayView1, Axis};
use serde::Serialize;

use super::record::{Sample, StressLevel};
use super::Dataset;
use crate::constants::N_CLASSES;
use crate::logic::features::{FEATURE_COLUMNS, FEATURE_COUNT, LABEL_COLUMN};

/// Rows shown by `head`/`tail`
const PREVIEW_ROWS: usize = 5;

/// Descriptive statistics for one column (pandas `describe` semantics)
#[derive(Debug, Clone, Serialize)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (ddof = 1)
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    pub stats: Vec<ColumnStats>,
    pub class_distribution: Vec<(StressLevel, usize)>,
    /// Pearson correlation, row/column order follows `column_names`
    pub correlation: Vec<Vec<f64>>,
    /// Features sorted by |correlation with stress_level|, strongest first
    pub label_correlations: Vec<(String, f64)>,
    pub head: Vec<Sample>,
    pub tail: Vec<Sample>,
}

/// Summarize a dataset
pub fn describe(dataset: &Dataset) -> DatasetSummary {
    let matrix = with_label_column(dataset);
    let column_names: Vec<String> = FEATURE_COLUMNS
        .iter()
        .chain(std::iter::once(&LABEL_COLUMN))
        .map(|s| s.to_string())
        .collect();

    let stats = column_names
        .iter()
        .zip(matrix.axis_iter(Axis(1)))
        .map(|(name, column)| column_stats(name, column))
        .collect();

    let counts = dataset.class_counts();
    let class_distribution = (0..N_CLASSES)
        .filter_map(|i| StressLevel::from_index(i).map(|level| (level, counts[i])))
        .collect();

    let correlation = correlation_matrix(&matrix);
    let mut label_correlations: Vec<(String, f64)> = FEATURE_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), correlation[i][FEATURE_COUNT]))
        .collect();
    label_correlations.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

    DatasetSummary {
        rows: dataset.len(),
        columns: column_names.len(),
        column_names,
        stats,
        class_distribution,
        correlation,
        label_correlations,
        head: dataset.head(PREVIEW_ROWS).to_vec(),
        tail: dataset.tail(PREVIEW_ROWS).to_vec(),
    }
}

fn with_label_column(dataset: &Dataset) -> Array2<f64> {
    let mut matrix = Array2::zeros((dataset.len(), FEATURE_COUNT + 1));
    for (i, sample) in dataset.samples().iter().enumerate() {
        for (j, value) in sample.features.as_slice().iter().enumerate() {
            matrix[[i, j]] = *value;
        }
        matrix[[i, FEATURE_COUNT]] = sample.label.index() as f64;
    }
    matrix
}

fn column_stats(name: &str, column: ArrayView1<f64>) -> ColumnStats {
    let count = column.len();
    let mut sorted: Vec<f64> = column.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mean = if count > 0 { column.sum() / count as f64 } else { 0.0 };
    let std = if count > 1 {
        let ss: f64 = column.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    } else {
        0.0
    };

    ColumnStats {
        name: name.to_string(),
        count,
        mean,
        std,
        min: sorted.first().copied().unwrap_or(0.0),
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied().unwrap_or(0.0),
    }
}

/// Linear-interpolated quantile of an ascending slice
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Pearson correlation between all column pairs. Constant columns give 0.
fn correlation_matrix(matrix: &Array2<f64>) -> Vec<Vec<f64>> {
    let n = matrix.nrows() as f64;
    let k = matrix.ncols();
    let mut corr = vec![vec![0.0; k]; k];
    if matrix.nrows() < 2 {
        return corr;
    }

    let Some(means) = matrix.mean_axis(Axis(0)) else {
        return corr;
    };
    let centered = matrix - &means;
    let norms: Vec<f64> = centered
        .axis_iter(Axis(1))
        .map(|c| (c.dot(&c) / n).sqrt())
        .collect();

    for a in 0..k {
        for b in a..k {
            if norms[a] == 0.0 || norms[b] == 0.0 {
                continue;
            }
            let cov = centered.column(a).dot(&centered.column(b)) / n;
            let r = (cov / (norms[a] * norms[b])).clamp(-1.0, 1.0);
            corr[a][b] = r;
            corr[b][a] = r;
        }
    }
    corr
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Data Information ---")?;
        writeln!(f, "{} rows x {} columns", self.rows, self.columns)?;

        writeln!(f, "\n--- First {} Rows ---", self.head.len())?;
        write_rows(f, &self.head)?;
        writeln!(f, "\n--- Last {} Rows ---", self.tail.len())?;
        write_rows(f, &self.tail)?;

        writeln!(f, "\n--- Statistical Summary ---")?;
        writeln!(
            f,
            "{:<30} {:>6} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
            "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        )?;
        for s in &self.stats {
            writeln!(
                f,
                "{:<30} {:>6} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3}",
                s.name, s.count, s.mean, s.std, s.min, s.q25, s.median, s.q75, s.max
            )?;
        }

        writeln!(f, "\n--- Stress Level Distribution ---")?;
        for (level, count) in &self.class_distribution {
            writeln!(f, "{:<12} {}", level.to_string(), count)?;
        }

        writeln!(f, "\n--- Correlation with {} ---", LABEL_COLUMN)?;
        for (name, r) in &self.label_correlations {
            writeln!(f, "{:<30} {:>+7.3}", name, r)?;
        }
        Ok(())
    }
}

fn write_rows(f: &mut fmt::Formatter<'_>, rows: &[Sample]) -> fmt::Result {
    for sample in rows {
        let values: Vec<String> = sample.features.as_slice().iter().map(|v| format!("{}", v)).collect();
        writeln!(f, "[{}] -> {}", values.join(", "), sample.label.index())?;
    }
    Ok(())
}
