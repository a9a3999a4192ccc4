//! CSV loader for the stress survey dataset
//!
//! Columns are matched by header name, so the file may order them freely.
//! Values come out in `FEATURE_COLUMNS` order.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::record::{Sample, StressLevel};
use super::Dataset;
use crate::error::{CoreError, Result};
use crate::logic::features::{FeatureVector, FEATURE_COLUMNS, FEATURE_COUNT, LABEL_COLUMN};

/// Load a headered CSV file
pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    log::info!("Loading dataset from: {}", path.display());

    let file = File::open(path)?;
    let dataset = read_csv(BufReader::new(file))?;

    log::info!("Loaded {} samples", dataset.len());
    Ok(dataset)
}

/// Parse headered CSV from any buffered reader
pub fn read_csv<R: BufRead>(reader: R) -> Result<Dataset> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line));

    let (header_line, header) = loop {
        match lines.next() {
            Some((n, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break (n, line);
                }
            }
            None => return Err(CoreError::EmptyDataset),
        }
    };

    let columns = split_row(header.trim_start_matches('\u{feff}'));
    let mapping = ColumnMapping::resolve(&columns)?;
    log::debug!("CSV header at line {}: {} columns", header_line, columns.len());

    let mut samples = Vec::new();
    for (line_no, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let cells = split_row(&line);
        if cells.len() != columns.len() {
            return Err(CoreError::Csv {
                line: line_no,
                message: format!("expected {} fields, found {}", columns.len(), cells.len()),
            });
        }

        samples.push(mapping.parse_row(&cells, line_no)?);
    }

    if samples.is_empty() {
        return Err(CoreError::EmptyDataset);
    }

    Ok(Dataset::new(samples))
}

/// Split one CSV record. Double-quoted cells may contain commas, and `""`
/// inside quotes is a literal quote. Records spanning lines are not supported.
fn split_row(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

/// Position of each required column within a CSV row
struct ColumnMapping {
    features: [usize; FEATURE_COUNT],
    label: usize,
}

impl ColumnMapping {
    fn resolve(columns: &[String]) -> Result<Self> {
        let position = |name: &str| {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| CoreError::MissingColumn(name.to_string()))
        };

        let mut features = [0usize; FEATURE_COUNT];
        for (slot, name) in features.iter_mut().zip(FEATURE_COLUMNS) {
            *slot = position(name)?;
        }
        let label = position(LABEL_COLUMN)?;

        for column in columns {
            if column != LABEL_COLUMN && !FEATURE_COLUMNS.contains(&column.as_str()) {
                log::warn!("Ignoring unknown column '{}'", column);
            }
        }

        Ok(Self { features, label })
    }

    fn parse_row(&self, cells: &[String], line: usize) -> Result<Sample> {
        let mut values = [0.0f64; FEATURE_COUNT];
        for (i, &col) in self.features.iter().enumerate() {
            values[i] = cells[col].parse().map_err(|_| CoreError::Csv {
                line,
                message: format!("invalid value '{}' for {}", cells[col], FEATURE_COLUMNS[i]),
            })?;
        }

        let features = FeatureVector::from_values(values).map_err(|e| CoreError::Csv {
            line,
            message: e.to_string(),
        })?;
        let label = StressLevel::parse(&cells[self.label]).map_err(|e| CoreError::Csv {
            line,
            message: e.to_string(),
        })?;

        Ok(Sample::new(features, label))
    }
}
