use std::io::{Cursor, Write};

use super::record::{Sample, StressLevel};
use super::{describe, load_csv, read_csv, train_test_split, Dataset};
use crate::error::CoreError;
use crate::logic::features::{FeatureVector, FEATURE_COLUMNS, FEATURE_COUNT, LABEL_COLUMN};
use tempfile::tempdir;

fn header() -> String {
    let mut cols: Vec<&str> = FEATURE_COLUMNS.to_vec();
    cols.push(LABEL_COLUMN);
    cols.join(",")
}

fn row(base: f64, label: u8) -> String {
    let mut cells: Vec<String> = (0..FEATURE_COUNT).map(|i| format!("{}", base + i as f64)).collect();
    cells.push(label.to_string());
    cells.join(",")
}

fn synthetic(n: usize) -> Dataset {
    (0..n)
        .map(|i| {
            let values: Vec<f64> = (0..FEATURE_COUNT).map(|j| (i * 7 + j) as f64 % 11.0).collect();
            Sample::new(
                FeatureVector::from_slice(&values).unwrap(),
                StressLevel::from_index(i % 3).unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_read_csv_basic() {
    let csv = format!("{}\n{}\n{}\n", header(), row(0.0, 0), row(1.0, 2));
    let dataset = read_csv(Cursor::new(csv)).unwrap();

    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.samples()[0].label, StressLevel::Low);
    assert_eq!(dataset.samples()[1].label, StressLevel::High);
    assert_eq!(dataset.samples()[1].features.as_array()[19], 20.0);
}

#[test]
fn test_read_csv_reordered_columns() {
    // label first, features reversed
    let mut cols: Vec<&str> = FEATURE_COLUMNS.iter().rev().copied().collect();
    cols.insert(0, LABEL_COLUMN);
    let mut cells: Vec<String> = (0..FEATURE_COUNT).rev().map(|i| i.to_string()).collect();
    cells.insert(0, "1".to_string());

    let csv = format!("{}\n{}\n", cols.join(","), cells.join(","));
    let dataset = read_csv(Cursor::new(csv)).unwrap();

    let sample = &dataset.samples()[0];
    assert_eq!(sample.label, StressLevel::Medium);
    for (i, value) in sample.features.as_slice().iter().enumerate() {
        assert_eq!(*value, i as f64);
    }
}

#[test]
fn test_read_csv_ignores_extra_columns_and_blank_lines() {
    let csv = format!("{},student_id\n\n{},abc\n\n", header(), row(2.0, 1));
    let dataset = read_csv(Cursor::new(csv)).unwrap();
    assert_eq!(dataset.len(), 1);
}

#[test]
fn test_read_csv_strips_byte_order_mark() {
    let csv = format!("\u{feff}{}\n{}\n", header(), row(0.0, 2));
    let dataset = read_csv(Cursor::new(csv)).unwrap();
    assert_eq!(dataset.samples()[0].features.as_array()[0], 0.0);
    assert_eq!(dataset.samples()[0].label, StressLevel::High);
}

#[test]
fn test_read_csv_quoted_cells() {
    let quoted_header: Vec<String> = header().split(',').map(|c| format!("\"{}\"", c)).collect();
    let csv = format!(
        "{},\"notes\"\n{},\"tired, \"\"very\"\" stressed\"\n",
        quoted_header.join(","),
        row(1.0, 1)
    );
    let dataset = read_csv(Cursor::new(csv)).unwrap();
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.samples()[0].label, StressLevel::Medium);
    assert_eq!(dataset.samples()[0].features.as_array()[19], 20.0);
}

#[test]
fn test_read_csv_missing_column() {
    let csv = format!("{}\n", header().replace("bullying", "bullies"));
    match read_csv(Cursor::new(csv)) {
        Err(CoreError::MissingColumn(name)) => assert_eq!(name, "bullying"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_read_csv_bad_value_reports_line() {
    let bad = row(0.0, 1).replacen("0", "oops", 1);
    let csv = format!("{}\n{}\n{}\n", header(), row(0.0, 0), bad);
    match read_csv(Cursor::new(csv)) {
        Err(CoreError::Csv { line, .. }) => assert_eq!(line, 3),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_read_csv_invalid_label() {
    let csv = format!("{}\n{}\n", header(), row(0.0, 5));
    let err = read_csv(Cursor::new(csv)).unwrap_err();
    assert!(err.to_string().contains("invalid stress level"));
}

#[test]
fn test_read_csv_empty() {
    assert!(matches!(read_csv(Cursor::new("")), Err(CoreError::EmptyDataset)));
    let only_header = format!("{}\n", header());
    assert!(matches!(read_csv(Cursor::new(only_header)), Err(CoreError::EmptyDataset)));
}

#[test]
fn test_load_csv_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stress_level_dataset.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{}", header()).unwrap();
    for i in 0..10 {
        writeln!(file, "{}", row(i as f64, (i % 3) as u8)).unwrap();
    }
    drop(file);

    let dataset = load_csv(&path).unwrap();
    assert_eq!(dataset.len(), 10);
    assert_eq!(dataset.class_counts(), [4, 3, 3]);
}

#[test]
fn test_split_sizes() {
    let dataset = synthetic(101);
    let (train, test) = train_test_split(&dataset, 0.2, 42).unwrap();
    // ceil(101 * 0.2) = 21
    assert_eq!(test.len(), 21);
    assert_eq!(train.len(), 80);
}

#[test]
fn test_split_is_deterministic() {
    let dataset = synthetic(50);
    let (train_a, test_a) = train_test_split(&dataset, 0.2, 42).unwrap();
    let (train_b, test_b) = train_test_split(&dataset, 0.2, 42).unwrap();
    assert_eq!(train_a, train_b);
    assert_eq!(test_a, test_b);

    let (_, test_c) = train_test_split(&dataset, 0.2, 7).unwrap();
    assert_ne!(test_a, test_c);
}

#[test]
fn test_split_rejects_bad_ratio() {
    let dataset = synthetic(10);
    assert!(matches!(train_test_split(&dataset, 0.0, 1), Err(CoreError::InvalidSplit(_))));
    assert!(matches!(train_test_split(&dataset, 1.0, 1), Err(CoreError::InvalidSplit(_))));
    assert!(matches!(train_test_split(&synthetic(1), 0.5, 1), Err(CoreError::InvalidSplit(_))));
}

#[test]
fn test_features_matrix_shape() {
    let dataset = synthetic(12);
    let x = dataset.features();
    assert_eq!(x.dim(), (12, FEATURE_COUNT));
    assert_eq!(x[[3, 5]], dataset.samples()[3].features.as_array()[5]);
    assert_eq!(dataset.labels().len(), 12);
}

#[test]
fn test_describe_statistics() {
    let csv = format!(
        "{}\n{}\n{}\n{}\n{}\n",
        header(),
        row(0.0, 0),
        row(1.0, 1),
        row(2.0, 2),
        row(3.0, 2)
    );
    let dataset = read_csv(Cursor::new(csv)).unwrap();
    let summary = describe(&dataset);

    assert_eq!(summary.rows, 4);
    assert_eq!(summary.columns, FEATURE_COUNT + 1);

    let anxiety = &summary.stats[0];
    assert_eq!(anxiety.name, "anxiety_level");
    assert_eq!(anxiety.count, 4);
    assert!((anxiety.mean - 1.5).abs() < 1e-12);
    // sample std of [0, 1, 2, 3]
    assert!((anxiety.std - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
    assert_eq!(anxiety.min, 0.0);
    assert!((anxiety.q25 - 0.75).abs() < 1e-12);
    assert!((anxiety.median - 1.5).abs() < 1e-12);
    assert_eq!(anxiety.max, 3.0);

    assert_eq!(
        summary.class_distribution,
        vec![(StressLevel::Low, 1), (StressLevel::Medium, 1), (StressLevel::High, 2)]
    );

    // every feature is base + offset, so all are perfectly correlated with each other
    assert!((summary.correlation[0][1] - 1.0).abs() < 1e-9);
    assert!((summary.correlation[0][0] - 1.0).abs() < 1e-9);
    assert!(summary.label_correlations[0].1 > 0.9);

    let rendered = summary.to_string();
    assert!(rendered.contains("Statistical Summary"));
    assert!(rendered.contains("study_load"));
}

#[test]
fn test_describe_constant_column_correlation_is_zero() {
    let samples: Dataset = (0..5)
        .map(|i| {
            let mut values = [1.0f64; FEATURE_COUNT];
            values[0] = i as f64;
            Sample::new(FeatureVector::from_values(values).unwrap(), StressLevel::Low)
        })
        .collect();
    let summary = describe(&samples);
    assert_eq!(summary.correlation[1][0], 0.0);
    assert_eq!(summary.correlation[1][1], 0.0);
    assert!((summary.correlation[0][0] - 1.0).abs() < 1e-9);
}

#[test]
fn test_head_tail() {
    let dataset = synthetic(8);
    assert_eq!(dataset.head(5).len(), 5);
    assert_eq!(dataset.tail(5)[4], dataset.samples()[7]);
    assert_eq!(synthetic(3).tail(5).len(), 3);
}
