//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use prodigy::pipeline::{ForestConfig, GridSearchConfig, PlayerRecord, RankerConfig};
use std::path::PathBuf;
use tempfile::TempDir;

/// (name, gender, age, base value) for the ten-player fixture
const ROSTER: [(&str, &str, i64, f64); 10] = [
    ("Ava", "F", 10, 40.0),
    ("Liam", "M", 11, 45.0),
    ("Mia", "F", 12, 50.0),
    ("Noah", "M", 14, 55.0),
    ("Zoe", "F", 15, 60.0),
    ("Ethan", "M", 17, 65.0),
    ("Ivy", "F", 18, 70.0),
    ("Owen", "M", 20, 75.0),
    ("Ruby", "F", 13, 80.0),
    ("Jack", "M", 16, 85.0),
];

/// Offsets applied to the base value for the eight 0-100 attributes
const OFFSETS: [f64; 8] = [0.0, 2.0, -2.0, 4.0, -4.0, 1.0, -1.0, 3.0];

/// Height of fixture player `i` in cm
pub fn fixture_height(i: usize) -> f64 {
    150.0 + 2.0 * i as f64
}

/// Ten synthetic players: five per gender, ages covering all four buckets,
/// strictly increasing composite scores under equal weights.
pub fn ten_players() -> Vec<PlayerRecord> {
    ROSTER
        .iter()
        .enumerate()
        .map(|(i, &(name, gender, age, base))| {
            let mut attributes = [0.0; 9];
            for (slot, offset) in attributes.iter_mut().zip(OFFSETS.iter()) {
                *slot = base + offset;
            }
            attributes[8] = fixture_height(i);
            PlayerRecord::new(name, gender, age, attributes)
        })
        .collect()
}

/// Expected equal-weight score of fixture player `i`: (8 * base + 3 + height) / 9
pub fn expected_equal_weight_score(i: usize) -> f64 {
    (8.0 * ROSTER[i].3 + 3.0 + fixture_height(i)) / 9.0
}

/// Players whose attributes are identical across the whole roster
pub fn identical_players(n: usize) -> Vec<PlayerRecord> {
    (0..n)
        .map(|i| {
            let gender = if i % 2 == 0 { "F" } else { "M" };
            PlayerRecord::new(format!("Twin {}", i), gender, 10 + (i as i64 % 10), [60.0; 9])
        })
        .collect()
}

/// Ranker settings small enough for fast tests
pub fn fast_config() -> RankerConfig {
    RankerConfig {
        grid: GridSearchConfig {
            grid_size: 6,
            forest: ForestConfig {
                n_trees: 12,
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Build the player spreadsheet for `records` as a DataFrame
pub fn players_dataframe(records: &[PlayerRecord]) -> DataFrame {
    use prodigy::pipeline::Attribute;

    let mut columns: Vec<Column> = vec![
        Column::new(
            "Name".into(),
            records.iter().map(|r| r.name.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            "Gender".into(),
            records.iter().map(|r| r.gender.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            "Age".into(),
            records.iter().map(|r| r.age).collect::<Vec<_>>(),
        ),
    ];
    for attr in Attribute::ALL {
        columns.push(Column::new(
            attr.column_name().into(),
            records.iter().map(|r| r.value(attr)).collect::<Vec<_>>(),
        ));
    }
    DataFrame::new(columns).unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("players.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("players.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}
