//! Tests for CLI argument parsing and the headless binary

mod common;

use assert_cmd::Command;
use clap::Parser;
use predicates::prelude::*;
use prodigy::cli::Cli;
use prodigy::pipeline::{Attribute, Normalization, DEFAULT_RAW_WEIGHT};

use common::{create_temp_csv, players_dataframe, ten_players};

#[test]
fn test_cli_default_values() {
    let cli = Cli::parse_from(["prodigy", "-i", "players.csv"]);

    assert!(cli.weights.is_empty(), "No weight overrides by default");
    assert_eq!(cli.top, 25, "Default display should be the top 25");
    assert_eq!(cli.grid_size, 20, "Default grid size should be 20");
    assert_eq!(cli.trees, 100, "Default forest size should be 100");
    assert_eq!(cli.max_depth, None);
    assert_eq!(cli.seed, 42, "Default seed should be 42");
    assert_eq!(cli.test_size, 0.3, "Default evaluation share should be 0.3");
    assert!(cli.export.is_none());
    assert!(!cli.no_confirm, "Default no_confirm should be false");
    assert_eq!(
        cli.infer_schema_length, 10000,
        "Default schema inference should be 10000"
    );
}

#[test]
fn test_cli_weight_overrides() {
    let cli = Cli::parse_from([
        "prodigy",
        "-i",
        "players.csv",
        "-w",
        "speed=0.9",
        "--weight",
        "game intelligence=0.1",
    ]);

    assert_eq!(
        cli.weights,
        vec![
            (Attribute::Speed, 0.9),
            (Attribute::GameIntelligence, 0.1)
        ]
    );

    let (weights, normalization) = cli.initial_weights().unwrap();
    assert_eq!(normalization, Normalization::Applied);
    assert!((weights.total() - 1.0).abs() < 1e-9);
    // 0.9 / (0.9 + 0.1 + 7 * 0.5)
    assert!((weights.weight(Attribute::Speed) - 0.9 / 4.5).abs() < 1e-12);
}

#[test]
fn test_cli_all_zero_weights_keep_equal_split() {
    let mut args = vec!["prodigy".to_string(), "-i".to_string(), "players.csv".to_string()];
    for attr in Attribute::ALL {
        args.push("-w".to_string());
        args.push(format!("{}=0", attr.column_name()));
    }
    let cli = Cli::parse_from(args);

    let (weights, normalization) = cli.initial_weights().unwrap();
    assert_eq!(normalization, Normalization::ZeroSum);
    for attr in Attribute::ALL {
        assert!((weights.weight(attr) - 1.0 / 9.0).abs() < 1e-12);
        // Sliders show the values the weights were derived from
        assert_eq!(weights.raw(attr), DEFAULT_RAW_WEIGHT);
    }
}

#[test]
fn test_cli_rejects_bad_values() {
    assert!(Cli::try_parse_from(["prodigy", "-i", "p.csv", "-w", "speed=1.5"]).is_err());
    assert!(Cli::try_parse_from(["prodigy", "-i", "p.csv", "-w", "wingspan=0.5"]).is_err());
    assert!(Cli::try_parse_from(["prodigy", "-i", "p.csv", "--test-size", "1.0"]).is_err());
    assert!(Cli::try_parse_from(["prodigy", "-i", "p.csv", "--grid-size", "0"]).is_err());
    assert!(Cli::try_parse_from(["prodigy", "-i", "p.csv", "--trees", "0"]).is_err());
    assert!(Cli::try_parse_from(["prodigy"]).is_err(), "input is required");
}

#[test]
fn test_cli_ranker_config_mapping() {
    let cli = Cli::parse_from([
        "prodigy",
        "-i",
        "players.csv",
        "--grid-size",
        "7",
        "--trees",
        "15",
        "--max-depth",
        "4",
        "--seed",
        "9",
        "--test-size",
        "0.2",
    ]);

    let config = cli.ranker_config();
    assert_eq!(config.grid.grid_size, 7);
    assert_eq!(config.grid.forest.n_trees, 15);
    assert_eq!(config.grid.forest.max_depth, Some(4));
    assert_eq!(config.grid.forest.seed, 9);
    assert_eq!(config.seed, 9);
    assert_eq!(config.test_size, 0.2);
    assert_eq!(config.threshold_percentile, 75.0);
}

#[test]
fn test_cli_top_zero_shows_everyone() {
    let cli = Cli::parse_from(["prodigy", "-i", "players.csv", "--top", "0"]);
    assert_eq!(cli.top_rows(), None);

    let cli = Cli::parse_from(["prodigy", "-i", "players.csv", "--top", "3"]);
    assert_eq!(cli.top_rows(), Some(3));
}

#[test]
fn test_binary_headless_run_with_export() {
    let mut df = players_dataframe(&ten_players());
    let (temp_dir, csv_path) = create_temp_csv(&mut df);
    let export_path = temp_dir.path().join("run.json");

    Command::cargo_bin("prodigy")
        .unwrap()
        .arg("-i")
        .arg(&csv_path)
        .args(["--no-confirm", "--trees", "5", "--grid-size", "3"])
        .arg("--export")
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Prodigy Chance"))
        .stdout(predicate::str::contains("Selection rate by Gender"));

    let json = std::fs::read_to_string(&export_path).unwrap();
    let export: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(export["ranking"].as_array().map(Vec::len), Some(10));
    assert_eq!(export["weights"].as_array().map(Vec::len), Some(9));
    assert_eq!(export["metadata"]["grid_size"], 3);
    assert_eq!(export["metadata"]["n_trees"], 5);
    assert_eq!(export["ranking"][0]["rank"], 1);
}

#[test]
fn test_binary_missing_input_fails() {
    Command::cargo_bin("prodigy")
        .unwrap()
        .args(["-i", "/nonexistent/players.csv", "--no-confirm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_binary_headless_run_fails_on_single_class_training() {
    // Everyone shares the same Coachability; weighting only that attribute
    // leaves nobody above the threshold
    let records: Vec<_> = ten_players()
        .into_iter()
        .map(|mut r| {
            r.attributes[Attribute::Coachability.index()] = 70.0;
            r
        })
        .collect();
    let mut df = players_dataframe(&records);
    let (temp_dir, csv_path) = create_temp_csv(&mut df);
    let export_path = temp_dir.path().join("run.json");

    let mut cmd = Command::cargo_bin("prodigy").unwrap();
    cmd.arg("-i")
        .arg(&csv_path)
        .args(["--no-confirm", "--trees", "5", "--grid-size", "3"])
        .arg("--export")
        .arg(&export_path);
    for attr in Attribute::ALL {
        let value = if attr == Attribute::Coachability { 1.0 } else { 0.0 };
        cmd.arg("-w").arg(format!("{}={}", attr.column_name(), value));
    }

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Ranking failed"))
        .stderr(predicate::str::contains("single class"));

    assert!(!export_path.exists(), "a failed run must not write an export");
}
