//! JSON export of a ranking run

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{FairnessReport, RankedPlayer, RankerConfig, RunResult};

/// Metadata about the run
#[derive(Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    pub prodigy_version: String,
    pub input_file: String,
    pub seed: u64,
    pub test_size: f64,
    pub grid_size: usize,
    pub n_trees: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

#[derive(Serialize)]
pub struct WeightEntry {
    pub attribute: String,
    pub slider: f64,
    pub weight: f64,
}

/// Model diagnostics of the selected grid point
#[derive(Serialize)]
pub struct ModelSummary {
    pub threshold: f64,
    pub train_size: usize,
    pub eval_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_accuracy: Option<f64>,
    pub sensitive_groups: Vec<String>,
    pub selected_lambda: Vec<f64>,
    pub train_error: f64,
    pub train_parity_violation: f64,
    pub candidates_evaluated: usize,
}

/// Complete export of one run
#[derive(Serialize)]
pub struct RunExport<'a> {
    pub metadata: RunMetadata,
    pub weights: Vec<WeightEntry>,
    pub model: ModelSummary,
    pub ranking: &'a [RankedPlayer],
    pub fairness: &'a FairnessReport,
    pub warnings: Vec<String>,
}

/// Assemble the export document for `result`
pub fn build_export<'a>(
    result: &'a RunResult,
    config: &RankerConfig,
    input_file: &str,
) -> RunExport<'a> {
    let outcome = &result.outcome;
    RunExport {
        metadata: RunMetadata {
            timestamp: Utc::now().to_rfc3339(),
            prodigy_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.to_string(),
            seed: config.seed,
            test_size: config.test_size,
            grid_size: config.grid.grid_size,
            n_trees: config.grid.forest.n_trees,
            max_depth: config.grid.forest.max_depth,
        },
        weights: result
            .weights
            .entries()
            .map(|(attr, slider, weight)| WeightEntry {
                attribute: attr.column_name().to_string(),
                slider,
                weight,
            })
            .collect(),
        model: ModelSummary {
            threshold: outcome.threshold,
            train_size: outcome.train_size,
            eval_size: outcome.test_size,
            eval_accuracy: outcome.eval_accuracy,
            sensitive_groups: outcome.groups.clone(),
            selected_lambda: outcome.selected.lambda.clone(),
            train_error: outcome.selected.error,
            train_parity_violation: outcome.selected.parity_violation,
            candidates_evaluated: outcome.candidates_evaluated,
        },
        ranking: &outcome.ranking,
        fairness: &result.fairness,
        warnings: result.warnings().iter().map(|w| w.to_string()).collect(),
    }
}

/// Write the run to a pretty-printed JSON file
pub fn export_run(
    result: &RunResult,
    config: &RankerConfig,
    input_file: &str,
    output_path: &Path,
) -> Result<()> {
    let export = build_export(result, config, input_file);
    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize ranking results")?;
    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write export file: {}", output_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{recompute, PlayerRecord, WeightVector};
    use tempfile::TempDir;

    fn run() -> (RunResult, RankerConfig) {
        let records: Vec<PlayerRecord> = (0..10)
            .map(|i| {
                let gender = if i % 2 == 0 { "F" } else { "M" };
                PlayerRecord::new(format!("P{}", i), gender, 9 + i, [40.0 + 4.0 * i as f64; 9])
            })
            .collect();
        let mut config = RankerConfig::default();
        config.grid.grid_size = 3;
        config.grid.forest.n_trees = 5;
        let result = recompute(&records, &WeightVector::default(), &config).unwrap();
        (result, config)
    }

    #[test]
    fn test_export_document_layout() {
        let (result, config) = run();
        let value = serde_json::to_value(build_export(&result, &config, "players.csv")).unwrap();

        assert_eq!(value["metadata"]["input_file"], "players.csv");
        assert_eq!(value["metadata"]["seed"], 42);
        assert!(value["metadata"].get("max_depth").is_none());
        assert_eq!(value["weights"].as_array().map(Vec::len), Some(9));
        assert_eq!(value["weights"][5]["attribute"], "Game Intelligence");
        assert_eq!(value["ranking"].as_array().map(Vec::len), Some(10));
        assert_eq!(value["fairness"]["by_gender"]["slice"], "Gender");
        assert_eq!(value["model"]["train_size"], 7);
    }

    #[test]
    fn test_export_run_writes_file() {
        let (result, config) = run();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.json");

        export_run(&result, &config, "players.csv", &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"prodigy_version\""));
        assert!(text.contains("\"ranking\""));
    }
}
