//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::{
    parse_weight_override, Attribute, ForestConfig, GridSearchConfig, Normalization,
    PipelineError, RankerConfig, WeightVector, ATTRIBUTE_COUNT, DEFAULT_RAW_WEIGHT,
};

/// Prodigy - Rank youth athletes with a demographic-parity constrained potential model
#[derive(Parser, Debug)]
#[command(name = "prodigy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Player spreadsheet (CSV or Parquet) with Name, Gender, Age and the nine attribute columns
    #[arg(short, long)]
    pub input: PathBuf,

    /// Raw slider value for an attribute, as NAME=VALUE with VALUE in [0, 1].
    /// Repeatable. Attributes not given keep the default slider value of 0.5.
    /// Example: -w speed=0.9 -w "game intelligence=0.7"
    #[arg(short = 'w', long = "weight", value_parser = parse_weight_override)]
    pub weights: Vec<(Attribute, f64)>,

    /// Number of ranked players to display (0 shows everyone)
    #[arg(long, default_value = "25")]
    pub top: usize,

    /// Number of Lagrange multiplier points evaluated by the fairness grid search
    #[arg(long, default_value = "20", value_parser = validate_positive)]
    pub grid_size: usize,

    /// Number of trees in each random forest
    #[arg(long, default_value = "100", value_parser = validate_positive)]
    pub trees: usize,

    /// Maximum depth of each tree (unbounded if not given)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Seed for the train/evaluation split and the forest bootstrap
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Share of players held out for evaluation (0.0 to <1.0)
    #[arg(long, default_value = "0.3", value_parser = validate_test_size)]
    pub test_size: f64,

    /// Write the run (weights, ranking, fairness metrics) to this JSON file
    #[arg(short = 'o', long)]
    pub export: Option<PathBuf>,

    /// Skip the interactive weight adjustment loop
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

impl Cli {
    /// Ranker settings from the command line
    pub fn ranker_config(&self) -> RankerConfig {
        RankerConfig {
            test_size: self.test_size,
            seed: self.seed,
            grid: GridSearchConfig {
                grid_size: self.grid_size,
                forest: ForestConfig {
                    n_trees: self.trees,
                    max_depth: self.max_depth,
                    seed: self.seed,
                    ..Default::default()
                },
                show_progress: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Default sliders with the `--weight` overrides applied, normalized
    pub fn initial_weights(&self) -> Result<(WeightVector, Normalization), PipelineError> {
        let mut raw = [DEFAULT_RAW_WEIGHT; ATTRIBUTE_COUNT];
        for &(attribute, value) in &self.weights {
            raw[attribute.index()] = value;
        }
        WeightVector::from_raw(raw)
    }

    /// Rows to display, `None` for all
    pub fn top_rows(&self) -> Option<usize> {
        if self.top == 0 {
            None
        } else {
            Some(self.top)
        }
    }
}

/// Validator for counts that must be at least 1
fn validate_positive(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;
    if value == 0 {
        Err("value must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Validator for test_size parameter
fn validate_test_size(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..1.0).contains(&value) {
        Err(format!(
            "test_size must be at least 0.0 and below 1.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
