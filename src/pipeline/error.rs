//! Error types for the scoring and fairness pipeline.
//!
//! Loader and CLI glue report failures through `anyhow`; the variants here
//! are the domain failures a caller may want to match on, such as a training
//! partition that cannot be learned from.

use thiserror::Error;

/// Errors raised by the scoring, ranking and auditing stages.
#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    /// No records were supplied to the ranker.
    #[error("dataset is empty - at least one player record is required")]
    EmptyDataset,

    /// The training partition holds no rows after the split.
    #[error("training partition is empty ({total} record(s), evaluation share {test_size})")]
    EmptyTraining { total: usize, test_size: f64 },

    /// Every training label falls on the same side of the threshold.
    #[error(
        "training partition contains a single class ({class}) at threshold {threshold:.3} - \
         cannot fit a fairness-constrained model"
    )]
    SingleClassTraining { class: u8, threshold: f64 },

    /// A raw weight outside [0, 1] or not finite.
    #[error("weight for '{attribute}' must be a finite value in [0, 1], got {value}")]
    InvalidWeight { attribute: String, value: f64 },

    /// A weight or column name that does not match any scouting attribute.
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),

    /// The spreadsheet does not match the expected player schema.
    #[error("schema validation failed for column '{column}': {reason}")]
    Schema { column: String, reason: String },

    /// No grid point produced a usable model.
    #[error("fairness-constrained fit failed: {0}")]
    FitFailed(String),

    /// Ranker settings outside their valid range.
    #[error("invalid ranker configuration: {0}")]
    InvalidConfig(String),
}

/// Recoverable conditions of a run that completed with a fallback
#[derive(Debug, Clone, PartialEq)]
pub enum RunWarning {
    /// All model predictions were equal, so every prodigy chance was set to the fallback
    ConstantPredictions { value: f64, fallback: f64 },
}

impl std::fmt::Display for RunWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunWarning::ConstantPredictions { value, fallback } => write!(
                f,
                "all predictions equal {:.4}; prodigy chance set to {:.2} for every player",
                value, fallback
            ),
        }
    }
}
