//! Raw potential scoring and age bucketing

use serde::Serialize;

use super::error::PipelineError;
use super::player::{AgeGroup, PlayerRecord};
use super::weights::WeightVector;

/// A player with its weighted composite score and age bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub record: PlayerRecord,
    pub raw_score: f64,
    pub age_group: AgeGroup,
}

/// Weighted sum of the nine attribute values
#[inline]
pub fn score(record: &PlayerRecord, weights: &WeightVector) -> f64 {
    record
        .attributes
        .iter()
        .zip(weights.as_array().iter())
        .map(|(value, weight)| value * weight)
        .sum()
}

/// Score every record, preserving input order.
///
/// Fails only if a record's age has no bucket, which the loader already
/// rejects for spreadsheet input.
pub fn score_records(
    records: &[PlayerRecord],
    weights: &WeightVector,
) -> Result<Vec<ScoredRecord>, PipelineError> {
    records
        .iter()
        .map(|record| {
            let age_group = AgeGroup::from_age(record.age).ok_or_else(|| PipelineError::Schema {
                column: "Age".to_string(),
                reason: format!(
                    "age {} of '{}' is outside the supported range [0, 100)",
                    record.age, record.name
                ),
            })?;
            Ok(ScoredRecord {
                record: record.clone(),
                raw_score: score(record, weights),
                age_group,
            })
        })
        .collect()
}
