//! Fairness-constrained ranking of scored players
//!
//! Steps:
//! 1. Seeded 70/30 train/evaluation split
//! 2. Threshold = 75th percentile of raw scores on the training rows
//! 3. Binarize labels (score > threshold)
//! 4. Fit a demographic-parity constrained forest with Gender as the sensitive attribute
//! 5. Predict for every player
//! 6. Min-max scale predictions to a 0-100 prodigy chance and rank

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use super::error::{PipelineError, RunWarning};
use super::fairness::{fit_demographic_parity, Candidate, GridSearchConfig};
use super::player::{AgeGroup, Attribute};
use super::score::ScoredRecord;

/// Prodigy chance given to every player when all predictions are equal
pub const DEGENERATE_PRODIGY_CHANCE: f64 = 50.0;

/// Settings of a ranking run
#[derive(Debug, Clone, PartialEq)]
pub struct RankerConfig {
    /// Share of records held out for evaluation
    pub test_size: f64,
    /// Seed of the train/evaluation shuffle
    pub seed: u64,
    /// Percentile of training scores used as the high-potential threshold
    pub threshold_percentile: f64,
    pub grid: GridSearchConfig,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            test_size: 0.3,
            seed: 42,
            threshold_percentile: 75.0,
            grid: GridSearchConfig::default(),
        }
    }
}

impl RankerConfig {
    fn validate(&self) -> Result<(), PipelineError> {
        if !(0.0..1.0).contains(&self.test_size) {
            return Err(PipelineError::InvalidConfig(format!(
                "test_size must be in [0, 1), got {}",
                self.test_size
            )));
        }
        if !(0.0..=100.0).contains(&self.threshold_percentile) {
            return Err(PipelineError::InvalidConfig(format!(
                "threshold_percentile must be in [0, 100], got {}",
                self.threshold_percentile
            )));
        }
        if self.grid.grid_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "grid_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Row indices of the two partitions
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with a seeded generator and hold out `ceil(test_size * n)` rows.
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> TrainTestSplit {
    let mut permutation: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    permutation.shuffle(&mut rng);

    let n_test = ((test_size * n as f64).ceil() as usize).min(n);
    let train = permutation.split_off(n_test);
    TrainTestSplit {
        train,
        test: permutation,
    }
}

/// Percentile with linear interpolation between closest ranks.
///
/// Returns `None` for an empty slice.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (q / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64))
}

/// 1 when the score is strictly above the threshold
#[inline]
pub fn binarize(score: f64, threshold: f64) -> u8 {
    u8::from(score > threshold)
}

/// Model features: the nine attribute values followed by age
pub fn feature_row(scored: &ScoredRecord) -> Vec<f64> {
    let mut row: Vec<f64> = Attribute::ALL
        .into_iter()
        .map(|attr| scored.record.value(attr))
        .collect();
    row.push(scored.record.age as f64);
    row
}

/// Min-max scale predictions to [0, 100].
///
/// If every prediction is equal, all players get [`DEGENERATE_PRODIGY_CHANCE`]
/// and a warning is returned instead of dividing by zero.
pub fn normalize_prodigy_chance(predictions: &[f64]) -> (Vec<f64>, Option<RunWarning>) {
    let min = predictions.iter().copied().fold(f64::INFINITY, f64::min);
    let max = predictions.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if predictions.is_empty() || !range.is_finite() || range <= 0.0 {
        let warning = predictions.first().map(|&value| RunWarning::ConstantPredictions {
            value,
            fallback: DEGENERATE_PRODIGY_CHANCE,
        });
        return (vec![DEGENERATE_PRODIGY_CHANCE; predictions.len()], warning);
    }

    let scaled = predictions
        .iter()
        .map(|p| (p - min) / range * 100.0)
        .collect();
    (scaled, None)
}

/// Continuous model output for one player, in input order
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FairPrediction {
    pub prediction: f64,
    pub prodigy_chance: f64,
}

/// One row of the final ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPlayer {
    /// 1-based position
    pub rank: usize,
    /// Position of the player in the input
    pub index: usize,
    pub name: String,
    pub gender: String,
    pub age: i64,
    pub age_group: AgeGroup,
    pub raw_score: f64,
    pub prodigy_chance: f64,
}

/// Everything a ranking run produces
#[derive(Debug, Clone)]
pub struct RankingOutcome {
    /// High-potential threshold derived from the training partition
    pub threshold: f64,
    pub train_size: usize,
    pub test_size: usize,
    /// Evaluation-partition accuracy of the selected model at a 0.5 cut-off
    pub eval_accuracy: Option<f64>,
    /// Selected grid point
    pub selected: Candidate,
    /// Sensitive groups the constraint was fitted on
    pub groups: Vec<String>,
    pub candidates_evaluated: usize,
    pub predictions: Vec<FairPrediction>,
    pub ranking: Vec<RankedPlayer>,
    pub warnings: Vec<RunWarning>,
}

/// Fit the constrained model on `scored` and rank every player.
///
/// Errors on an empty dataset, an empty training partition or a training
/// partition whose labels are all on one side of the threshold.
pub fn rank_players(
    scored: &[ScoredRecord],
    config: &RankerConfig,
) -> Result<RankingOutcome, PipelineError> {
    config.validate()?;
    if scored.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    let split = train_test_split(scored.len(), config.test_size, config.seed);
    if split.train.is_empty() {
        return Err(PipelineError::EmptyTraining {
            total: scored.len(),
            test_size: config.test_size,
        });
    }

    let train_scores: Vec<f64> = split.train.iter().map(|&i| scored[i].raw_score).collect();
    let threshold = percentile(&train_scores, config.threshold_percentile)
        .ok_or(PipelineError::EmptyDataset)?;

    let train_labels: Vec<u8> = train_scores.iter().map(|&s| binarize(s, threshold)).collect();
    let positives = train_labels.iter().filter(|&&y| y == 1).count();
    if positives == 0 || positives == train_labels.len() {
        return Err(PipelineError::SingleClassTraining {
            class: u8::from(positives > 0),
            threshold,
        });
    }

    let features: Vec<Vec<f64>> = scored.iter().map(feature_row).collect();
    let train_x: Vec<Vec<f64>> = split.train.iter().map(|&i| features[i].clone()).collect();
    let train_sensitive: Vec<String> = split
        .train
        .iter()
        .map(|&i| scored[i].record.gender.clone())
        .collect();

    let model = fit_demographic_parity(&train_x, &train_labels, &train_sensitive, &config.grid)?;

    let raw_predictions = model.predict(&features);

    let eval_accuracy = if split.test.is_empty() {
        None
    } else {
        let correct = split
            .test
            .iter()
            .filter(|&&i| {
                let predicted = u8::from(raw_predictions[i] >= 0.5);
                predicted == binarize(scored[i].raw_score, threshold)
            })
            .count();
        Some(correct as f64 / split.test.len() as f64)
    };

    let (chances, warning) = normalize_prodigy_chance(&raw_predictions);
    let predictions: Vec<FairPrediction> = raw_predictions
        .iter()
        .zip(chances.iter())
        .map(|(&prediction, &prodigy_chance)| FairPrediction {
            prediction,
            prodigy_chance,
        })
        .collect();

    let ranking = build_ranking(scored, &predictions);

    Ok(RankingOutcome {
        threshold,
        train_size: split.train.len(),
        test_size: split.test.len(),
        eval_accuracy,
        selected: model.selected().clone(),
        groups: model.groups().to_vec(),
        candidates_evaluated: model.candidates().len(),
        predictions,
        ranking,
        warnings: warning.into_iter().collect(),
    })
}

/// Stable sort by prodigy chance, highest first; ties keep input order.
pub fn build_ranking(scored: &[ScoredRecord], predictions: &[FairPrediction]) -> Vec<RankedPlayer> {
    let mut order: Vec<usize> = (0..scored.len().min(predictions.len())).collect();
    order.sort_by(|&a, &b| {
        predictions[b]
            .prodigy_chance
            .partial_cmp(&predictions[a].prodigy_chance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    order
        .into_iter()
        .enumerate()
        .map(|(pos, i)| {
            let s = &scored[i];
            RankedPlayer {
                rank: pos + 1,
                index: i,
                name: s.record.name.clone(),
                gender: s.record.gender.clone(),
                age: s.record.age,
                age_group: s.age_group,
                raw_score: s.raw_score,
                prodigy_chance: predictions[i].prodigy_chance,
            }
        })
        .collect()
}
