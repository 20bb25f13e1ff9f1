//! Recompute orchestration and session state
//!
//! A [`Session`] owns the loaded players, the current weights and the most
//! recent successful run. Every recompute starts from scratch; a failed
//! recompute leaves the previous results in place.

use super::audit::{audit, FairnessReport};
use super::error::{PipelineError, RunWarning};
use super::player::{Attribute, PlayerRecord};
use super::ranker::{rank_players, RankerConfig, RankingOutcome};
use super::score::{score_records, ScoredRecord};
use super::weights::{Normalization, WeightVector};

/// Output of one full pass: scores, fair ranking and fairness metrics
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Weights the run was computed with
    pub weights: WeightVector,
    pub scored: Vec<ScoredRecord>,
    pub outcome: RankingOutcome,
    pub fairness: FairnessReport,
}

impl RunResult {
    pub fn warnings(&self) -> &[RunWarning] {
        &self.outcome.warnings
    }
}

/// Run the whole pipeline: score, rank, audit.
pub fn recompute(
    records: &[PlayerRecord],
    weights: &WeightVector,
    config: &RankerConfig,
) -> Result<RunResult, PipelineError> {
    let scored = score_records(records, weights)?;
    let outcome = rank_players(&scored, config)?;
    let fairness = audit(&scored, &outcome.predictions, outcome.threshold);

    Ok(RunResult {
        weights: weights.clone(),
        scored,
        outcome,
        fairness,
    })
}

/// Caller-owned state of an interactive ranking session
#[derive(Debug)]
pub struct Session {
    records: Vec<PlayerRecord>,
    weights: WeightVector,
    config: RankerConfig,
    latest: Option<RunResult>,
}

impl Session {
    pub fn new(records: Vec<PlayerRecord>, weights: WeightVector, config: RankerConfig) -> Self {
        Self {
            records,
            weights,
            config,
            latest: None,
        }
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// Most recent successful run, if any
    pub fn latest(&self) -> Option<&RunResult> {
        self.latest.as_ref()
    }

    /// Move one slider and renormalize. Recompute is left to the caller.
    pub fn adjust_weight(
        &mut self,
        attribute: Attribute,
        value: f64,
    ) -> Result<Normalization, PipelineError> {
        self.weights.adjust(attribute, value)
    }

    /// Recompute everything from the current weights.
    ///
    /// On error the previous run stays available through [`Session::latest`].
    pub fn recompute(&mut self) -> Result<&RunResult, PipelineError> {
        let result = recompute(&self.records, &self.weights, &self.config)?;
        Ok(self.latest.insert(result))
    }
}
