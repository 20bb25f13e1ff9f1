//! Demographic-parity constrained learning by grid search
//!
//! Reduction approach: for each point on a grid of Lagrange multipliers the
//! classification problem is rewritten as a cost-sensitive one. Each sample
//! gets a new label (the cheaper prediction under the Lagrangian) and a weight
//! (how much cheaper), a random forest is fitted to that problem, and the
//! candidate with the best accuracy/parity trade-off on the training data wins.

use std::collections::BTreeMap;

use indicatif::{ProgressBar, ProgressStyle};

use super::error::PipelineError;
use super::forest::{ForestConfig, RandomForestRegressor};

/// Settings of the constrained search
#[derive(Debug, Clone, PartialEq)]
pub struct GridSearchConfig {
    /// Number of multiplier vectors evaluated
    pub grid_size: usize,
    /// Largest L1 norm of a multiplier vector
    pub grid_limit: f64,
    /// Weight of the parity violation in the selection objective (error gets the rest)
    pub constraint_weight: f64,
    pub forest: ForestConfig,
    /// Draw a progress bar while fitting candidates
    pub show_progress: bool,
}

impl Default for GridSearchConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            grid_limit: 2.0,
            constraint_weight: 0.5,
            forest: ForestConfig::default(),
            show_progress: false,
        }
    }
}

/// Training-set diagnostics of one grid point
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Multiplier per sensitive group, in [`FairModel::groups`] order
    pub lambda: Vec<f64>,
    /// Mean absolute difference between prediction and label
    pub error: f64,
    /// Largest |group mean prediction - overall mean prediction|
    pub parity_violation: f64,
    pub objective: f64,
}

/// The selected constrained predictor plus the search trace
#[derive(Debug, Clone)]
pub struct FairModel {
    model: RandomForestRegressor,
    groups: Vec<String>,
    candidates: Vec<Candidate>,
    selected: usize,
}

impl FairModel {
    pub fn predict(&self, x: &[Vec<f64>]) -> Vec<f64> {
        self.model.predict(x)
    }

    /// Sensitive groups seen during training, sorted
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Every successfully fitted grid point, in grid order
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn selected(&self) -> &Candidate {
        &self.candidates[self.selected]
    }
}

/// Integer lattice points with L1 norm at most `radius`, ordered by norm and
/// then lexicographically. Stops after `cap` points.
fn lattice_points(dims: usize, radius: i64, cap: usize) -> Vec<Vec<i64>> {
    let mut points = Vec::new();
    let mut current = Vec::with_capacity(dims);
    for norm in 0..=radius {
        push_shell(dims, norm, cap, &mut current, &mut points);
        if points.len() >= cap {
            break;
        }
    }
    points
}

/// Append points whose remaining coordinates have L1 norm exactly `remaining`.
///
/// Every branch ends in at least one point, so the work is bounded by
/// `cap * dims` regardless of how many dimensions there are.
fn push_shell(
    dims: usize,
    remaining: i64,
    cap: usize,
    current: &mut Vec<i64>,
    points: &mut Vec<Vec<i64>>,
) {
    if points.len() >= cap {
        return;
    }
    if current.len() == dims {
        if remaining == 0 {
            points.push(current.clone());
        }
        return;
    }

    // The last coordinate has to absorb whatever norm is left
    let last = current.len() + 1 == dims;
    for value in -remaining..=remaining {
        if last && value.abs() != remaining {
            continue;
        }
        current.push(value);
        push_shell(dims, remaining - value.abs(), cap, current, points);
        current.pop();
        if points.len() >= cap {
            return;
        }
    }
}

/// Build `grid_size` multiplier vectors for `n_groups` groups.
///
/// The lattice resolution grows until the L1 ball of radius `limit` holds
/// enough points; points closest to the origin are kept, so the unconstrained
/// problem (all zeros) is always the first grid point.
pub fn lagrange_grid(n_groups: usize, grid_size: usize, limit: f64) -> Vec<Vec<f64>> {
    if n_groups == 0 || grid_size == 0 {
        return vec![vec![0.0; n_groups]; grid_size.min(1)];
    }

    let mut radius = 1i64;
    loop {
        let points = lattice_points(n_groups, radius, grid_size);
        if points.len() >= grid_size {
            let step = limit / radius as f64;
            return points
                .into_iter()
                .map(|p| p.into_iter().map(|k| k as f64 * step).collect())
                .collect();
        }
        radius += 1;
    }
}

/// Relabel and reweight the training set for one multiplier vector.
///
/// The cost of predicting 1 for sample i in group g (scaled by n) is
/// `(1 - 2y) + lambda_g * n / n_g - sum(lambda)`; the new label is 1 where
/// that cost is negative and the weight is its magnitude.
fn reweight(
    labels: &[u8],
    group_index: &[usize],
    group_sizes: &[usize],
    lambda: &[f64],
) -> (Vec<f64>, Vec<f64>) {
    let n = labels.len() as f64;
    let lambda_sum: f64 = lambda.iter().sum();

    labels
        .iter()
        .zip(group_index.iter())
        .map(|(&y, &g)| {
            let cost_one = (1.0 - 2.0 * y as f64) + lambda[g] * n / group_sizes[g] as f64
                - lambda_sum;
            let signed = -cost_one;
            (if signed > 0.0 { 1.0 } else { 0.0 }, signed.abs())
        })
        .unzip()
}

/// Error and parity violation of continuous predictions on the training set
fn evaluate(
    predictions: &[f64],
    labels: &[u8],
    group_index: &[usize],
    n_groups: usize,
) -> (f64, f64) {
    let n = predictions.len() as f64;
    let error = predictions
        .iter()
        .zip(labels.iter())
        .map(|(p, &y)| (p - y as f64).abs())
        .sum::<f64>()
        / n;

    let overall = predictions.iter().sum::<f64>() / n;
    let mut sums = vec![(0.0f64, 0usize); n_groups];
    for (p, &g) in predictions.iter().zip(group_index.iter()) {
        sums[g].0 += p;
        sums[g].1 += 1;
    }
    let violation = sums
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(sum, count)| (sum / *count as f64 - overall).abs())
        .fold(0.0, f64::max);

    (error, violation)
}

/// Fit a demographic-parity constrained random forest.
///
/// # Arguments
/// * `x` - Row-major training features
/// * `labels` - Binary labels (0/1)
/// * `sensitive` - Sensitive attribute value per row
/// * `config` - Grid and forest settings
pub fn fit_demographic_parity(
    x: &[Vec<f64>],
    labels: &[u8],
    sensitive: &[String],
    config: &GridSearchConfig,
) -> Result<FairModel, PipelineError> {
    if x.is_empty() {
        return Err(PipelineError::FitFailed("no training rows".to_string()));
    }
    if labels.len() != x.len() || sensitive.len() != x.len() {
        return Err(PipelineError::FitFailed(
            "features, labels and sensitive values differ in length".to_string(),
        ));
    }

    let mut sizes: BTreeMap<&str, usize> = BTreeMap::new();
    for value in sensitive {
        *sizes.entry(value.as_str()).or_insert(0) += 1;
    }
    let groups: Vec<String> = sizes.keys().map(|g| g.to_string()).collect();
    let group_sizes: Vec<usize> = sizes.values().copied().collect();
    let group_index: Vec<usize> = sensitive
        .iter()
        .map(|v| groups.iter().position(|g| g == v).unwrap_or(0))
        .collect();

    let grid = lagrange_grid(groups.len(), config.grid_size, config.grid_limit);
    if grid.is_empty() {
        return Err(PipelineError::FitFailed("grid is empty".to_string()));
    }

    let pb = if config.show_progress {
        let pb = ProgressBar::new(grid.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("   Fitting fair candidates [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut best: Option<(usize, RandomForestRegressor)> = None;
    let mut candidates: Vec<Candidate> = Vec::with_capacity(grid.len());
    let mut last_error: Option<PipelineError> = None;

    for lambda in grid {
        let (relabeled, weights) = reweight(labels, &group_index, &group_sizes, &lambda);
        pb.inc(1);

        let model = match RandomForestRegressor::fit(x, &relabeled, &weights, &config.forest) {
            Ok(model) => model,
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        };

        let predictions = model.predict(x);
        let (error, parity_violation) =
            evaluate(&predictions, labels, &group_index, groups.len());
        let objective =
            config.constraint_weight * parity_violation + (1.0 - config.constraint_weight) * error;

        candidates.push(Candidate {
            lambda,
            error,
            parity_violation,
            objective,
        });

        let idx = candidates.len() - 1;
        let better = best
            .as_ref()
            .map_or(true, |(b, _)| objective < candidates[*b].objective);
        if better {
            best = Some((idx, model));
        }
    }
    pb.finish_and_clear();

    match best {
        Some((selected, model)) => Ok(FairModel {
            model,
            groups,
            candidates,
            selected,
        }),
        None => Err(last_error.unwrap_or_else(|| {
            PipelineError::FitFailed("no grid point produced a model".to_string())
        })),
    }
}
