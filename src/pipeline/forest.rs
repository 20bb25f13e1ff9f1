//! Random forest regression with sample weights
//!
//! Bagged CART regression trees. Each tree is grown on a bootstrap draw of the
//! training rows, with split quality measured by weighted variance reduction.
//! Bootstrap multiplicities are folded into the sample weights so a row drawn
//! twice counts twice.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::error::PipelineError;

/// Values closer than this are treated as identical when looking for splits
const VALUE_EPSILON: f64 = 1e-10;

/// Hyperparameters of the forest
#[derive(Debug, Clone, PartialEq)]
pub struct ForestConfig {
    /// Number of trees in the ensemble
    pub n_trees: usize,
    /// Maximum depth of each tree (`None` grows until leaves are pure)
    pub max_depth: Option<usize>,
    /// Minimum rows (raw count) a node needs before it may split
    pub min_samples_split: usize,
    /// Minimum rows (raw count) on each side of a split
    pub min_samples_leaf: usize,
    /// Base seed; tree `t` uses `seed + t`
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A single fitted regression tree stored as a flat node arena
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

/// Weighted running sums for one side of a candidate split
#[derive(Debug, Clone, Copy, Default)]
struct Moments {
    weight: f64,
    sum: f64,
    count: usize,
}

impl Moments {
    fn add(&mut self, y: f64, w: f64) {
        self.weight += w;
        self.sum += w * y;
        self.count += 1;
    }

    fn minus(self, other: Moments) -> Moments {
        Moments {
            weight: self.weight - other.weight,
            sum: self.sum - other.sum,
            count: self.count - other.count,
        }
    }

    /// Sum of squares explained by predicting the weighted mean: S² / W
    fn explained(&self) -> f64 {
        if self.weight <= 0.0 {
            0.0
        } else {
            self.sum * self.sum / self.weight
        }
    }

    fn mean(&self) -> f64 {
        if self.weight <= 0.0 {
            0.0
        } else {
            self.sum / self.weight
        }
    }
}

/// Borrowed training data shared by every node of a tree
struct TrainingView<'a> {
    x: &'a [Vec<f64>],
    y: &'a [f64],
    w: &'a [f64],
}

/// Best split found for a node: (feature, threshold, gain)
fn find_best_split(
    data: &TrainingView<'_>,
    rows: &[usize],
    min_samples_leaf: usize,
) -> Option<(usize, f64, f64)> {
    let n = rows.len();
    if n < 2 * min_samples_leaf.max(1) {
        return None;
    }

    let mut total = Moments::default();
    for &r in rows {
        total.add(data.y[r], data.w[r]);
    }
    let parent = total.explained();
    let n_features = data.x.first().map(|row| row.len()).unwrap_or(0);

    let mut best: Option<(usize, f64, f64)> = None;
    let mut sorted = rows.to_vec();

    for feature in 0..n_features {
        sorted.sort_by(|&a, &b| {
            data.x[a][feature]
                .partial_cmp(&data.x[b][feature])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut left = Moments::default();
        for i in 0..n - 1 {
            let r = sorted[i];
            left.add(data.y[r], data.w[r]);

            let left_count = i + 1;
            if left_count < min_samples_leaf || n - left_count < min_samples_leaf {
                continue;
            }

            let here = data.x[r][feature];
            let next = data.x[sorted[i + 1]][feature];
            // Never split between identical values
            if (next - here).abs() < VALUE_EPSILON {
                continue;
            }

            let right = total.minus(left);
            let gain = left.explained() + right.explained() - parent;
            if gain > VALUE_EPSILON && best.map_or(true, |(_, _, g)| gain > g) {
                best = Some((feature, (here + next) / 2.0, gain));
            }
        }
    }

    best
}

impl RegressionTree {
    /// Grow a tree on the rows with a positive sample weight.
    fn fit(data: &TrainingView<'_>, rows: Vec<usize>, config: &ForestConfig) -> Self {
        let mut tree = RegressionTree { nodes: Vec::new() };
        tree.grow(data, rows, 0, config);
        tree
    }

    /// Recursively grow the subtree for `rows`, returning its node index
    fn grow(
        &mut self,
        data: &TrainingView<'_>,
        rows: Vec<usize>,
        depth: usize,
        config: &ForestConfig,
    ) -> usize {
        let mut moments = Moments::default();
        for &r in &rows {
            moments.add(data.y[r], data.w[r]);
        }
        let value = moments.mean();

        let depth_reached = config.max_depth.is_some_and(|max| depth >= max);
        let pure = rows
            .iter()
            .all(|&r| (data.y[r] - value).abs() < VALUE_EPSILON);

        let split = if depth_reached || pure || rows.len() < config.min_samples_split {
            None
        } else {
            find_best_split(data, &rows, config.min_samples_leaf)
        };

        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf { value });

        if let Some((feature, threshold, _gain)) = split {
            let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                .into_iter()
                .partition(|&r| data.x[r][feature] <= threshold);

            let left = self.grow(data, left_rows, depth + 1, config);
            let right = self.grow(data, right_rows, depth + 1, config);
            self.nodes[idx] = Node::Split {
                feature,
                threshold,
                left,
                right,
            };
        }

        idx
    }

    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Bagged ensemble of regression trees
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    trees: Vec<RegressionTree>,
}

impl RandomForestRegressor {
    /// Fit a forest on row-major features `x`, targets `y` and sample weights `w`.
    ///
    /// Trees are fitted in parallel; each tree draws its bootstrap sample from
    /// its own seeded generator, so the result does not depend on scheduling.
    pub fn fit(
        x: &[Vec<f64>],
        y: &[f64],
        w: &[f64],
        config: &ForestConfig,
    ) -> Result<Self, PipelineError> {
        let n = x.len();
        if n == 0 {
            return Err(PipelineError::FitFailed("no training rows".to_string()));
        }
        if y.len() != n || w.len() != n {
            return Err(PipelineError::FitFailed(format!(
                "length mismatch: {} rows, {} targets, {} weights",
                n,
                y.len(),
                w.len()
            )));
        }
        if config.n_trees == 0 {
            return Err(PipelineError::FitFailed(
                "forest needs at least one tree".to_string(),
            ));
        }
        if w.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(PipelineError::FitFailed(
                "sample weights must be finite and non-negative".to_string(),
            ));
        }
        if w.iter().all(|v| *v == 0.0) {
            return Err(PipelineError::FitFailed(
                "all sample weights are zero".to_string(),
            ));
        }

        let trees = (0..config.n_trees)
            .into_par_iter()
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(t as u64));
                let mut counts = vec![0usize; n];
                for _ in 0..n {
                    counts[rng.gen_range(0..n)] += 1;
                }

                let boot_w: Vec<f64> = w
                    .iter()
                    .zip(counts.iter())
                    .map(|(wi, &c)| wi * c as f64)
                    .collect();
                let mut rows: Vec<usize> = (0..n).filter(|&i| boot_w[i] > 0.0).collect();
                let mut view_w = boot_w;

                // A draw that only hit zero-weight rows falls back to the full sample
                if rows.is_empty() {
                    rows = (0..n).filter(|&i| w[i] > 0.0).collect();
                    view_w = w.to_vec();
                }

                let data = TrainingView { x, y, w: &view_w };
                RegressionTree::fit(&data, rows, config)
            })
            .collect();

        Ok(Self { trees })
    }

    /// Mean prediction of all trees for one row
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
        total / self.trees.len() as f64
    }

    pub fn predict(&self, x: &[Vec<f64>]) -> Vec<f64> {
        x.iter().map(|row| self.predict_row(row)).collect()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
