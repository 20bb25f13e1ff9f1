//! Selection-rate fairness metrics
//!
//! Predictions count as "selected" when the prodigy chance is above the
//! high-potential threshold learned on the training partition. The same
//! training threshold is applied to the raw scores of the full population to
//! get the reference (base) rate of each group.

use std::collections::BTreeMap;

use serde::Serialize;

use super::player::AgeGroup;
use super::ranker::FairPrediction;
use super::score::ScoredRecord;

/// Metrics for one sensitive group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRate {
    /// Group key: a gender value, or `"Gender & AgeGroup"`
    pub group: String,
    pub size: usize,
    /// Fraction of the group with prodigy chance above the threshold
    pub selection_rate: f64,
    /// Fraction of the group with raw score above the threshold
    pub base_rate: f64,
}

/// Metrics for every group of one slicing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceReport {
    /// Which attribute(s) the groups are keyed by
    pub slice: String,
    pub groups: Vec<GroupRate>,
    /// Largest minus smallest selection rate
    pub parity_difference: f64,
    /// Smallest over largest selection rate (1.0 when nobody is selected)
    pub parity_ratio: f64,
}

impl SliceReport {
    pub fn rate(&self, group: &str) -> Option<f64> {
        self.groups
            .iter()
            .find(|g| g.group == group)
            .map(|g| g.selection_rate)
    }
}

/// Selection rates by Gender and by (Gender, AgeGroup)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FairnessReport {
    pub threshold: f64,
    pub by_gender: SliceReport,
    pub by_gender_age: SliceReport,
}

/// Accumulates (selected, truly high) counts per group key
fn summarize<K: Ord>(
    slice: &str,
    rows: impl Iterator<Item = (K, bool, bool)>,
    label: impl Fn(&K) -> String,
) -> SliceReport {
    let mut counts: BTreeMap<K, (usize, usize, usize)> = BTreeMap::new();
    for (key, selected, truly_high) in rows {
        let entry = counts.entry(key).or_insert((0, 0, 0));
        entry.0 += 1;
        entry.1 += usize::from(selected);
        entry.2 += usize::from(truly_high);
    }

    let groups: Vec<GroupRate> = counts
        .iter()
        .map(|(key, &(size, selected, truly_high))| GroupRate {
            group: label(key),
            size,
            selection_rate: selected as f64 / size as f64,
            base_rate: truly_high as f64 / size as f64,
        })
        .collect();

    let max = groups.iter().map(|g| g.selection_rate).fold(0.0, f64::max);
    let min = groups
        .iter()
        .map(|g| g.selection_rate)
        .fold(f64::INFINITY, f64::min);
    let (parity_difference, parity_ratio) = if groups.is_empty() || max == 0.0 {
        (0.0, 1.0)
    } else {
        (max - min, min / max)
    };

    SliceReport {
        slice: slice.to_string(),
        groups,
        parity_difference,
        parity_ratio,
    }
}

/// Compute the fairness report for one run.
///
/// `scored` and `predictions` are parallel, in input order. Every group that
/// occurs in the data is reported, including groups with no one selected.
pub fn audit(
    scored: &[ScoredRecord],
    predictions: &[FairPrediction],
    threshold: f64,
) -> FairnessReport {
    let flags: Vec<(bool, bool)> = scored
        .iter()
        .zip(predictions.iter())
        .map(|(s, p)| (p.prodigy_chance > threshold, s.raw_score > threshold))
        .collect();

    let by_gender = summarize(
        "Gender",
        scored
            .iter()
            .zip(flags.iter())
            .map(|(s, &(sel, high))| (s.record.gender.clone(), sel, high)),
        |gender| gender.clone(),
    );

    let by_gender_age = summarize(
        "Gender & AgeGroup",
        scored
            .iter()
            .zip(flags.iter())
            .map(|(s, &(sel, high))| ((s.record.gender.clone(), s.age_group), sel, high)),
        |(gender, age_group): &(String, AgeGroup)| format!("{} & {}", gender, age_group),
    );

    FairnessReport {
        threshold,
        by_gender,
        by_gender_age,
    }
}
