//! Fixed-width text rendering of the ranking and the fairness panel

use std::fmt::Write;

use crate::pipeline::{FairnessReport, RankedPlayer, SliceReport};

/// Widest player name shown in the ranking table
pub const NAME_WIDTH: usize = 20;

/// Shorten `name` to at most `max_len` characters, marking the cut with "..."
pub fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        return name.to_string();
    }
    if max_len <= 3 {
        return name.chars().take(max_len).collect();
    }
    let kept: String = name.chars().take(max_len - 3).collect();
    format!("{}...", kept)
}

/// Render the ranked table, one fixed-width line per player.
///
/// `top` limits the number of rows; `None` renders everyone.
pub fn format_ranking(ranking: &[RankedPlayer], top: Option<usize>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6}{:<width$}  {:<8}{:>4}  {:>14}",
        "Rank",
        "Name",
        "Gender",
        "Age",
        "Prodigy Chance",
        width = NAME_WIDTH
    );

    let shown = top.unwrap_or(ranking.len()).min(ranking.len());
    for player in &ranking[..shown] {
        let _ = writeln!(
            out,
            "{:<6}{:<width$}  {:<8}{:>4}  {:>14}",
            player.rank,
            truncate_name(&player.name, NAME_WIDTH),
            truncate_name(&player.gender, 8),
            player.age,
            format!("{:.2}%", player.prodigy_chance),
            width = NAME_WIDTH
        );
    }

    if shown < ranking.len() {
        let _ = writeln!(out, "... {} more player(s)", ranking.len() - shown);
    }
    out
}

fn write_slice(out: &mut String, slice: &SliceReport) {
    let _ = writeln!(out, "Selection rate by {}:", slice.slice);
    for group in &slice.groups {
        let _ = writeln!(out, "  {}: {:.3}", group.group, group.selection_rate);
    }
    let _ = writeln!(
        out,
        "  parity difference: {:.3}, parity ratio: {:.3}",
        slice.parity_difference, slice.parity_ratio
    );
}

/// Render the fairness panel: one line per group, rates to three decimals
pub fn format_fairness(report: &FairnessReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "High-potential threshold: {:.3}", report.threshold);
    write_slice(&mut out, &report.by_gender);
    write_slice(&mut out, &report.by_gender_age);
    out
}
