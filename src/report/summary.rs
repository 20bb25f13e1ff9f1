//! Run summary and weight tables

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{RunResult, WeightVector};

/// Build the weights table: attribute, raw slider value, effective weight
pub fn weights_table(weights: &WeightVector) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Attribute").add_attribute(Attribute::Bold),
        Cell::new("Slider").add_attribute(Attribute::Bold),
        Cell::new("Weight").add_attribute(Attribute::Bold),
    ]);

    for (attr, raw, weight) in weights.entries() {
        table.add_row(vec![
            Cell::new(attr.column_name()),
            Cell::new(format!("{:.2}", raw)),
            Cell::new(format!("{:.3}", weight)).fg(if weight > 0.0 {
                Color::White
            } else {
                Color::DarkGrey
            }),
        ]);
    }
    table
}

/// Build the run summary table
pub fn summary_table(result: &RunResult) -> Table {
    let outcome = &result.outcome;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![
        Cell::new("👥 Players"),
        Cell::new(result.scored.len()),
    ]);
    table.add_row(vec![
        Cell::new("🏋️  Train / Eval"),
        Cell::new(format!("{} / {}", outcome.train_size, outcome.test_size)),
    ]);
    table.add_row(vec![
        Cell::new("🎯 Threshold"),
        Cell::new(format!("{:.3}", outcome.threshold)),
    ]);
    table.add_row(vec![
        Cell::new("🧮 Grid points"),
        Cell::new(outcome.candidates_evaluated),
    ]);
    table.add_row(vec![
        Cell::new("⚖️  Selected λ"),
        Cell::new(
            outcome
                .selected
                .lambda
                .iter()
                .map(|l| format!("{:+.2}", l))
                .collect::<Vec<_>>()
                .join(", "),
        ),
    ]);
    table.add_row(vec![
        Cell::new("📐 Train error"),
        Cell::new(format!("{:.3}", outcome.selected.error)),
    ]);
    table.add_row(vec![
        Cell::new("📏 Train parity gap"),
        Cell::new(format!("{:.3}", outcome.selected.parity_violation)),
    ]);

    let accuracy = match outcome.eval_accuracy {
        Some(acc) => Cell::new(format!("{:.1}%", acc * 100.0))
            .fg(if acc >= 0.8 {
                Color::Green
            } else if acc >= 0.6 {
                Color::Yellow
            } else {
                Color::Red
            })
            .add_attribute(Attribute::Bold),
        None => Cell::new("n/a").fg(Color::DarkGrey),
    };
    table.add_row(vec![Cell::new("✅ Eval accuracy"), accuracy]);

    let gap = result.fairness.by_gender.parity_difference;
    table.add_row(vec![
        Cell::new("📉 Selection gap (Gender)"),
        Cell::new(format!("{:.3}", gap))
            .fg(if gap > 0.2 {
                Color::Red
            } else if gap > 0.1 {
                Color::Yellow
            } else {
                Color::Green
            })
            .add_attribute(Attribute::Bold),
    ]);

    table
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

/// Print the weights table under a section title
pub fn display_weights(weights: &WeightVector) {
    println!();
    println!(
        "    {} {}",
        style("🎚️").cyan(),
        style("ATTRIBUTE WEIGHTS").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    print_indented(&weights_table(weights));
}

/// Print the run summary table under a section title
pub fn display_summary(result: &RunResult) {
    println!();
    println!(
        "    {} {}",
        style("📋").cyan(),
        style("RUN SUMMARY").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    print_indented(&summary_table(result));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_table_lists_every_attribute() {
        let text = weights_table(&WeightVector::default()).to_string();
        for attr in crate::pipeline::Attribute::ALL {
            assert!(text.contains(attr.column_name()), "missing {}", attr);
        }
        assert!(text.contains("0.111"));
        assert!(text.contains("0.50"));
    }
}
