//! Prodigy: Fair Potential Ranking CLI Tool
//!
//! Loads a player spreadsheet, ranks players with a fairness-constrained
//! model and lets the user adjust attribute weights between recomputes.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use prodigy::cli::{confirm_step, prompt_weight_action, Cli, WeightAction};
use prodigy::pipeline::{load_players, Normalization, Session};
use prodigy::report::{display_summary, display_weights, export_run, format_fairness, format_ranking};
use prodigy::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_block,
    print_completion, print_config, print_error, print_info, print_step_header, print_success,
    print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.ranker_config();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        &cli.input,
        config.seed,
        config.grid.grid_size,
        config.grid.forest.n_trees,
    );

    // Step 1: Load players
    print_step_header(1, "Load Players");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading player spreadsheet...");
    let records = match load_players(&cli.input, cli.infer_schema_length) {
        Ok(records) => records,
        Err(e) => {
            finish_with_warning(&spinner, "Could not load players");
            return Err(e);
        }
    };
    finish_with_success(&spinner, &format!("Loaded {} player(s)", records.len()));
    print_info(&format!(
        "Loaded in {:.2}s",
        step_start.elapsed().as_secs_f64()
    ));

    let (weights, normalization) = cli.initial_weights()?;
    if normalization == Normalization::ZeroSum {
        print_warning("All weight sliders are zero; keeping equal weights");
    }
    display_weights(&weights);

    let mut session = Session::new(records, weights, config);

    // Step 2: Score, fit and audit
    print_step_header(2, "Fair Ranking");
    match run_and_display(&mut session, cli.top_rows()) {
        Ok(()) => export_latest(&session, &cli)?,
        // Headless runs have no later recompute to fall back on
        Err(e) if cli.no_confirm => anyhow::bail!("Ranking failed: {}", e),
        Err(e) => {
            print_error(&format!("Ranking failed: {}", e));
            print_info("Adjust the weights and recompute");
        }
    }

    // Step 3: Interactive weight adjustment
    if !cli.no_confirm && confirm_step("Adjust weights and recompute?")? {
        print_step_header(3, "Adjust Weights");
        loop {
            match prompt_weight_action(session.weights())? {
                WeightAction::Done => break,
                WeightAction::Adjust(attribute, value) => {
                    match session.adjust_weight(attribute, value)? {
                        Normalization::ZeroSum => {
                            print_warning(
                                "At least one slider must stay above zero; weights unchanged",
                            );
                            continue;
                        }
                        Normalization::Applied => {}
                    }
                    display_weights(session.weights());
                    if let Err(e) = run_and_display(&mut session, cli.top_rows()) {
                        print_error(&format!("Recompute failed: {}", e));
                        if session.latest().is_some() {
                            print_info("Previous ranking kept");
                        }
                    }
                }
            }
        }
        export_latest(&session, &cli)?;
    }

    print_completion();
    Ok(())
}

/// Recompute the session and print ranking, fairness panel and summary
fn run_and_display(session: &mut Session, top: Option<usize>) -> Result<()> {
    let step_start = Instant::now();
    let result = session.recompute()?;

    for warning in result.warnings() {
        print_warning(&warning.to_string());
    }
    print_success(&format!(
        "Ranked {} player(s) in {:.2}s",
        result.outcome.ranking.len(),
        step_start.elapsed().as_secs_f64()
    ));

    println!();
    println!(
        "    {} {}",
        style("🏆").cyan(),
        style("RANKING").white().bold()
    );
    print_block(&format_ranking(&result.outcome.ranking, top));

    println!();
    println!(
        "    {} {}",
        style("⚖️").cyan(),
        style("FAIRNESS").white().bold()
    );
    print_block(&format_fairness(&result.fairness));

    display_summary(result);
    Ok(())
}

/// Write the latest run to the export path, if one was requested
fn export_latest(session: &Session, cli: &Cli) -> Result<()> {
    let (Some(path), Some(result)) = (cli.export.as_deref(), session.latest()) else {
        return Ok(());
    };
    export_run(
        result,
        session.config(),
        &cli.input.display().to_string(),
        path,
    )?;
    print_success(&format!("Exported results to {}", path.display()));
    Ok(())
}
