//! Terminal styling helpers for status lines, headers and the banner

use console::{style, Emoji};
use std::path::Path;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static SEED: Emoji<'_, '_> = Emoji("🌱 ", "");
pub static GRID: Emoji<'_, '_> = Emoji("🧮 ", "");
pub static TREE: Emoji<'_, '_> = Emoji("🌳 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("★").magenta().bold(),
        style("PRODIGY").cyan().bold()
    );
    println!(
        "    {}",
        style("Fair potential rankings for youth athletes").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(input: &Path, seed: u64, grid_size: usize, n_trees: usize) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Input:      {:<35}│",
        FOLDER,
        truncate_path(input, 34)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Seed:       {:<35}│",
        SEED,
        style(seed).yellow()
    );
    println!(
        "    │  {} Grid size:  {:<35}│",
        GRID,
        style(grid_size).yellow()
    );
    println!(
        "    │  {} Trees:      {:<35}│",
        TREE,
        style(n_trees).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a recoverable warning
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print a failure that does not end the session
pub fn print_error(message: &str) {
    eprintln!("    {} {}", style("✗").red().bold(), style(message).red());
}

/// Print a block of preformatted text indented under the current step
pub fn print_block(text: &str) {
    for line in text.lines() {
        println!("      {}", line);
    }
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Prodigy ranking complete!").green().bold()
    );
    println!();
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    let len = path_str.chars().count();
    if len <= max_len {
        path_str
    } else {
        let tail: String = path_str.chars().skip(len - max_len + 3).collect();
        format!("...{}", tail)
    }
}
