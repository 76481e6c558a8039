#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use tabled::{
    Table,
    settings::{Panel, Style},
};

use super::results::{CaseResult, CategoryResult, Scoreboard, TestOutcome};
use crate::constants::BANNER_WIDTH;

/// Centers `title` in a line of `=`.
pub fn banner(title: &str) -> String {
    format!("\n{:=^width$}\n", format!(" {title} "), width = BANNER_WIDTH)
}

/// Prints a blue step banner.
pub fn print_banner(title: &str) {
    println!("{}", banner(title).bright_blue());
}

/// Prints a yellow step banner.
pub fn print_warning_banner(title: &str) {
    println!("{}", banner(title).bright_yellow());
}

/// The line printed for a finished test case.
pub fn case_line(case: &CaseResult) -> String {
    let name = &case.name;
    let grade = case.grade;
    match case.outcome {
        TestOutcome::MatchedConfirmed => format!("Test `{name}` PASSED: {grade}"),
        TestOutcome::MatchedUnconfirmed if case.memory_checked => {
            format!("Test `{name}` OUT = REF, memory check failed: {grade}")
        }
        TestOutcome::MatchedUnconfirmed => {
            format!("Test `{name}` OUT = REF, without memory check: {grade}")
        }
        TestOutcome::Mismatched => format!("Test `{name}` FAILED: {grade}"),
    }
}

/// Prints a finished test case in the colour of its outcome.
pub fn print_case(case: &CaseResult) {
    let line = case_line(case);
    match case.outcome {
        TestOutcome::MatchedConfirmed => println!("{}", line.bright_green()),
        TestOutcome::MatchedUnconfirmed => println!("{}", line.bright_yellow()),
        TestOutcome::Mismatched => println!("{}", line.bright_red()),
    }
}

/// Prints the subtotal line of a category.
pub fn print_category(category: &CategoryResult) {
    println!("\n`{}` tests: {}\n", category.name, category.grade);
}

/// Renders the per-category overview with the total in the footer.
pub fn overview_table(board: &Scoreboard) -> String {
    Table::new(board.categories())
        .with(Panel::header("Grading Overview"))
        .with(Panel::footer(format!(
            "Style: {} | Memory: {} | Total: {}",
            board.style(),
            board.memory_bonus(),
            board.total()
        )))
        .with(Style::modern())
        .to_string()
}

/// Writes the run summary as pretty JSON to `path`.
pub async fn write_json(board: &Scoreboard, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&board.summary())
        .context("Failed to serialize run summary")?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Could not create {}", parent.display()))?;
    }
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Could not write report to {}", path.display()))?;
    tracing::info!("Wrote run summary to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_centers_title() {
        let line = banner("INIT TEST");
        assert_eq!(line.trim().len(), BANNER_WIDTH);
        assert!(line.contains(" INIT TEST "));
        assert!(line.trim().starts_with('='));
        assert!(line.trim().ends_with('='));
    }

    #[test]
    fn case_lines_follow_outcome() {
        use TestOutcome::*;
        let line = |outcome, checked| case_line(&CaseResult::new("print_easy_1", outcome, checked, 2));

        assert_eq!(line(MatchedConfirmed, true), "Test `print_easy_1` PASSED: 2 / 2");
        assert_eq!(
            line(MatchedUnconfirmed, false),
            "Test `print_easy_1` OUT = REF, without memory check: 2 / 2"
        );
        assert_eq!(
            line(MatchedUnconfirmed, true),
            "Test `print_easy_1` OUT = REF, memory check failed: 2 / 2"
        );
        assert_eq!(line(Mismatched, true), "Test `print_easy_1` FAILED: 0 / 2");
    }
}
