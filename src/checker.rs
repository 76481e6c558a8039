#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use anyhow::Result;
use colored::Colorize;

use crate::{
    config::{CheckerPaths, RunConfig},
    grade::{CATEGORIES, Scoreboard, SuiteRunner, check_style, report},
    make,
};

/// Drives a whole run: build, style check, selected categories, total and
/// clean.
#[derive(Debug, Clone)]
pub struct Checker {
    /// Checker layout and external programs.
    paths:  CheckerPaths,
    /// Options of this run.
    config: RunConfig,
}

impl Checker {
    /// Creates a checker for one run.
    pub fn new(paths: CheckerPaths, config: RunConfig) -> Self {
        Self { paths, config }
    }

    /// Runs every step and returns the final scoreboard. Setup failures
    /// surface as [`make::SetupError`].
    pub async fn run(&self) -> Result<Scoreboard> {
        let mut board = Scoreboard::new(self.config.valgrind);

        report::print_banner("INIT TEST");
        tracing::info!("Building {}", self.paths.src_dir().display());
        make::build(&self.paths).await?;

        report::print_banner("README AND CS TEST");
        let style = check_style(&self.paths, self.config.run_timeout).await?;
        style.print();
        board.set_style(style.grade());

        self.run_categories(&mut board).await?;

        if !self.config.is_full_run() {
            println!(
                "{}",
                "\nIMPORTANT: Use --all -v for whole test suite with valgrind\n".bright_red()
            );
        }

        report::print_banner(&format!("TOTAL {}", board.total()));
        if !board.categories().is_empty() {
            println!("{}", report::overview_table(&board));
        }
        if let Some(path) = &self.config.report {
            report::write_json(&board, path).await?;
        }

        report::print_warning_banner("MAKE CLEAN");
        report::print_banner("FINISH TEST");
        make::clean(&self.paths).await?;

        Ok(board)
    }

    /// Runs the selected categories in order, recording each on `board`.
    pub async fn run_categories(&self, board: &mut Scoreboard) -> Result<()> {
        let selected: Vec<_> = CATEGORIES
            .iter()
            .filter(|category| self.config.selection.includes(category.group))
            .collect();
        if selected.is_empty() {
            return Ok(());
        }

        let runner = SuiteRunner::new(&self.paths, &self.config).await?;
        for category in selected {
            report::print_banner(&category.title());
            tracing::info!("Running `{}` tests", category.name);
            board.push(runner.run(category).await?);
        }
        Ok(())
    }
}
