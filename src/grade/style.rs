#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{ffi::OsString, io::ErrorKind, path::Path, time::Duration};

use anyhow::{Context, Result};
use colored::Colorize;
use itertools::Itertools;

use super::results::Grade;
use crate::{
    config::CheckerPaths,
    constants::{README_MIN_LINES, STYLE_ERROR_MARKER, STYLE_POINTS},
    process::{StdinSource, run_collect},
};

/// What the coding style checker and the README lookup found.
#[derive(Debug, Clone)]
pub struct StyleReport {
    /// Combined stdout and stderr of the checker.
    pub output:       String,
    /// Whether a README longer than the minimum exists.
    pub readme_found: bool,
}

impl StyleReport {
    /// Whether the checker reported no violation.
    pub fn is_clean(&self) -> bool {
        !self.output.contains(STYLE_ERROR_MARKER)
    }

    /// Full points for a clean report, none otherwise. The README never
    /// affects the grade.
    pub fn grade(&self) -> Grade {
        let grade = if self.is_clean() { STYLE_POINTS } else { 0 };
        Grade::new(grade, STYLE_POINTS)
    }

    /// Checker output lines reporting a violation.
    pub fn error_lines(&self) -> impl Iterator<Item = &str> {
        self.output
            .lines()
            .filter(|line| line.contains(STYLE_ERROR_MARKER))
    }

    /// Headline printed for the report.
    pub fn headline(&self) -> String {
        let status = if self.is_clean() { "OK" } else { "ERROR" };
        let readme = if self.readme_found {
            "README/README.md found."
        } else {
            "README/README.md not found or is empty."
        };
        format!("Coding Style {status} | {readme} {}", self.grade())
    }

    /// Prints the headline, followed by every violation when there are any.
    pub fn print(&self) {
        if self.is_clean() {
            println!("{}", self.headline().bright_green());
        } else {
            println!("{}\n", self.headline().bright_red());
            println!("{}", self.error_lines().join("\n"));
        }
    }
}

/// Runs the coding style checker on the sources and looks for a README.
pub async fn check_style(paths: &CheckerPaths, deadline: Option<Duration>) -> Result<StyleReport> {
    let collected = run_collect(
        paths.cs_script(),
        &[OsString::from(paths.src_dir())],
        StdinSource::Null,
        deadline,
    )
    .await
    .with_context(|| format!("Could not run coding style checker {}", paths.cs_script().display()))?;

    let mut readme_found = false;
    for candidate in paths.readme_candidates() {
        if readme_long_enough(&candidate).await? {
            readme_found = true;
            break;
        }
    }

    Ok(StyleReport {
        output: collected.combined_output(),
        readme_found,
    })
}

/// Whether the file at `path` exists and has more than the minimum number
/// of lines.
pub async fn readme_long_enough(path: &Path) -> Result<bool> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(count_lines(&bytes) > README_MIN_LINES),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Could not read {}", path.display())),
    }
}

/// Counts lines the way a universal-newline reader would: `\n`, `\r\n` and a
/// lone `\r` each end a line, and a trailing line without one still counts.
fn count_lines(bytes: &[u8]) -> usize {
    let endings = bytes
        .iter()
        .enumerate()
        .filter(|&(i, &b)| b == b'\n' || (b == b'\r' && bytes.get(i + 1) != Some(&b'\n')))
        .count();
    match bytes.last() {
        Some(b'\n' | b'\r') | None => endings,
        Some(_) => endings + 1,
    }
}
