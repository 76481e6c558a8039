#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use which::which;

use super::{
    diff::render_diff,
    report,
    results::{CaseResult, CategoryResult, TestOutcome},
};
use crate::{
    config::{CheckerPaths, RunConfig},
    memcheck,
    process::{StdinSource, run_collect},
};

/// Command-line flag a category is selected by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    /// `--print`
    Print,
    /// `--clear`
    Clear,
    /// `--analyse`
    Analyse,
}

/// A named group of numbered test cases sharing a point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Name used in every file of the category, e.g. `print_easy`.
    pub name:   &'static str,
    /// Flag selecting the category.
    pub group:  Group,
    /// Points per passing test.
    pub points: u32,
    /// Number of tests, numbered from 1.
    pub count:  u32,
}

/// Every graded category, in the order they run.
pub static CATEGORIES: [Category; 5] = [
    Category {
        name:   "print_easy",
        group:  Group::Print,
        points: 2,
        count:  5,
    },
    Category {
        name:   "print_hard",
        group:  Group::Print,
        points: 4,
        count:  5,
    },
    Category {
        name:   "clear_easy",
        group:  Group::Clear,
        points: 2,
        count:  5,
    },
    Category {
        name:   "clear_hard",
        group:  Group::Clear,
        points: 2,
        count:  5,
    },
    Category {
        name:   "analyse",
        group:  Group::Analyse,
        points: 4,
        count:  5,
    },
];

impl Category {
    /// Banner title, e.g. `PRINT EASY TESTS`.
    pub fn title(&self) -> String {
        format!("{} TESTS", self.name.replace('_', " ").to_uppercase())
    }

    /// Maximum points of the category.
    pub fn out_of(&self) -> u32 {
        self.points * self.count
    }

    /// Test cases of the category, in index order.
    pub fn cases(&self) -> impl Iterator<Item = TestCase> + '_ {
        (1..=self.count).map(|index| TestCase {
            category: self.name,
            index,
        })
    }
}

/// One `(category, index)` test case and the files belonging to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestCase {
    /// Category name.
    pub category: &'static str,
    /// 1-based index within the category.
    pub index:    u32,
}

impl TestCase {
    /// `<category>_<index>`
    pub fn name(&self) -> String {
        format!("{}_{}", self.category, self.index)
    }

    /// Command script piped to the target's stdin.
    pub fn commands_path(&self, paths: &CheckerPaths) -> PathBuf {
        paths
            .tests_dir()
            .join(format!("commands_{}.in", self.name()))
    }

    /// Sensor data file passed as the target's argument.
    pub fn data_path(&self, paths: &CheckerPaths) -> PathBuf {
        paths
            .tests_dir()
            .join(format!("sensors_{}.dat", self.name()))
    }

    /// Expected output.
    pub fn reference_path(&self, paths: &CheckerPaths) -> PathBuf {
        paths.ref_dir().join(format!("{}.ref", self.name()))
    }

    /// Where the captured output is saved with `--output`.
    pub fn output_path(&self, paths: &CheckerPaths) -> PathBuf {
        paths.out_dir().join(format!("{}.out", self.name()))
    }

    /// Where valgrind writes its log.
    pub fn log_path(&self, paths: &CheckerPaths) -> PathBuf {
        paths.log_dir().join(format!("{}.log", self.name()))
    }
}

/// Runs categories against the built executable, one test at a time.
pub struct SuiteRunner<'a> {
    /// Checker layout.
    paths:    &'a CheckerPaths,
    /// Options of this run.
    config:   &'a RunConfig,
    /// Resolved valgrind binary, when leak checking is on.
    valgrind: Option<PathBuf>,
}

impl<'a> SuiteRunner<'a> {
    /// Prepares a runner, resolving valgrind and creating the output and log
    /// directories the run needs.
    pub async fn new(paths: &'a CheckerPaths, config: &'a RunConfig) -> Result<Self> {
        let valgrind = if config.valgrind {
            let resolved = which(paths.valgrind()).with_context(|| {
                format!("Cannot find a memory checker on path ({})", paths.valgrind().display())
            })?;
            create_dir(paths.log_dir()).await?;
            Some(resolved)
        } else {
            None
        };

        if config.save_output {
            create_dir(paths.out_dir()).await?;
        }

        Ok(Self {
            paths,
            config,
            valgrind,
        })
    }

    /// Runs every case of `category` and returns its subtotal.
    pub async fn run(&self, category: &Category) -> Result<CategoryResult> {
        let mut cases = Vec::with_capacity(category.count as usize);
        for case in category.cases() {
            let result = self.run_case(&case, category.points).await?;
            report::print_case(&result);
            if let Some(diff) = &result.diff {
                print!("{diff}");
            }
            cases.push(result);
        }

        let result = CategoryResult::new(category.name, category.points, cases);
        report::print_category(&result);
        Ok(result)
    }

    /// Runs a single case and scores it.
    pub async fn run_case(&self, case: &TestCase, points: u32) -> Result<CaseResult> {
        let commands_path = case.commands_path(self.paths);
        let commands = tokio::fs::read(&commands_path)
            .await
            .with_context(|| format!("Could not read commands {}", commands_path.display()))?;

        let exec = self.paths.exec_path();
        let target_args = vec![case.data_path(self.paths).into_os_string()];
        let log_path = case.log_path(self.paths);
        let (program, args): (PathBuf, Vec<OsString>) = match &self.valgrind {
            Some(valgrind) => {
                memcheck::clear_log(&log_path).await?;
                (valgrind.clone(), memcheck::wrap_args(&log_path, &exec, &target_args))
            }
            None => (exec, target_args),
        };

        let collected = run_collect(
            &program,
            &args,
            StdinSource::Bytes(commands),
            self.config.run_timeout,
        )
        .await
        .with_context(|| format!("Could not run test `{}`", case.name()))?;
        tracing::debug!("`{}` exited with {}", case.name(), collected.status);
        let actual = collected.stdout;

        if self.config.save_output {
            let out_path = case.output_path(self.paths);
            tokio::fs::write(&out_path, &actual)
                .await
                .with_context(|| format!("Could not write output {}", out_path.display()))?;
        }

        let reference_path = case.reference_path(self.paths);
        let expected = tokio::fs::read(&reference_path)
            .await
            .with_context(|| format!("Could not read reference {}", reference_path.display()))?;

        let outcome = if actual != expected {
            TestOutcome::Mismatched
        } else if self.valgrind.is_some() && memcheck::confirms_no_leaks(&log_path).await? {
            TestOutcome::MatchedConfirmed
        } else {
            if self.valgrind.is_some() {
                tracing::debug!("`{}` forfeits the memory bonus", case.name());
            }
            TestOutcome::MatchedUnconfirmed
        };

        let result = CaseResult::new(case.name(), outcome, self.valgrind.is_some(), points);
        if outcome == TestOutcome::Mismatched && self.config.show_diff {
            return Ok(result.with_diff(render_diff(&expected, &actual)));
        }
        Ok(result)
    }
}

/// Creates `dir` and its parents if missing.
async fn create_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Could not create {}", dir.display()))
}
