//! # checker
//!
//! Builds a C submission, checks its coding style and grades it against the
//! reference outputs.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use anyhow::Result;
use bpaf::*;
use checker::{Checker, CheckerPaths, RunConfig, Selection, SetupError, config::read_timeout_secs};
use dotenvy::dotenv;
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Parsed command line flags.
#[derive(Debug, Clone)]
struct Options {
    /// Run tests under valgrind
    valgrind: bool,
    /// Save captured outputs
    output:   bool,
    /// Run `clear` tests
    clear:    bool,
    /// Run `analyse` tests
    analyse:  bool,
    /// Run `print` tests
    print:    bool,
    /// Run every test
    all:      bool,
    /// Show diffs of failing tests
    diff:     bool,
    /// JSON summary destination
    report:   Option<PathBuf>,
}

impl Options {
    /// Turns the flags into the options of a run.
    fn into_run_config(self) -> RunConfig {
        let selection = Selection {
            print:   self.print,
            clear:   self.clear,
            analyse: self.analyse,
            all:     self.all,
        };
        let mut config = RunConfig::builder()
            .valgrind(self.valgrind)
            .save_output(self.output)
            .show_diff(self.diff)
            .selection(selection)
            .build();
        config.report = self.report;
        config.run_timeout = read_timeout_secs("CHECKER_RUN_TIMEOUT_SECS");
        config
    }
}

/// Parse the command line arguments and return the flags
fn options() -> OptionParser<Options> {
    let valgrind = short('v')
        .long("valgrind")
        .help("Run tests with `valgrind`. Tests may take longer to finish.")
        .switch();
    let output = short('o')
        .long("output")
        .help("Create output files for the selected tests in `tmp` directory.")
        .switch();
    let clear = short('c')
        .long("clear")
        .help("Run tests for `clear` command.")
        .switch();
    let analyse = short('a')
        .long("analyse")
        .help("Run tests for `analyse` command.")
        .switch();
    let print = short('p')
        .long("print")
        .help("Run tests for `print` command.")
        .switch();
    let all = long("all").help("Run all tests.").switch();
    let diff = short('d')
        .long("diff")
        .help("Show a diff against the reference for failed tests.")
        .switch();
    let report = long("report")
        .help("Write a JSON summary of the run to PATH.")
        .argument::<PathBuf>("PATH")
        .optional();

    construct!(Options {
        valgrind,
        output,
        clear,
        analyse,
        print,
        all,
        diff,
        report
    })
    .to_options()
    .descr("Checker for the sensor data processing assignment")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let level = std::env::var("CHECKER_LOG")
        .ok()
        .and_then(|value| value.parse::<Level>().ok())
        .unwrap_or(Level::INFO);
    let fmt = fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_file(false)
        .with_line_number(false);
    tracing_subscriber::registry()
        .with(fmt)
        .with(LevelFilter::from_level(level))
        .init();

    if std::env::args_os().len() == 1 {
        if let Err(help) = options().run_inner(&["--help"]) {
            help.print_mesage(100);
        }
        return Ok(());
    }

    let checker = Checker::new(CheckerPaths::from_env(), options().run().into_run_config());
    match checker.run().await {
        Ok(_) => Ok(()),
        Err(e) => match e.downcast_ref::<SetupError>() {
            Some(setup) => {
                eprintln!("{setup}");
                std::process::exit(setup.exit_code());
            }
            None => Err(e),
        },
    }
}
