#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::grade::Group;

#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
/// Every location the checker reads from or writes to, plus the external
/// programs it invokes.
pub struct CheckerPaths {
    /// Directory holding the student sources and Makefile.
    #[builder(default = PathBuf::from("../src"), setter(into))]
    src_dir:   PathBuf,
    /// Name of the executable `make` produces inside `src_dir`.
    #[builder(default = String::from("main"), setter(into))]
    exec_name: String,
    /// Directory holding `commands_*.in` and `sensors_*.dat` files.
    #[builder(default = PathBuf::from("input"), setter(into))]
    tests_dir: PathBuf,
    /// Directory holding the `*.ref` expected outputs.
    #[builder(default = PathBuf::from("output"), setter(into))]
    ref_dir:   PathBuf,
    /// Directory captured outputs are written to with `--output`.
    #[builder(default = PathBuf::from("tmp"), setter(into))]
    out_dir:   PathBuf,
    /// Directory valgrind logs are written to.
    #[builder(default = PathBuf::from("valgrind_logs"), setter(into))]
    log_dir:   PathBuf,
    /// Coding style checker script.
    #[builder(default = PathBuf::from("cs/cs.sh"), setter(into))]
    cs_script: PathBuf,
    /// Memory checker program.
    #[builder(default = PathBuf::from("valgrind"), setter(into))]
    valgrind:  PathBuf,
    /// Build tool used for the build and clean steps.
    #[builder(default = PathBuf::from("make"), setter(into))]
    make:      PathBuf,
}

impl Default for CheckerPaths {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CheckerPaths {
    /// Builds the paths from `CHECKER_*` environment variables, falling back
    /// to the defaults for anything unset or blank.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            src_dir:   env_path("CHECKER_SRC_DIR").unwrap_or(defaults.src_dir),
            exec_name: env_value("CHECKER_EXEC_NAME").unwrap_or(defaults.exec_name),
            tests_dir: env_path("CHECKER_TESTS_DIR").unwrap_or(defaults.tests_dir),
            ref_dir:   env_path("CHECKER_REF_DIR").unwrap_or(defaults.ref_dir),
            out_dir:   env_path("CHECKER_OUTPUT_DIR").unwrap_or(defaults.out_dir),
            log_dir:   env_path("CHECKER_LOG_DIR").unwrap_or(defaults.log_dir),
            cs_script: env_path("CHECKER_CS_SCRIPT").unwrap_or(defaults.cs_script),
            valgrind:  env_path("CHECKER_VALGRIND").unwrap_or(defaults.valgrind),
            make:      env_path("CHECKER_MAKE").unwrap_or(defaults.make),
        }
    }

    /// Source directory of the submission.
    pub fn src_dir(&self) -> &Path {
        self.src_dir.as_path()
    }

    /// Path of the executable produced by the build step.
    pub fn exec_path(&self) -> PathBuf {
        self.src_dir.join(&self.exec_name)
    }

    /// README files that count as documentation, in lookup order.
    pub fn readme_candidates(&self) -> [PathBuf; 2] {
        [self.src_dir.join("README"), self.src_dir.join("README.md")]
    }

    /// Directory holding test inputs.
    pub fn tests_dir(&self) -> &Path {
        self.tests_dir.as_path()
    }

    /// Directory holding reference outputs.
    pub fn ref_dir(&self) -> &Path {
        self.ref_dir.as_path()
    }

    /// Directory captured outputs are saved to.
    pub fn out_dir(&self) -> &Path {
        self.out_dir.as_path()
    }

    /// Directory valgrind logs are written to.
    pub fn log_dir(&self) -> &Path {
        self.log_dir.as_path()
    }

    /// Coding style checker script.
    pub fn cs_script(&self) -> &Path {
        self.cs_script.as_path()
    }

    /// Memory checker program.
    pub fn valgrind(&self) -> &Path {
        self.valgrind.as_path()
    }

    /// Build tool.
    pub fn make(&self) -> &Path {
        self.make.as_path()
    }
}

/// Which test categories were requested on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// `--print`
    pub print:   bool,
    /// `--clear`
    pub clear:   bool,
    /// `--analyse`
    pub analyse: bool,
    /// `--all`
    pub all:     bool,
}

impl Selection {
    /// Whether categories belonging to `group` should run.
    pub fn includes(&self, group: Group) -> bool {
        self.all
            || match group {
                Group::Print => self.print,
                Group::Clear => self.clear,
                Group::Analyse => self.analyse,
            }
    }
}

#[derive(Debug, Clone, Default, TypedBuilder)]
/// Options of a single checker run, built once from the parsed flags.
pub struct RunConfig {
    /// Run every test under valgrind and enable the memory bonus.
    #[builder(default)]
    pub valgrind:    bool,
    /// Persist captured outputs to the output directory.
    #[builder(default)]
    pub save_output: bool,
    /// Print a coloured diff for every mismatching test.
    #[builder(default)]
    pub show_diff:   bool,
    /// Categories to run.
    #[builder(default)]
    pub selection:   Selection,
    /// Where to write the JSON summary, if anywhere.
    #[builder(default, setter(strip_option, into))]
    pub report:      Option<PathBuf>,
    /// Upper bound on a single run of the target program.
    #[builder(default, setter(strip_option))]
    pub run_timeout: Option<Duration>,
}

impl RunConfig {
    /// Whether this is the complete graded run: every category, under
    /// valgrind.
    pub fn is_full_run(&self) -> bool {
        self.selection.all && self.valgrind
    }
}

/// Reads an environment variable, treating blank values as unset.
fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Reads an environment variable as a path.
fn env_path(key: &str) -> Option<PathBuf> {
    env_value(key).map(PathBuf::from)
}

/// Parses an environment variable holding a number of seconds. Unset or
/// unparsable values mean "no limit".
pub fn read_timeout_secs(env: &str) -> Option<Duration> {
    env_value(env)
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_checker_layout() {
        let paths = CheckerPaths::default();
        assert_eq!(paths.exec_path(), PathBuf::from("../src/main"));
        assert_eq!(paths.tests_dir(), Path::new("input"));
        assert_eq!(paths.ref_dir(), Path::new("output"));
        assert_eq!(paths.out_dir(), Path::new("tmp"));
        assert_eq!(paths.log_dir(), Path::new("valgrind_logs"));
        assert_eq!(paths.cs_script(), Path::new("cs/cs.sh"));
        assert_eq!(
            paths.readme_candidates(),
            [PathBuf::from("../src/README"), PathBuf::from("../src/README.md")]
        );
    }

    #[test]
    fn builder_overrides_single_fields() {
        let paths = CheckerPaths::builder()
            .src_dir("/tmp/submission")
            .exec_name("sensors")
            .build();
        assert_eq!(paths.exec_path(), PathBuf::from("/tmp/submission/sensors"));
        assert_eq!(paths.ref_dir(), Path::new("output"));
    }

    #[test]
    fn all_selects_every_group() {
        let selection = Selection {
            all: true,
            ..Selection::default()
        };
        assert!(selection.includes(Group::Print));
        assert!(selection.includes(Group::Clear));
        assert!(selection.includes(Group::Analyse));
    }

    #[test]
    fn single_flag_selects_only_its_group() {
        let selection = Selection {
            clear: true,
            ..Selection::default()
        };
        assert!(!selection.includes(Group::Print));
        assert!(selection.includes(Group::Clear));
        assert!(!selection.includes(Group::Analyse));
    }

    #[test]
    fn full_run_needs_all_and_valgrind() {
        let partial = RunConfig::builder().valgrind(true).build();
        assert!(!partial.is_full_run());

        let full = RunConfig::builder()
            .valgrind(true)
            .selection(Selection {
                all: true,
                ..Selection::default()
            })
            .build();
        assert!(full.is_full_run());
    }
}
