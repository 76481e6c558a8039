#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Coloured diffs of mismatching outputs.
pub mod diff;
/// Terminal and JSON reporting.
pub mod report;
/// Grade, outcome and scoreboard types.
pub mod results;
/// Coding style and README check.
pub mod style;
/// Categories, test cases and the suite runner.
pub mod suite;

pub use results::{CaseResult, CategoryResult, Grade, Scoreboard, Summary, TestOutcome};
pub use style::{StyleReport, check_style};
pub use suite::{CATEGORIES, Category, Group, SuiteRunner, TestCase};
