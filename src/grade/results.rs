#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::constants::{MAX_POINTS, MEMORY_POINTS, MEMORY_THRESHOLD};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Points awarded out of points available.
pub struct Grade {
    /// The points received
    pub grade:  u32,
    /// The maximum points possible
    pub out_of: u32,
}

impl Grade {
    /// Creates a new grade -
    /// * `grade` - The points received
    /// * `out_of` - The maximum points possible
    pub fn new(grade: u32, out_of: u32) -> Self {
        Self { grade, out_of }
    }
}

impl Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.grade, self.out_of)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// What happened when a single test case ran.
pub enum TestOutcome {
    /// Output matched and valgrind confirmed no leaks.
    MatchedConfirmed,
    /// Output matched but leak freedom was not confirmed, either because
    /// valgrind was off or because its log lacked the confirmation.
    MatchedUnconfirmed,
    /// Output differed from the reference.
    Mismatched,
}

impl TestOutcome {
    /// Whether the output matched the reference.
    pub fn is_match(self) -> bool {
        !matches!(self, TestOutcome::Mismatched)
    }

    /// Whether this outcome forfeits the memory bonus for the whole run.
    pub fn forfeits_memory_bonus(self) -> bool {
        matches!(self, TestOutcome::MatchedUnconfirmed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Result of one `(category, index)` test case.
pub struct CaseResult {
    /// `<category>_<index>`
    pub name:           String,
    /// Outcome of the comparison and memory check.
    pub outcome:        TestOutcome,
    /// Whether the case ran under valgrind.
    pub memory_checked: bool,
    /// Points awarded for this case.
    pub grade:          Grade,
    /// Rendered diff against the reference, when requested for a mismatch.
    #[serde(skip)]
    pub diff:           Option<String>,
}

impl CaseResult {
    /// Scores an outcome: full points on a match, nothing otherwise.
    pub fn new(name: impl Into<String>, outcome: TestOutcome, memory_checked: bool, points: u32) -> Self {
        let grade = if outcome.is_match() { points } else { 0 };
        Self {
            name: name.into(),
            outcome,
            memory_checked,
            grade: Grade::new(grade, points),
            diff: None,
        }
    }

    /// Attaches the diff printed after the case line.
    pub fn with_diff(mut self, diff: String) -> Self {
        self.diff = Some(diff);
        self
    }
}

#[derive(Debug, Clone, Tabled, Serialize, Deserialize)]
/// Subtotal of a single category.
pub struct CategoryResult {
    #[tabled(rename = "Category")]
    /// Category name, e.g. `print_easy`.
    pub name:  String,
    #[tabled(rename = "Grade")]
    /// Points across all cases of the category.
    pub grade: Grade,
    #[tabled(skip)]
    /// Every case, in index order.
    pub cases: Vec<CaseResult>,
}

impl CategoryResult {
    /// Sums the cases of a category with `points` per case.
    pub fn new(name: impl Into<String>, points: u32, cases: Vec<CaseResult>) -> Self {
        let awarded = cases.iter().map(|case| case.grade.grade).sum();
        let out_of = points * cases.len() as u32;
        Self {
            name: name.into(),
            grade: Grade::new(awarded, out_of),
            cases,
        }
    }

    /// Outcomes of every case in the category.
    pub fn outcomes(&self) -> impl Iterator<Item = TestOutcome> + '_ {
        self.cases.iter().map(|case| case.outcome)
    }
}

#[derive(Debug, Clone, Default)]
/// Accumulates everything a run scores. Passed through each step instead of
/// living in global state.
pub struct Scoreboard {
    /// Whether tests ran under valgrind.
    valgrind:   bool,
    /// Coding style block.
    style:      Grade,
    /// Categories in the order they ran.
    categories: Vec<CategoryResult>,
}

impl Scoreboard {
    /// Creates an empty scoreboard for a run with or without valgrind.
    pub fn new(valgrind: bool) -> Self {
        Self {
            valgrind,
            ..Self::default()
        }
    }

    /// Records the coding style result.
    pub fn set_style(&mut self, style: Grade) {
        self.style = style;
    }

    /// Records a finished category.
    pub fn push(&mut self, category: CategoryResult) {
        self.categories.push(category);
    }

    /// Coding style block.
    pub fn style(&self) -> Grade {
        self.style
    }

    /// Categories in the order they ran.
    pub fn categories(&self) -> &[CategoryResult] {
        &self.categories
    }

    /// Style points plus every category subtotal.
    pub fn base_points(&self) -> u32 {
        self.style.grade
            + self
                .categories
                .iter()
                .map(|category| category.grade.grade)
                .sum::<u32>()
    }

    /// The bonus needs valgrind, no matched-but-unconfirmed test anywhere in
    /// the run, and a base score of at least the threshold.
    pub fn memory_eligible(&self) -> bool {
        self.valgrind
            && !self
                .categories
                .iter()
                .flat_map(CategoryResult::outcomes)
                .any(TestOutcome::forfeits_memory_bonus)
            && self.base_points() >= MEMORY_THRESHOLD
    }

    /// Memory bonus actually awarded.
    pub fn memory_bonus(&self) -> u32 {
        if self.memory_eligible() {
            MEMORY_POINTS
        } else {
            0
        }
    }

    /// Final score of the run.
    pub fn total(&self) -> Grade {
        Grade::new(self.base_points() + self.memory_bonus(), MAX_POINTS)
    }

    /// Serializable snapshot of the run.
    pub fn summary(&self) -> Summary {
        Summary {
            valgrind:     self.valgrind,
            style:        self.style,
            categories:   self.categories.clone(),
            memory_bonus: Grade::new(self.memory_bonus(), MEMORY_POINTS),
            total:        self.total(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// JSON shape of a finished run.
pub struct Summary {
    /// Whether tests ran under valgrind.
    pub valgrind:     bool,
    /// Coding style block.
    pub style:        Grade,
    /// Per-category results.
    pub categories:   Vec<CategoryResult>,
    /// Memory bonus awarded out of the bonus pool.
    pub memory_bonus: Grade,
    /// Final score.
    pub total:        Grade,
}
