#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Line valgrind prints when every allocation was released.
pub const LEAK_FREE_MARKER: &str = "All heap blocks were freed -- no leaks are possible";

/// Prefix of the valgrind flag naming the log file.
pub const MEM_LOG_FLAG: &str = "--log-file=";

/// Flags passed to valgrind after the log file.
pub const VALGRIND_FLAGS: [&str; 3] = [
    "--leak-check=full",
    "--show-leak-kinds=all",
    "--track-origins=yes",
];

/// Marker the coding style checker prints for every violation.
pub const STYLE_ERROR_MARKER: &str = "ERROR";

/// Points awarded for a clean coding style report.
pub const STYLE_POINTS: u32 = 10;

/// Bonus pool awarded when every leak-checked test is confirmed leak free.
pub const MEMORY_POINTS: u32 = 20;

/// Minimum non-memory score needed to keep the memory bonus.
pub const MEMORY_THRESHOLD: u32 = 50;

/// Maximum total score of a run.
pub const MAX_POINTS: u32 = 100;

/// A README must be strictly longer than this many lines to count.
pub const README_MIN_LINES: usize = 25;

/// Width of the banner lines separating the steps of a run.
pub const BANNER_WIDTH: usize = 60;
