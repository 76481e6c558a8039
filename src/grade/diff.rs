#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use colored::Colorize;
use similar::{ChangeTag, TextDiff};

/// Renders a line diff between the reference and the captured output, with
/// missing lines in red and unexpected lines in green.
pub fn render_diff(expected: &[u8], actual: &[u8]) -> String {
    let expected = String::from_utf8_lossy(expected);
    let actual = String::from_utf8_lossy(actual);
    let diff = TextDiff::from_lines(&*expected, &*actual);

    let mut rendered = String::new();
    for change in diff.iter_all_changes() {
        let line = change.value().trim_end_matches('\n');
        match change.tag() {
            ChangeTag::Equal => {
                rendered.push_str(&format!("  {line}\n"));
            }
            ChangeTag::Delete => {
                rendered.push_str(&format!("{}\n", format!("- {line}").red()));
            }
            ChangeTag::Insert => {
                rendered.push_str(&format!("{}\n", format!("+ {line}").green()));
            }
        }
        if change.missing_newline() {
            rendered.push_str(&format!("{}\n", "\\ No newline at end of file".dimmed()));
        }
    }
    rendered
}
