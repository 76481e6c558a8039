#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{ffi::OsString, io::ErrorKind, path::Path};

use anyhow::{Context, Result};

use crate::constants::{LEAK_FREE_MARKER, MEM_LOG_FLAG, VALGRIND_FLAGS};

/// Returns true iff some line of the valgrind log at `path` confirms that no
/// heap blocks leaked.
///
/// A missing log counts as unconfirmed; valgrind does not write one when it
/// cannot start the target. Any other read error is returned.
pub async fn confirms_no_leaks(path: &Path) -> Result<bool> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("Memory log {} was not produced", path.display());
            return Ok(false);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Could not read memory log {}", path.display()));
        }
    };

    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .any(|line| line.contains(LEAK_FREE_MARKER)))
}

/// Removes a log left behind by an earlier run so only this run's report
/// can confirm the case.
pub async fn clear_log(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Could not remove memory log {}", path.display())),
    }
}

/// Arguments that make valgrind run `program` with `program_args` and write
/// its report to `log`.
pub fn wrap_args(log: &Path, program: &Path, program_args: &[OsString]) -> Vec<OsString> {
    let mut log_flag = OsString::from(MEM_LOG_FLAG);
    log_flag.push(log.as_os_str());

    let mut args = vec![log_flag];
    args.extend(VALGRIND_FLAGS.iter().map(OsString::from));
    args.push(program.as_os_str().to_owned());
    args.extend(program_args.iter().cloned());
    args
}
