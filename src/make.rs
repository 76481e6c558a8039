#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{ffi::OsString, path::PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use which::which;

use crate::{config::CheckerPaths, process::run_inherit};

/// Setup failures that end a run immediately with a specific exit code.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The build command exited unsuccessfully.
    #[error("make failed with status {0}")]
    BuildFailed(i32),
    /// The build succeeded but left no executable behind.
    #[error("The file {} is missing and could not be created with 'make'", .0.display())]
    MissingExecutable(PathBuf),
    /// The clean command exited unsuccessfully.
    #[error("make clean failed with status {0}")]
    CleanFailed(i32),
}

impl SetupError {
    /// Exit code the checker terminates with.
    pub fn exit_code(&self) -> i32 {
        match self {
            SetupError::BuildFailed(code) | SetupError::CleanFailed(code) => *code,
            SetupError::MissingExecutable(_) => -1,
        }
    }
}

/// Finds the build tool.
fn make_path(paths: &CheckerPaths) -> Result<PathBuf> {
    which(paths.make())
        .with_context(|| format!("Cannot find a build tool on path ({})", paths.make().display()))
}

/// Runs `make [target] -C <src dir>` attached to the terminal and returns
/// its exit code. A process killed by a signal reports 1.
async fn make(paths: &CheckerPaths, target: Option<&str>) -> Result<i32> {
    let mut args: Vec<OsString> = target.into_iter().map(OsString::from).collect();
    args.push(OsString::from("-C"));
    args.push(paths.src_dir().as_os_str().to_owned());

    let status = run_inherit(make_path(paths)?, &args).await?;
    Ok(status.code().unwrap_or(1))
}

/// Builds the submission and checks that the executable exists.
pub async fn build(paths: &CheckerPaths) -> Result<()> {
    let code = make(paths, None).await?;
    if code != 0 {
        return Err(SetupError::BuildFailed(code).into());
    }

    let exec = paths.exec_path();
    if !tokio::fs::try_exists(&exec).await.unwrap_or(false) {
        return Err(SetupError::MissingExecutable(exec).into());
    }
    Ok(())
}

/// Removes the executable and object files.
pub async fn clean(paths: &CheckerPaths) -> Result<()> {
    let code = make(paths, Some("clean")).await?;
    if code != 0 {
        return Err(SetupError::CleanFailed(code).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_propagated() {
        assert_eq!(SetupError::BuildFailed(2).exit_code(), 2);
        assert_eq!(SetupError::CleanFailed(3).exit_code(), 3);
        assert_eq!(SetupError::MissingExecutable(PathBuf::from("../src/main")).exit_code(), -1);
    }

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(SetupError::BuildFailed(2).to_string(), "make failed with status 2");
        assert_eq!(
            SetupError::MissingExecutable(PathBuf::from("../src/main")).to_string(),
            "The file ../src/main is missing and could not be created with 'make'"
        );
    }
}
