use anyhow::{Context, Result};
use std::path::PathBuf;

/// Location helpers for the running binary.
pub struct PathHelper;

impl PathHelper {
    /// Full path of the currently running executable.
    pub fn executable_path() -> Result<PathBuf> {
        std::env::current_exe().context("Failed to resolve current executable path")
    }

    /// Directory that contains the currently running executable.
    pub fn executable_directory() -> Result<PathBuf> {
        let exe = Self::executable_path()?;
        exe.parent()
            .map(|p| p.to_path_buf())
            .with_context(|| format!("Executable '{}' has no parent directory", exe.display()))
    }
}
