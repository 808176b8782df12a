use super::{NAME_PREFIX, NAME_RANDOM_LEN};
use crate::io_util::IOUtil;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// A uniquely named directory that is recursively deleted when released or dropped.
#[derive(Debug)]
pub struct TempDirectory {
    path: PathBuf,
}

impl TempDirectory {
    /// Create an empty directory under the system temp location.
    pub fn create() -> Result<Self> {
        Self::create_in(&std::env::temp_dir())
    }

    /// Create an empty directory under `parent`.
    pub fn create_in(parent: &Path) -> Result<Self> {
        let path = tempfile::Builder::new()
            .prefix(NAME_PREFIX)
            .rand_bytes(NAME_RANDOM_LEN)
            .tempdir_in(parent)
            .with_context(|| format!("Failed to create temp directory in '{}'", parent.display()))?
            .keep();
        tracing::debug!("Created temp directory '{}'", path.display());
        Ok(Self { path })
    }

    /// Full path of the directory. Empty once the handle has been released.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_released(&self) -> bool {
        self.path.as_os_str().is_empty()
    }

    /// Recursively delete the directory and clear the recorded path.
    ///
    /// Calling this again, or after the directory was removed externally, is a no-op.
    pub fn release(&mut self) -> Result<()> {
        if self.is_released() {
            return Ok(());
        }
        IOUtil::delete_directory(&self.path)?;
        tracing::debug!("Released temp directory '{}'", self.path.display());
        self.path = PathBuf::new();
        Ok(())
    }
}

impl AsRef<Path> for TempDirectory {
    fn as_ref(&self) -> &Path {
        self.path()
    }
}

impl Drop for TempDirectory {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!("Failed to release temp directory: {:#}", e);
        }
    }
}
