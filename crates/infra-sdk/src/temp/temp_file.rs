use super::{NAME_PREFIX, NAME_RANDOM_LEN};
use crate::io_util::IOUtil;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// A uniquely named file that is deleted when released or dropped.
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    /// Create a temp file with `extension` holding `content`.
    ///
    /// The file is placed in `parent_dir` when given, otherwise in the system
    /// temp location. `extension` may be given with or without the leading dot.
    pub fn create(extension: &str, content: &[u8], parent_dir: Option<&Path>) -> Result<Self> {
        Self::create_with(extension, parent_dir, |file| file.write_all(content))
    }

    /// Create a temp file whose content is copied from `reader` and flushed
    /// to disk before returning.
    pub fn create_from_reader<R: Read>(
        extension: &str,
        reader: &mut R,
        parent_dir: Option<&Path>,
    ) -> Result<Self> {
        Self::create_with(extension, parent_dir, |file| {
            io::copy(reader, file)?;
            file.sync_all()
        })
    }

    /// Create an empty temp file.
    pub fn create_empty(extension: &str, parent_dir: Option<&Path>) -> Result<Self> {
        Self::create_with(extension, parent_dir, |_| Ok(()))
    }

    /// Full path of the file. Empty once the handle has been released.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_released(&self) -> bool {
        self.path.as_os_str().is_empty()
    }

    /// Delete the file and clear the recorded path.
    ///
    /// Calling this again, or after the file was removed externally, is a no-op.
    pub fn release(&mut self) -> Result<()> {
        if self.is_released() {
            return Ok(());
        }
        IOUtil::delete_file(&self.path)?;
        tracing::debug!("Released temp file '{}'", self.path.display());
        self.path = PathBuf::new();
        Ok(())
    }

    fn create_with<F>(extension: &str, parent_dir: Option<&Path>, fill: F) -> Result<Self>
    where
        F: FnOnce(&mut File) -> io::Result<()>,
    {
        let dir = parent_dir.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir);
        let suffix = normalize_extension(extension);

        let (mut file, path) = tempfile::Builder::new()
            .prefix(NAME_PREFIX)
            .suffix(&suffix)
            .rand_bytes(NAME_RANDOM_LEN)
            .tempfile_in(&dir)
            .and_then(|named| named.keep().map_err(|e| e.error))
            .with_context(|| format!("Failed to allocate temp file in '{}'", dir.display()))?;

        let mut handle = Self { path };
        if let Err(e) = fill(&mut file) {
            drop(file);
            let path = handle.path.clone();
            if let Err(cleanup) = handle.release() {
                tracing::warn!(
                    "Failed to remove partial temp file '{}': {:#}",
                    path.display(),
                    cleanup
                );
            }
            return Err(e).with_context(|| format!("Failed to write temp file '{}'", path.display()));
        }

        Ok(handle)
    }
}

impl AsRef<Path> for TempFile {
    fn as_ref(&self) -> &Path {
        self.path()
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!("Failed to release temp file: {:#}", e);
        }
    }
}

/// Ensure the extension carries a leading dot. An empty extension stays empty.
fn normalize_extension(extension: &str) -> String {
    if extension.is_empty() || extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    }
}
