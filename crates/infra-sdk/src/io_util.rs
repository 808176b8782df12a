use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;
use std::thread;
use std::time::Duration;

const DELETE_ATTEMPTS: u32 = 3;
const DELETE_BACKOFF: Duration = Duration::from_millis(100);

/// Filesystem helpers behind temp handles and settings persistence.
pub struct IOUtil;

impl IOUtil {
    /// Remove a directory tree. Gone already counts as success.
    ///
    /// Symlinks are unlinked, never followed. Write-protected entries are made
    /// writable first, and the removal is attempted a few times with a short
    /// backoff before giving up.
    pub fn delete_directory(path: &Path) -> Result<()> {
        let kind = match fs::symlink_metadata(path) {
            Ok(meta) => meta.file_type(),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e).with_context(|| format!("stat '{}'", path.display())),
        };

        if kind.is_symlink() {
            return unlink(path).with_context(|| format!("unlink '{}'", path.display()));
        }

        let mut attempt = 1;
        loop {
            if let Err(e) = make_tree_writable(path) {
                tracing::debug!("Could not make '{}' writable: {}", path.display(), e);
            }
            match fs::remove_dir_all(path) {
                Ok(()) => return Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
                Err(e) if attempt >= DELETE_ATTEMPTS => {
                    return Err(e).with_context(|| {
                        format!("remove directory '{}' ({} attempts)", path.display(), attempt)
                    });
                }
                Err(e) => {
                    tracing::debug!(
                        "Removing '{}' failed on attempt {}: {}",
                        path.display(),
                        attempt,
                        e
                    );
                    thread::sleep(DELETE_BACKOFF * attempt);
                    attempt += 1;
                }
            }
        }
    }

    /// Remove one file, making it writable first. Gone already counts as success.
    pub fn delete_file(path: &Path) -> Result<()> {
        if let Err(e) = make_writable(path) {
            tracing::debug!("Could not make '{}' writable: {}", path.display(), e);
        }
        match fs::remove_file(path) {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                Err(e).with_context(|| format!("remove file '{}'", path.display()))
            }
            _ => Ok(()),
        }
    }

    /// Write `value` as indented JSON, creating missing parent directories.
    pub fn save_object<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory '{}'", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(value).context("serialize JSON")?;
        fs::write(path, json).with_context(|| format!("write '{}'", path.display()))
    }

    pub fn load_object<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let raw = fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
        serde_json::from_slice(&raw).with_context(|| format!("parse JSON in '{}'", path.display()))
    }
}

fn unlink(path: &Path) -> io::Result<()> {
    // Directory symlinks on Windows are removed as directories.
    #[cfg(windows)]
    if path.is_dir() {
        return fs::remove_dir(path);
    }
    fs::remove_file(path)
}

fn make_tree_writable(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        for entry in fs::read_dir(path)? {
            make_tree_writable(&entry?.path())?;
        }
    }
    if meta.file_type().is_symlink() {
        return Ok(());
    }
    make_writable(path)
}

fn make_writable(path: &Path) -> io::Result<()> {
    let mut perms = match fs::metadata(path) {
        Ok(meta) => meta.permissions(),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = perms.mode();
        if mode & 0o200 != 0 {
            return Ok(());
        }
        perms.set_mode(mode | 0o200);
    }
    #[cfg(not(unix))]
    {
        if !perms.readonly() {
            return Ok(());
        }
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
    }

    fs::set_permissions(path, perms)
}
