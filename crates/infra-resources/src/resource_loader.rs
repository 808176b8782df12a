use crate::bundle::EmbeddedBundle;
use crate::error::{ResourceError, Result};

use bytes::Bytes;
use infra_sdk::{StringUtil, TempFile};
use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Resolves `(bundle id, relative path)` pairs against registered bundles.
#[derive(Debug, Clone, Default)]
pub struct ResourceLoader {
    bundles: HashMap<String, EmbeddedBundle>,
}

impl ResourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_bundle(mut self, bundle: EmbeddedBundle) -> Self {
        self.register(bundle);
        self
    }

    /// Make `bundle` resolvable by its id. Replaces a bundle with the same id.
    pub fn register(&mut self, bundle: EmbeddedBundle) {
        tracing::debug!(
            "Registering bundle '{}' with {} resource(s)",
            bundle.id(),
            bundle.len()
        );
        self.bundles.insert(bundle.id().to_string(), bundle);
    }

    /// Look up a registered bundle.
    pub fn bundle(&self, bundle_id: &str) -> Result<&EmbeddedBundle> {
        if StringUtil::is_blank(bundle_id) {
            return Err(ResourceError::InvalidArgument("bundle id is empty".to_string()));
        }
        self.bundles.get(bundle_id).ok_or_else(|| {
            ResourceError::InvalidArgument(format!("bundle '{bundle_id}' is not registered"))
        })
    }

    pub fn read_bytes(&self, bundle_id: &str, relative_path: &str) -> Result<Bytes> {
        self.bundle(bundle_id)?.read_bytes(relative_path)
    }

    pub fn open(&self, bundle_id: &str, relative_path: &str) -> Result<Cursor<Bytes>> {
        self.bundle(bundle_id)?.open(relative_path)
    }

    pub fn read_text(&self, bundle_id: &str, relative_path: &str) -> Result<String> {
        self.bundle(bundle_id)?.read_text(relative_path)
    }

    /// Write the resource to `destination`, replacing any existing file.
    pub fn extract_to_file(
        &self,
        bundle_id: &str,
        relative_path: &str,
        destination: &Path,
    ) -> Result<()> {
        let bytes = self.read_bytes(bundle_id, relative_path)?;
        fs::write(destination, &bytes)?;
        tracing::debug!(
            "Extracted '{}' from bundle '{}' to '{}'",
            relative_path,
            bundle_id,
            destination.display()
        );
        Ok(())
    }

    /// Materialize the resource as a [`TempFile`] that is removed when the
    /// handle is released.
    pub fn extract_to_temp_file(
        &self,
        bundle_id: &str,
        relative_path: &str,
        extension: &str,
        parent_dir: Option<&Path>,
    ) -> Result<TempFile> {
        let bytes = self.read_bytes(bundle_id, relative_path)?;
        Ok(TempFile::create(extension, &bytes, parent_dir)?)
    }
}
