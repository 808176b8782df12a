use crate::error::{ResourceError, Result};

use bytes::Bytes;
use infra_sdk::StringUtil;
use std::collections::BTreeMap;
use std::io::Cursor;

/// Separator used inside manifest names.
const MANIFEST_SEPARATOR: char = '.';

/// Turn a relative path into its manifest form: `/`, `\` and the platform
/// separator all become `.`. Leading separators are dropped.
pub fn normalize_resource_path(relative_path: &str) -> String {
    let is_separator =
        |c: char| c == '/' || c == '\\' || c == std::path::MAIN_SEPARATOR;

    relative_path
        .trim()
        .trim_start_matches(is_separator)
        .chars()
        .map(|c| if is_separator(c) { MANIFEST_SEPARATOR } else { c })
        .collect()
}

/// A named set of resources compiled into the binary.
///
/// Resources are stored under their manifest name, `{id}.{normalized path}`,
/// so `Samples/testfile.txt` and `Samples.testfile.txt` address the same blob.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedBundle {
    id: String,
    resources: BTreeMap<String, Bytes>,
}

impl EmbeddedBundle {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resources: BTreeMap::new(),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_resource(mut self, relative_path: &str, data: impl Into<Bytes>) -> Self {
        self.insert(relative_path, data);
        self
    }

    /// Add (or replace) a resource.
    pub fn insert(&mut self, relative_path: &str, data: impl Into<Bytes>) {
        let name = self.manifest_name(relative_path);
        if self.resources.insert(name.clone(), data.into()).is_some() {
            tracing::debug!("Replaced embedded resource '{}'", name);
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The lookup key for `relative_path` inside this bundle.
    pub fn manifest_name(&self, relative_path: &str) -> String {
        format!(
            "{}{}{}",
            self.id,
            MANIFEST_SEPARATOR,
            normalize_resource_path(relative_path)
        )
    }

    /// All manifest names, sorted.
    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Bytes of the resource at `relative_path`.
    pub fn read_bytes(&self, relative_path: &str) -> Result<Bytes> {
        if StringUtil::is_blank(relative_path) {
            return Err(ResourceError::InvalidArgument(
                "path to embedded file is empty".to_string(),
            ));
        }

        let name = self.manifest_name(relative_path);
        self.resources
            .get(&name)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound {
                bundle: self.id.clone(),
                path: relative_path.to_string(),
            })
    }

    /// A seekable reader over the resource at `relative_path`.
    pub fn open(&self, relative_path: &str) -> Result<Cursor<Bytes>> {
        self.read_bytes(relative_path).map(Cursor::new)
    }

    /// The resource decoded as UTF-8. A leading byte-order mark is dropped.
    pub fn read_text(&self, relative_path: &str) -> Result<String> {
        let bytes = self.read_bytes(relative_path)?;
        let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&bytes[..]);
        String::from_utf8(body.to_vec()).map_err(|source| ResourceError::Utf8 {
            name: self.manifest_name(relative_path),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn sample() -> EmbeddedBundle {
        EmbeddedBundle::new("Infra.Tests")
            .with_resource("Samples/testfile.txt", &b"12345"[..])
            .with_resource("Json\\config.json", &b"{}"[..])
    }

    #[test]
    fn normalize_separators() {
        assert_eq!(normalize_resource_path("Samples/testfile.txt"), "Samples.testfile.txt");
        assert_eq!(normalize_resource_path("Samples\\testfile.txt"), "Samples.testfile.txt");
        assert_eq!(normalize_resource_path("Samples.testfile.txt"), "Samples.testfile.txt");
        assert_eq!(normalize_resource_path("/a/b/c.bin"), "a.b.c.bin");
    }

    #[test]
    fn manifest_names_are_bundle_qualified() {
        let bundle = sample();
        let names: Vec<_> = bundle.resource_names().collect();
        assert_eq!(
            names,
            vec!["Infra.Tests.Json.config.json", "Infra.Tests.Samples.testfile.txt"]
        );
        assert_eq!(bundle.len(), 2);
    }

    #[test]
    fn all_separator_styles_resolve_to_same_bytes() {
        let bundle = sample();
        let slash = bundle.read_bytes("Samples/testfile.txt").unwrap();
        let dot = bundle.read_bytes("Samples.testfile.txt").unwrap();
        let backslash = bundle.read_bytes("Samples\\testfile.txt").unwrap();
        assert_eq!(slash, dot);
        assert_eq!(dot, backslash);
        assert_eq!(&slash[..], b"12345");
    }

    #[test]
    fn blank_path_is_invalid() {
        let bundle = sample();
        assert!(bundle.read_bytes("").unwrap_err().is_invalid_argument());
        assert!(bundle.read_bytes("   ").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn unknown_path_is_not_found() {
        let err = sample().read_bytes("Samples/missing.txt").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Samples/missing.txt"));
    }

    #[test]
    fn open_returns_readable_stream() {
        let mut stream = sample().open("Samples/testfile.txt").unwrap();
        let mut text = String::new();
        stream.read_to_string(&mut text).unwrap();
        assert_eq!(text, "12345");
    }

    #[test]
    fn read_text_strips_bom_and_rejects_invalid_utf8() {
        let bundle = EmbeddedBundle::new("B")
            .with_resource("bom.txt", &b"\xEF\xBB\xBFhello"[..])
            .with_resource("bad.bin", &b"\xFF\xFE\xFD"[..]);
        assert_eq!(bundle.read_text("bom.txt").unwrap(), "hello");
        assert!(matches!(
            bundle.read_text("bad.bin").unwrap_err(),
            ResourceError::Utf8 { .. }
        ));
    }

    #[test]
    fn insert_replaces_existing() {
        let mut bundle = sample();
        bundle.insert("Samples.testfile.txt", Bytes::from_static(b"67890"));
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.read_text("Samples/testfile.txt").unwrap(), "67890");
    }
}
