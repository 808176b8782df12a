// infra-resources: resources compiled into the binary.
// A bundle is a named set of byte blobs addressed by `{bundle}.{path}` where
// path separators are replaced by dots.

pub mod bundle;
pub mod error;
pub mod resource_loader;

pub use bundle::{normalize_resource_path, EmbeddedBundle};
pub use bytes::Bytes;
pub use error::ResourceError;
pub use resource_loader::ResourceLoader;

/// Build an [`EmbeddedBundle`] from `path => bytes` pairs.
///
/// ```ignore
/// let bundle = infra_resources::embedded_bundle!("MyApp";
///     "Samples/testfile.txt" => include_bytes!("../samples/testfile.txt"),
/// );
/// ```
#[macro_export]
macro_rules! embedded_bundle {
    ($id:expr; $($path:expr => $data:expr),* $(,)?) => {{
        let bundle = $crate::EmbeddedBundle::new($id);
        $( let bundle = bundle.with_resource($path, $crate::Bytes::from_static(&$data[..])); )*
        bundle
    }};
}
