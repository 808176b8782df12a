// infra-sdk: Foundation layer for the infrastructure utilities.
// This crate has ZERO dependencies on other infra crates and provides
// temp-file handles, diagnostics, path helpers and settings used throughout.

pub mod io_util;
pub mod path_util;
pub mod settings;
pub mod string_util;
pub mod temp;
pub mod trace;
pub mod typed_switch;

// Re-export commonly used items at crate root
pub use io_util::IOUtil;
pub use path_util::PathHelper;
pub use settings::InfraSettings;
pub use string_util::StringUtil;
pub use temp::{TempDirectory, TempFile};
pub use trace::{CollectingTraceWriter, NullTraceWriter, TraceLevel, TraceWriter, TracingTraceWriter};
pub use typed_switch::TypedSwitch;
