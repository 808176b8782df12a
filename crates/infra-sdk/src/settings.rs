// Process-level settings for the infrastructure utilities.
// Loaded from an optional JSON file, then overridden by environment variables.

use crate::io_util::IOUtil;
use crate::string_util::StringUtil;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable names recognised by [`InfraSettings::apply_env`].
pub mod variables {
    pub const TEMP_ROOT: &str = "INFRA_TEMP_ROOT";
    pub const LOG: &str = "INFRA_LOG";
    pub const PRINT_LOG_TO_STDOUT: &str = "INFRA_PRINT_LOG_TO_STDOUT";
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfraSettings {
    /// Base directory for temp files and directories. `None` means the
    /// system temp location.
    #[serde(default, rename = "TempRoot", skip_serializing_if = "Option::is_none")]
    pub temp_root: Option<PathBuf>,

    /// Default `tracing` filter directive, e.g. `info` or `infra_initializer=debug`.
    #[serde(default = "default_log_filter", rename = "LogFilter")]
    pub log_filter: String,

    /// Also echo trace output to stdout.
    #[serde(default, rename = "PrintLogToStdout")]
    pub print_log_to_stdout: bool,
}

impl Default for InfraSettings {
    fn default() -> Self {
        Self {
            temp_root: None,
            log_filter: default_log_filter(),
            print_log_to_stdout: false,
        }
    }
}

impl InfraSettings {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        IOUtil::load_object(path)
    }

    /// Persist settings as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        IOUtil::save_object(path, self)
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Overlay values from an arbitrary variable lookup.
    ///
    /// Empty values are ignored; an unparsable boolean keeps the current value.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !StringUtil::is_blank(v));

        if let Some(root) = lookup(variables::TEMP_ROOT) {
            self.temp_root = Some(PathBuf::from(root.trim()));
        }
        if let Some(filter) = lookup(variables::LOG) {
            self.log_filter = filter.trim().to_string();
        }
        if let Some(flag) = lookup(variables::PRINT_LOG_TO_STDOUT) {
            match StringUtil::convert_to_bool(&flag) {
                Some(v) => self.print_log_to_stdout = v,
                None => tracing::warn!(
                    "Ignoring {}='{}': not a boolean",
                    variables::PRINT_LOG_TO_STDOUT,
                    flag
                ),
            }
        }
    }

    /// The directory temp artifacts should be created under.
    pub fn temp_root(&self) -> PathBuf {
        self.temp_root.clone().unwrap_or_else(std::env::temp_dir)
    }
}
