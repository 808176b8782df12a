use infra_sdk::InfraSettings;

use parking_lot::Mutex;
use std::path::PathBuf;

/// State shared by the steps of one bootstrap session.
///
/// Earlier steps publish what later steps depend on (the workspace path, for
/// instance) and clear it again on teardown.
#[derive(Debug)]
pub struct BootstrapContext {
    settings: InfraSettings,
    workspace: Mutex<Option<PathBuf>>,
    default_settings: Mutex<Option<PathBuf>>,
}

impl BootstrapContext {
    pub fn new(settings: InfraSettings) -> Self {
        Self {
            settings,
            workspace: Mutex::new(None),
            default_settings: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &InfraSettings {
        &self.settings
    }

    pub fn workspace(&self) -> Option<PathBuf> {
        self.workspace.lock().clone()
    }

    pub fn set_workspace(&self, path: Option<PathBuf>) {
        *self.workspace.lock() = path;
    }

    /// Extracted copy of the built-in default settings, while it exists.
    pub fn default_settings(&self) -> Option<PathBuf> {
        self.default_settings.lock().clone()
    }

    pub fn set_default_settings(&self, path: Option<PathBuf>) {
        *self.default_settings.lock() = path;
    }
}
