// Built-in bootstrap steps of the host process.

use crate::context::BootstrapContext;
use crate::{HOST_BUNDLE, DEFAULT_SETTINGS_RESOURCE};

use anyhow::{Context, Result};
use infra_initializer::InitializeStep;
use infra_resources::ResourceLoader;
use infra_sdk::{InfraSettings, PathHelper, TempDirectory, TempFile};
use std::sync::Arc;

pub mod priority {
    pub const ENVIRONMENT: i32 = 0;
    pub const WORKSPACE: i32 = 10;
    pub const DEFAULT_SETTINGS: i32 = 20;
}

/// Logs where the process runs from. Nothing to undo.
pub struct EnvironmentStep {
    context: Arc<BootstrapContext>,
}

impl EnvironmentStep {
    pub fn new(context: Arc<BootstrapContext>) -> Self {
        Self { context }
    }
}

impl InitializeStep for EnvironmentStep {
    fn priority(&self) -> i32 {
        priority::ENVIRONMENT
    }

    fn summary(&self) -> &str {
        "inspect environment"
    }

    fn setup(&mut self) -> Result<()> {
        let bin_dir = PathHelper::executable_directory()?;
        tracing::info!("  Binary directory = {}", bin_dir.display());
        tracing::info!(
            "  Temp root        = {}",
            self.context.settings().temp_root().display()
        );
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Owns a scratch directory under the configured temp root for the lifetime
/// of the session.
pub struct WorkspaceStep {
    context: Arc<BootstrapContext>,
    directory: Option<TempDirectory>,
}

impl WorkspaceStep {
    pub fn new(context: Arc<BootstrapContext>) -> Self {
        Self {
            context,
            directory: None,
        }
    }
}

impl InitializeStep for WorkspaceStep {
    fn priority(&self) -> i32 {
        priority::WORKSPACE
    }

    fn summary(&self) -> &str {
        "create workspace"
    }

    fn setup(&mut self) -> Result<()> {
        let root = self.context.settings().temp_root();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("creating temp root {}", root.display()))?;

        let directory = TempDirectory::create_in(&root)?;
        tracing::info!("Workspace: {}", directory.path().display());
        self.context.set_workspace(Some(directory.path().to_path_buf()));
        self.directory = Some(directory);
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        self.context.set_workspace(None);
        if let Some(mut directory) = self.directory.take() {
            directory.release()?;
        }
        Ok(())
    }
}

/// Extracts the embedded default settings into the workspace and checks that
/// they parse.
pub struct DefaultSettingsStep {
    context: Arc<BootstrapContext>,
    resources: ResourceLoader,
    file: Option<TempFile>,
}

impl DefaultSettingsStep {
    pub fn new(context: Arc<BootstrapContext>, resources: ResourceLoader) -> Self {
        Self {
            context,
            resources,
            file: None,
        }
    }
}

impl InitializeStep for DefaultSettingsStep {
    fn priority(&self) -> i32 {
        priority::DEFAULT_SETTINGS
    }

    fn summary(&self) -> &str {
        "extract default settings"
    }

    fn setup(&mut self) -> Result<()> {
        let workspace = self
            .context
            .workspace()
            .context("workspace is not available")?;

        let file = self.resources.extract_to_temp_file(
            HOST_BUNDLE,
            DEFAULT_SETTINGS_RESOURCE,
            "json",
            Some(workspace.as_path()),
        )?;
        let defaults = InfraSettings::load(file.path())
            .with_context(|| format!("parsing {}", file.path().display()))?;
        tracing::debug!("Default settings: {:?}", defaults);

        self.context.set_default_settings(Some(file.path().to_path_buf()));
        self.file = Some(file);
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        self.context.set_default_settings(None);
        if let Some(mut file) = self.file.take() {
            file.release()?;
        }
        Ok(())
    }
}
