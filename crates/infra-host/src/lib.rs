// Host process: wires settings, embedded resources and the built-in steps
// into one bootstrap session.

pub mod context;
pub mod steps;

use context::BootstrapContext;
use steps::{DefaultSettingsStep, EnvironmentStep, WorkspaceStep};

use infra_initializer::{InitializeStep, Initializer, InitializerError, RegistryStepsLoader};
use infra_resources::{embedded_bundle, EmbeddedBundle, ResourceLoader};
use infra_sdk::TypedSwitch;
use std::sync::Arc;

/// Bundle id of the resources compiled into the host binary.
pub const HOST_BUNDLE: &str = "Infra.Host";

pub const DEFAULT_SETTINGS_RESOURCE: &str = "resources/default-settings.json";

pub mod return_code {
    pub const SUCCESS: i32 = 0;
    pub const SETUP_FAILED: i32 = 1;
    pub const TEARDOWN_FAILED: i32 = 2;
    pub const CONFIGURATION_ERROR: i32 = 3;
}

/// Maps a bootstrap failure to the process exit code, by its primary cause.
pub struct FailureExitCode;

impl TypedSwitch<InitializerError> for FailureExitCode {
    type Output = i32;

    fn case(&self, error: &InitializerError) -> Option<i32> {
        match error {
            InitializerError::InvalidArgument(_) | InitializerError::ConstructionFailure { .. } => {
                Some(return_code::CONFIGURATION_ERROR)
            }
            InitializerError::SetupFailure { .. } => Some(return_code::SETUP_FAILED),
            InitializerError::TeardownFailure { .. } => Some(return_code::TEARDOWN_FAILED),
            InitializerError::Aggregate(aggregate) => self.case(aggregate.primary()),
        }
    }
}

pub fn host_bundle() -> EmbeddedBundle {
    embedded_bundle!(HOST_BUNDLE;
        DEFAULT_SETTINGS_RESOURCE => include_bytes!("../resources/default-settings.json"),
    )
}

/// The built-in steps, registered against `context`.
pub fn steps_loader(context: &Arc<BootstrapContext>) -> RegistryStepsLoader {
    let environment = Arc::clone(context);
    let workspace = Arc::clone(context);
    let defaults = Arc::clone(context);

    RegistryStepsLoader::new()
        .register_with(std::any::type_name::<EnvironmentStep>(), move || {
            let step: Box<dyn InitializeStep> =
                Box::new(EnvironmentStep::new(Arc::clone(&environment)));
            Ok(step)
        })
        .register_with(std::any::type_name::<WorkspaceStep>(), move || {
            let step: Box<dyn InitializeStep> =
                Box::new(WorkspaceStep::new(Arc::clone(&workspace)));
            Ok(step)
        })
        .register_with(std::any::type_name::<DefaultSettingsStep>(), move || {
            let resources = ResourceLoader::new().with_bundle(host_bundle());
            let step: Box<dyn InitializeStep> =
                Box::new(DefaultSettingsStep::new(Arc::clone(&defaults), resources));
            Ok(step)
        })
}

/// Set up every step, then tear them down again. Returns a process exit code.
pub fn run_session(context: Arc<BootstrapContext>) -> i32 {
    let mut initializer = match Initializer::from_loader(&steps_loader(&context)) {
        Ok(initializer) => initializer,
        Err(e) => {
            tracing::error!("Failed to load steps: {}", e);
            return FailureExitCode.switch(&e);
        }
    };

    for (priority, summary) in initializer.sequence().summaries() {
        tracing::info!("  [{:>4}] {}", priority, summary);
    }

    if let Err(e) = initializer.setup() {
        tracing::error!("Bootstrap failed: {}", e);
        return FailureExitCode.switch(&e);
    }

    tracing::info!("Bootstrap completed.");

    match initializer.teardown() {
        Ok(()) => return_code::SUCCESS,
        Err(e) => {
            tracing::error!("Teardown failed: {}", e);
            FailureExitCode.switch(&e)
        }
    }
}
