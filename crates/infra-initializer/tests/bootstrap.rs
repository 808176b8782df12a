// End-to-end bootstrap sessions: steps that own real temp resources and
// embedded payloads, driven through the registry loader.

use anyhow::{bail, Context};
use infra_initializer::{
    InitializeStep, Initializer, InitializerError, InitializerState, RegistryStepsLoader,
};
use infra_resources::{EmbeddedBundle, ResourceLoader};
use infra_sdk::{CollectingTraceWriter, TempDirectory, TempFile, TraceLevel};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

const BUNDLE: &str = "Bootstrap.Tests";

/// Paths observed by the steps, shared with the test body.
#[derive(Default)]
struct Observed {
    workspace: Option<PathBuf>,
    payload: Option<PathBuf>,
    order: Vec<&'static str>,
}

type Shared = Arc<Mutex<Observed>>;

struct WorkspaceStep {
    root: PathBuf,
    dir: Option<TempDirectory>,
    observed: Shared,
}

impl InitializeStep for WorkspaceStep {
    fn priority(&self) -> i32 {
        10
    }

    fn summary(&self) -> &str {
        "create workspace"
    }

    fn setup(&mut self) -> anyhow::Result<()> {
        let dir = TempDirectory::create_in(&self.root)?;
        let mut observed = self.observed.lock();
        observed.workspace = Some(dir.path().to_path_buf());
        observed.order.push("workspace up");
        self.dir = Some(dir);
        Ok(())
    }

    fn teardown(&mut self) -> anyhow::Result<()> {
        if let Some(mut dir) = self.dir.take() {
            dir.release()?;
        }
        self.observed.lock().order.push("workspace down");
        Ok(())
    }
}

struct PayloadStep {
    resources: ResourceLoader,
    observed: Shared,
    file: Option<TempFile>,
}

impl InitializeStep for PayloadStep {
    fn priority(&self) -> i32 {
        20
    }

    fn summary(&self) -> &str {
        "extract payload"
    }

    fn setup(&mut self) -> anyhow::Result<()> {
        let workspace = self
            .observed
            .lock()
            .workspace
            .clone()
            .context("workspace was not created first")?;
        let file = self
            .resources
            .extract_to_temp_file(BUNDLE, "config/payload.json", "json", Some(workspace.as_path()))?;
        let mut observed = self.observed.lock();
        observed.payload = Some(file.path().to_path_buf());
        observed.order.push("payload up");
        self.file = Some(file);
        Ok(())
    }

    fn teardown(&mut self) -> anyhow::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.release()?;
        }
        self.observed.lock().order.push("payload down");
        Ok(())
    }
}

struct RejectStep;

impl InitializeStep for RejectStep {
    fn priority(&self) -> i32 {
        30
    }

    fn summary(&self) -> &str {
        "validate environment"
    }

    fn setup(&mut self) -> anyhow::Result<()> {
        bail!("environment is not supported")
    }

    fn teardown(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

fn resources() -> ResourceLoader {
    ResourceLoader::new().with_bundle(
        EmbeddedBundle::new(BUNDLE).with_resource("config/payload.json", &br#"{"ok":true}"#[..]),
    )
}

fn loader(root: PathBuf, observed: &Shared, reject: bool) -> RegistryStepsLoader {
    // Registered out of priority order on purpose.
    let payload_observed = Arc::clone(observed);
    let workspace_observed = Arc::clone(observed);
    let loader = RegistryStepsLoader::new()
        .register_with("bootstrap::PayloadStep", move || {
            let step: Box<dyn InitializeStep> = Box::new(PayloadStep {
                resources: resources(),
                observed: Arc::clone(&payload_observed),
                file: None,
            });
            Ok(step)
        })
        .register_with("bootstrap::WorkspaceStep", move || {
            let step: Box<dyn InitializeStep> = Box::new(WorkspaceStep {
                root: root.clone(),
                dir: None,
                observed: Arc::clone(&workspace_observed),
            });
            Ok(step)
        });

    if reject {
        loader.register_with("bootstrap::RejectStep", || {
            let step: Box<dyn InitializeStep> = Box::new(RejectStep);
            Ok(step)
        })
    } else {
        loader
    }
}

#[test]
fn full_session_creates_and_removes_resources() {
    let root = tempfile::tempdir().unwrap();
    let observed = Shared::default();
    let mut init = Initializer::from_loader(&loader(root.path().to_path_buf(), &observed, false)).unwrap();

    init.setup().unwrap();
    let (workspace, payload) = {
        let o = observed.lock();
        (o.workspace.clone().unwrap(), o.payload.clone().unwrap())
    };
    assert!(workspace.is_dir());
    assert_eq!(std::fs::read_to_string(&payload).unwrap(), r#"{"ok":true}"#);
    assert_eq!(payload.extension().unwrap(), "json");
    assert!(payload.starts_with(&workspace));

    init.teardown().unwrap();
    assert_eq!(init.state(), InitializerState::TornDown);
    assert!(!payload.exists());
    assert!(!workspace.exists());
    assert_eq!(
        observed.lock().order,
        vec!["workspace up", "payload up", "payload down", "workspace down"]
    );
}

#[test]
fn failing_step_rolls_back_created_resources() {
    let root = tempfile::tempdir().unwrap();
    let observed = Shared::default();
    let trace = Arc::new(CollectingTraceWriter::new());
    let mut init = Initializer::from_loader(&loader(root.path().to_path_buf(), &observed, true))
        .unwrap()
        .with_trace(trace.clone());

    let err = init.setup().unwrap_err();
    assert!(matches!(err, InitializerError::SetupFailure { priority: 30, .. }));
    assert!(err.to_string().contains("environment is not supported"));

    let o = observed.lock();
    assert!(!o.workspace.as_ref().unwrap().exists());
    assert!(!o.payload.as_ref().unwrap().exists());
    assert_eq!(
        o.order,
        vec!["workspace up", "payload up", "payload down", "workspace down"]
    );
    assert!(trace.contains(TraceLevel::Error, "validate environment"));
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[test]
fn dropping_a_ready_session_cleans_up() {
    let root = tempfile::tempdir().unwrap();
    let observed = Shared::default();
    {
        let mut init =
            Initializer::from_loader(&loader(root.path().to_path_buf(), &observed, false)).unwrap();
        init.setup().unwrap();
    }
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[test]
fn construction_failure_runs_nothing() {
    let observed = Shared::default();
    let loader = loader(std::env::temp_dir(), &observed, false)
        .register_with("bootstrap::Broken", || bail!("missing credentials"));

    let err = Initializer::from_loader(&loader).unwrap_err();
    assert!(matches!(
        err,
        InitializerError::ConstructionFailure { ref type_name, .. } if type_name == "bootstrap::Broken"
    ));
    assert!(observed.lock().order.is_empty());
}
