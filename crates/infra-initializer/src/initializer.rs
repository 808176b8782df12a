// Initializer: runs a StepSequence's setup phase in priority order and the
// teardown phase in exact reverse of the setups that succeeded.

use crate::error::{AggregateFailure, InitializerError};
use crate::step_sequence::StepSequence;
use crate::steps_loader::{panic_message, StepsLoader};

use anyhow::anyhow;
use infra_sdk::{TraceWriter, TracingTraceWriter};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Lifecycle of one bootstrap session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializerState {
    /// Setup has not run yet.
    Pending,
    /// Every step's setup succeeded.
    Ready,
    /// Teardown ran, either on request or as rollback of a failed setup.
    TornDown,
}

impl fmt::Display for InitializerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitializerState::Pending => write!(f, "Pending"),
            InitializerState::Ready => write!(f, "Ready"),
            InitializerState::TornDown => write!(f, "TornDown"),
        }
    }
}

/// Executes steps once, in order, and guarantees their undo.
///
/// - `setup` stops at the first failing step, tears down the steps that
///   already succeeded (last first) and then reports the failure. Teardown
///   errors hit during that rollback are attached as secondary failures.
/// - `teardown` undoes every step in reverse setup order. A failing teardown
///   never stops the remaining ones; all failures are reported together.
/// - Nothing is retried.
/// - A step that panics in `setup` or `teardown` is treated as a failed step.
///
/// Dropping an initializer with set-up steps still pending teardown performs
/// a best-effort teardown and logs any failures.
pub struct Initializer {
    sequence: StepSequence,
    /// Number of leading steps whose setup succeeded and are not torn down yet.
    completed: usize,
    state: InitializerState,
    trace: Arc<dyn TraceWriter>,
}

impl Initializer {
    pub fn new(sequence: StepSequence) -> Self {
        Self {
            sequence,
            completed: 0,
            state: InitializerState::Pending,
            trace: Arc::new(TracingTraceWriter::new("initializer")),
        }
    }

    /// Load the steps from `loader`. Construction failures are returned as is.
    pub fn from_loader(loader: &dyn StepsLoader) -> Result<Self, InitializerError> {
        Ok(Self::new(loader.load()?))
    }

    /// Route diagnostics to `trace` instead of the `tracing` crate.
    pub fn with_trace(mut self, trace: Arc<dyn TraceWriter>) -> Self {
        self.trace = trace;
        self
    }

    pub fn state(&self) -> InitializerState {
        self.state
    }

    /// Steps whose setup succeeded and that still await teardown.
    pub fn completed_steps(&self) -> usize {
        self.completed
    }

    pub fn sequence(&self) -> &StepSequence {
        &self.sequence
    }

    /// Run every step's setup in ascending priority order.
    pub fn setup(&mut self) -> Result<(), InitializerError> {
        if self.state != InitializerState::Pending {
            return Err(InitializerError::InvalidArgument(format!(
                "setup can only run once (state: {})",
                self.state
            )));
        }

        self.trace
            .info(&format!("Running setup for {} step(s).", self.sequence.len()));

        for index in 0..self.sequence.len() {
            let Some(step) = self.sequence.get_mut(index) else {
                break;
            };
            let summary = step.summary().to_string();
            let priority = step.priority();

            self.trace
                .verbose(&format!("Setting up step '{summary}' (priority {priority})."));

            if let Err(error) = run_guarded(|| step.setup()) {
                self.trace.error(&format!(
                    "Setup of step '{summary}' (priority {priority}) failed: {error:#}"
                ));
                let primary = InitializerError::SetupFailure {
                    summary,
                    priority,
                    error,
                };

                if self.completed > 0 {
                    self.trace.warning(&format!(
                        "Rolling back {} completed step(s).",
                        self.completed
                    ));
                }
                let secondary = self.teardown_completed();
                self.state = InitializerState::TornDown;

                return Err(if secondary.is_empty() {
                    primary
                } else {
                    AggregateFailure::new(primary, secondary).into()
                });
            }

            self.completed = index + 1;
        }

        self.state = InitializerState::Ready;
        self.trace.info("Setup completed.");
        Ok(())
    }

    /// Tear down every step in reverse setup order.
    ///
    /// A no-op before setup and after a previous teardown.
    pub fn teardown(&mut self) -> Result<(), InitializerError> {
        if self.state != InitializerState::Ready {
            self.trace.verbose(&format!(
                "Nothing to tear down (state: {}).",
                self.state
            ));
            return Ok(());
        }

        self.trace
            .info(&format!("Running teardown for {} step(s).", self.completed));

        let failures = self.teardown_completed();
        self.state = InitializerState::TornDown;

        match AggregateFailure::from_failures(failures) {
            Some(aggregate) => Err(aggregate.into()),
            None => {
                self.trace.info("Teardown completed.");
                Ok(())
            }
        }
    }

    /// Tear down the completed prefix, last first, collecting every failure.
    fn teardown_completed(&mut self) -> Vec<InitializerError> {
        let mut failures = Vec::new();

        for index in (0..self.completed).rev() {
            let Some(step) = self.sequence.get_mut(index) else {
                continue;
            };
            let summary = step.summary().to_string();
            let priority = step.priority();

            self.trace
                .verbose(&format!("Tearing down step '{summary}' (priority {priority})."));

            if let Err(error) = run_guarded(|| step.teardown()) {
                self.trace.warning(&format!(
                    "Teardown of step '{summary}' (priority {priority}) failed: {error:#}"
                ));
                failures.push(InitializerError::TeardownFailure {
                    summary,
                    priority,
                    error,
                });
            }
        }

        self.completed = 0;
        failures
    }
}

impl fmt::Debug for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Initializer")
            .field("sequence", &self.sequence)
            .field("completed", &self.completed)
            .field("state", &self.state)
            .finish()
    }
}

/// Run one step phase, turning a panic into an ordinary error.
fn run_guarded<F>(phase: F) -> anyhow::Result<()>
where
    F: FnOnce() -> anyhow::Result<()>,
{
    panic::catch_unwind(AssertUnwindSafe(phase)).unwrap_or_else(|payload| {
        Err(anyhow!("step panicked: {}", panic_message(payload.as_ref())))
    })
}

impl Drop for Initializer {
    fn drop(&mut self) {
        if self.completed == 0 {
            return;
        }
        self.trace.warning(&format!(
            "Initializer dropped with {} step(s) not torn down; tearing down now.",
            self.completed
        ));
        for failure in self.teardown_completed() {
            self.trace.error(&format!("Teardown on drop failed: {failure}"));
        }
        self.state = InitializerState::TornDown;
    }
}
