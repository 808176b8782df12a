use crate::error::InitializerError;
use crate::init_step::InitializeStep;
use crate::step_sequence::StepSequence;

use anyhow::anyhow;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Produces the steps of one bootstrap session.
pub trait StepsLoader {
    /// Construct every step and return them ordered by priority.
    fn load(&self) -> Result<StepSequence, InitializerError>;
}

type StepFactory = Box<dyn Fn() -> anyhow::Result<Box<dyn InitializeStep>> + Send + Sync>;

struct Registration {
    type_name: String,
    factory: StepFactory,
}

/// An explicit list of step factories.
///
/// Each registered type yields exactly one instance per `load`. A failing (or
/// panicking) constructor aborts the whole load; no partial sequence is
/// returned.
#[derive(Default)]
pub struct RegistryStepsLoader {
    registrations: Vec<Registration>,
}

impl RegistryStepsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a step type built with `Default`.
    pub fn register<T>(self) -> Self
    where
        T: InitializeStep + Default + 'static,
    {
        self.register_with(std::any::type_name::<T>(), || {
            let step: Box<dyn InitializeStep> = Box::new(T::default());
            Ok(step)
        })
    }

    /// Register a named factory. Registering a name twice keeps the first.
    pub fn register_with<F>(mut self, type_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> anyhow::Result<Box<dyn InitializeStep>> + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        if self.registrations.iter().any(|r| r.type_name == type_name) {
            tracing::debug!("Step type '{}' is already registered; ignoring", type_name);
            return self;
        }
        self.registrations.push(Registration {
            type_name,
            factory: Box::new(factory),
        });
        self
    }

    /// Registered type names, in registration order.
    pub fn type_names(&self) -> Vec<&str> {
        self.registrations.iter().map(|r| r.type_name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl StepsLoader for RegistryStepsLoader {
    fn load(&self) -> Result<StepSequence, InitializerError> {
        let mut steps = Vec::with_capacity(self.registrations.len());

        for registration in &self.registrations {
            let constructed = panic::catch_unwind(AssertUnwindSafe(|| (registration.factory)()))
                .unwrap_or_else(|payload| {
                    Err(anyhow!("constructor panicked: {}", panic_message(payload.as_ref())))
                });

            match constructed {
                Ok(step) => {
                    tracing::debug!(
                        "Loaded step '{}' ({}) with priority {}",
                        step.summary(),
                        registration.type_name,
                        step.priority()
                    );
                    steps.push(step);
                }
                Err(error) => {
                    tracing::error!(
                        "Failed to construct step '{}': {:#}",
                        registration.type_name,
                        error
                    );
                    return Err(InitializerError::ConstructionFailure {
                        type_name: registration.type_name.clone(),
                        error,
                    });
                }
            }
        }

        Ok(StepSequence::new(steps))
    }
}

impl fmt::Debug for RegistryStepsLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryStepsLoader")
            .field("type_names", &self.type_names())
            .finish()
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
