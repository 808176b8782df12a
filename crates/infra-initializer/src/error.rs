use std::fmt;

/// Failures of step discovery, setup and teardown.
#[derive(Debug, thiserror::Error)]
pub enum InitializerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to construct step '{type_name}': {error:#}")]
    ConstructionFailure {
        type_name: String,
        error: anyhow::Error,
    },

    #[error("setup of step '{summary}' (priority {priority}) failed: {error:#}")]
    SetupFailure {
        summary: String,
        priority: i32,
        error: anyhow::Error,
    },

    #[error("teardown of step '{summary}' (priority {priority}) failed: {error:#}")]
    TeardownFailure {
        summary: String,
        priority: i32,
        error: anyhow::Error,
    },

    #[error(transparent)]
    Aggregate(#[from] AggregateFailure),
}

impl InitializerError {
    /// The original cause: `self`, or the primary error of an aggregate.
    pub fn primary(&self) -> &InitializerError {
        match self {
            InitializerError::Aggregate(agg) => agg.primary(),
            other => other,
        }
    }

    /// Failures collected while cleaning up after the primary cause.
    pub fn secondary(&self) -> &[InitializerError] {
        match self {
            InitializerError::Aggregate(agg) => agg.secondary(),
            _ => &[],
        }
    }

    /// The summary of the step this error is about, if any.
    pub fn step_summary(&self) -> Option<&str> {
        match self.primary() {
            InitializerError::SetupFailure { summary, .. }
            | InitializerError::TeardownFailure { summary, .. } => Some(summary),
            _ => None,
        }
    }
}

/// One primary error plus everything that went wrong while cleaning up.
#[derive(Debug)]
pub struct AggregateFailure {
    primary: Box<InitializerError>,
    secondary: Vec<InitializerError>,
}

impl AggregateFailure {
    pub fn new(primary: InitializerError, secondary: Vec<InitializerError>) -> Self {
        Self {
            primary: Box::new(primary),
            secondary,
        }
    }

    /// Build from a list whose first element is the primary cause.
    /// Returns `None` for an empty list.
    pub fn from_failures(failures: Vec<InitializerError>) -> Option<Self> {
        let mut failures = failures.into_iter();
        let primary = failures.next()?;
        Some(Self::new(primary, failures.collect()))
    }

    pub fn primary(&self) -> &InitializerError {
        &self.primary
    }

    pub fn secondary(&self) -> &[InitializerError] {
        &self.secondary
    }

    /// Primary first, then secondaries in the order they happened.
    pub fn failures(&self) -> impl Iterator<Item = &InitializerError> {
        std::iter::once(self.primary.as_ref()).chain(self.secondary.iter())
    }

    pub fn len(&self) -> usize {
        1 + self.secondary.len()
    }

    pub fn into_parts(self) -> (InitializerError, Vec<InitializerError>) {
        (*self.primary, self.secondary)
    }
}

impl fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.primary)?;
        if !self.secondary.is_empty() {
            write!(f, "; {} further failure(s) during cleanup:", self.secondary.len())?;
            for (idx, err) in self.secondary.iter().enumerate() {
                write!(f, " [{}] {}", idx + 1, err)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for AggregateFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.primary.as_ref())
    }
}
