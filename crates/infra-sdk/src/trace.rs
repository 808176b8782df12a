use parking_lot::Mutex;
use std::fmt;

/// Severity attached to a diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceLevel {
    Verbose,
    Info,
    Warning,
    Error,
}

impl fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TraceLevel::Verbose => "verbose",
            TraceLevel::Info => "info",
            TraceLevel::Warning => "warning",
            TraceLevel::Error => "error",
        };
        f.write_str(name)
    }
}

/// Where bootstrap diagnostics go.
///
/// Components hold an `Arc<dyn TraceWriter>` so a session can be pointed at
/// `tracing` in production and at a [`CollectingTraceWriter`] in tests.
/// Only [`write`](TraceWriter::write) is required.
pub trait TraceWriter: Send + Sync {
    fn write(&self, level: TraceLevel, message: &str);

    fn verbose(&self, message: &str) {
        self.write(TraceLevel::Verbose, message);
    }

    fn info(&self, message: &str) {
        self.write(TraceLevel::Info, message);
    }

    fn warning(&self, message: &str) {
        self.write(TraceLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.write(TraceLevel::Error, message);
    }
}

/// Emits `tracing` events carrying a `component` field.
#[derive(Debug, Clone)]
pub struct TracingTraceWriter {
    component: String,
}

impl TracingTraceWriter {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }
}

impl Default for TracingTraceWriter {
    fn default() -> Self {
        Self::new("infra")
    }
}

impl TraceWriter for TracingTraceWriter {
    fn write(&self, level: TraceLevel, message: &str) {
        let component = self.component.as_str();
        match level {
            TraceLevel::Verbose => tracing::debug!(component, "{}", message),
            TraceLevel::Info => tracing::info!(component, "{}", message),
            TraceLevel::Warning => tracing::warn!(component, "{}", message),
            TraceLevel::Error => tracing::error!(component, "{}", message),
        }
    }
}

/// Drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTraceWriter;

impl TraceWriter for NullTraceWriter {
    fn write(&self, _level: TraceLevel, _message: &str) {}
}

/// Keeps every line in memory, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingTraceWriter {
    lines: Mutex<Vec<(TraceLevel, String)>>,
}

impl CollectingTraceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(TraceLevel, String)> {
        self.lines.lock().clone()
    }

    pub fn messages_at(&self, level: TraceLevel) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter_map(|(l, m)| (*l == level).then(|| m.clone()))
            .collect()
    }

    /// True if some line at `level` contains `needle`.
    pub fn contains(&self, level: TraceLevel, needle: &str) -> bool {
        self.lines
            .lock()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl TraceWriter for CollectingTraceWriter {
    fn write(&self, level: TraceLevel, message: &str) {
        self.lines.lock().push((level, message.to_owned()));
    }
}
