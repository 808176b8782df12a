/// A unit of initialization work with a matching undo.
///
/// Steps are created by a [`StepsLoader`](crate::StepsLoader) and owned by an
/// [`Initializer`](crate::Initializer) for one bootstrap session. Constructors
/// should stay cheap; the real work belongs in `setup`.
pub trait InitializeStep: Send {
    /// Position in the setup order. Lower runs earlier.
    fn priority(&self) -> i32;

    /// Human-readable description used in diagnostics only.
    fn summary(&self) -> &str;

    /// Perform the step's side effects.
    fn setup(&mut self) -> anyhow::Result<()>;

    /// Undo what `setup` did. Only called after a successful `setup`.
    fn teardown(&mut self) -> anyhow::Result<()>;
}
