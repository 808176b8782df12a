// infra-initializer: runs an explicit, priority-ordered list of setup steps
// and undoes them in reverse order on shutdown or when a later step fails.

pub mod error;
pub mod init_step;
pub mod initializer;
pub mod step_sequence;
pub mod steps_loader;

pub use error::{AggregateFailure, InitializerError};
pub use init_step::InitializeStep;
pub use initializer::{Initializer, InitializerState};
pub use step_sequence::StepSequence;
pub use steps_loader::{RegistryStepsLoader, StepsLoader};
