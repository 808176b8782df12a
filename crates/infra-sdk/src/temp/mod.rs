//! Scoped temp files and directories.
//!
//! Both handles own the filesystem entry they created: dropping the handle
//! (or calling `release`) removes it and clears the recorded path.

mod temp_directory;
mod temp_file;

pub use temp_directory::TempDirectory;
pub use temp_file::TempFile;

const NAME_PREFIX: &str = "tmp";
const NAME_RANDOM_LEN: usize = 10;
