use std::{env, path::PathBuf};

/// Supplies the working directory relative paths are resolved against.
pub trait Environment {
    fn working_directory(&self) -> PathBuf;
}

/// Environment of the running process.
///
/// The working directory is captured once at construction so that later
/// changes to the process current directory do not move files around under
/// a running script.
#[derive(Debug, Clone)]
pub struct SystemEnvironment {
    working_directory: PathBuf,
}

impl SystemEnvironment {
    /// Captures the process current directory.
    ///
    /// Falls back to `.` when the current directory cannot be read (for
    /// instance because it was removed).
    pub fn new() -> Self {
        let working_directory = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { working_directory }
    }

    pub fn with_working_directory<P: Into<PathBuf>>(working_directory: P) -> Self {
        Self {
            working_directory: working_directory.into(),
        }
    }
}

impl Default for SystemEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for SystemEnvironment {
    fn working_directory(&self) -> PathBuf {
        self.working_directory.clone()
    }
}
