use super::{
    environment::{Environment, SystemEnvironment},
    file_system::{FileSystem, PhysicalFileSystem},
};

/// What a build script sees of its host: a file system and an environment.
///
/// The CSV aliases are available on every `Context` through
/// [`CsvHelperAliases`](crate::aliases::CsvHelperAliases).
pub trait Context {
    fn file_system(&self) -> &dyn FileSystem;

    fn environment(&self) -> &dyn Environment;
}

/// A [`Context`] owning its file system and environment.
///
/// # Examples
///
/// ```
/// use csv_helper_rs::core::{
///     context::{BuildContext, Context},
///     environment::{Environment, SystemEnvironment},
///     file_system::PhysicalFileSystem,
/// };
/// use std::path::PathBuf;
///
/// let context = BuildContext::with(
///     PhysicalFileSystem,
///     SystemEnvironment::with_working_directory("/build"),
/// );
///
/// assert_eq!(context.environment().working_directory(), PathBuf::from("/build"));
/// ```
pub struct BuildContext {
    file_system: Box<dyn FileSystem>,
    environment: Box<dyn Environment>,
}

impl BuildContext {
    /// A context over the physical file system and the process working
    /// directory.
    pub fn new() -> Self {
        Self::with(PhysicalFileSystem, SystemEnvironment::new())
    }

    pub fn with<F, E>(file_system: F, environment: E) -> Self
    where
        F: FileSystem + 'static,
        E: Environment + 'static,
    {
        Self {
            file_system: Box::new(file_system),
            environment: Box::new(environment),
        }
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Context for BuildContext {
    fn file_system(&self) -> &dyn FileSystem {
        self.file_system.as_ref()
    }

    fn environment(&self) -> &dyn Environment {
        self.environment.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::{BuildContext, Context};
    use crate::core::environment::Environment;

    #[test]
    fn default_context_should_use_process_working_directory() {
        let context = BuildContext::default();

        assert_eq!(
            context.environment().working_directory(),
            env::current_dir().unwrap()
        );
    }
}
