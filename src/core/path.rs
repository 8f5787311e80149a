use std::{
    fmt,
    path::{Path, PathBuf},
};

use super::environment::Environment;

/// A path to a file as given by a build script.
///
/// The path may be relative, in which case it is resolved against the
/// working directory of an [`Environment`] before the file is opened.
///
/// # Examples
///
/// ```
/// use csv_helper_rs::core::{environment::SystemEnvironment, path::FilePath};
/// use std::path::Path;
///
/// let environment = SystemEnvironment::with_working_directory("/Working");
///
/// let relative = FilePath::from("./people.csv");
/// assert!(relative.is_relative());
/// assert_eq!(
///     relative.make_absolute(&environment).as_path(),
///     Path::new("/Working/people.csv")
/// );
///
/// let absolute = FilePath::from("/data/people.csv");
/// assert_eq!(absolute.make_absolute(&environment), absolute);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilePath(PathBuf);

impl FilePath {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self(path.into())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn is_relative(&self) -> bool {
        self.0.is_relative()
    }

    /// Returns `true` when the path has no components at all.
    pub fn is_empty(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    /// Resolves the path against the working directory of `environment`.
    ///
    /// Absolute paths are returned unchanged. Leading `./` components are
    /// dropped so that `./people.csv` resolves to `<working dir>/people.csv`.
    pub fn make_absolute(&self, environment: &dyn Environment) -> FilePath {
        if !self.is_relative() {
            return self.clone();
        }

        let relative: PathBuf = self
            .0
            .components()
            .skip_while(|component| matches!(component, std::path::Component::CurDir))
            .collect();

        FilePath(environment.working_directory().join(relative))
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for FilePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<&str> for FilePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for FilePath {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for FilePath {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl From<&Path> for FilePath {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<&FilePath> for FilePath {
    fn from(path: &FilePath) -> Self {
        path.clone()
    }
}
