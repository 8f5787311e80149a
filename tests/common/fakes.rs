//! In-memory stand-in for the file system.
use std::{
    cell::RefCell,
    collections::HashMap,
    io::{self, Cursor, ErrorKind, Read, Write},
    path::{Path, PathBuf},
    rc::Rc,
};

use csv_helper_rs::core::file_system::FileSystem;

use super::mocks::MockFile;

type Files = Rc<RefCell<HashMap<PathBuf, Vec<u8>>>>;

/// Files live in a shared map, so clones of a `FakeFileSystem` see each
/// other's writes.
#[derive(Default, Clone)]
pub struct FakeFileSystem {
    files: Files,
}

impl FakeFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_file<P: Into<PathBuf>, C: AsRef<[u8]>>(&self, path: P, content: C) {
        self.files
            .borrow_mut()
            .insert(path.into(), content.as_ref().to_vec());
    }

    pub fn bytes<P: AsRef<Path>>(&self, path: P) -> Option<Vec<u8>> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    pub fn content<P: AsRef<Path>>(&self, path: P) -> Option<String> {
        self.bytes(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl FileSystem for FakeFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        match self.files.borrow().get(path) {
            Some(content) => Ok(Box::new(Cursor::new(content.clone()))),
            None => Err(io::Error::new(ErrorKind::NotFound, path.display().to_string())),
        }
    }

    fn open_write(&self, path: &Path) -> io::Result<Box<dyn Write>> {
        self.files.borrow_mut().insert(path.to_path_buf(), Vec::new());
        Ok(Box::new(FakeFile {
            files: Rc::clone(&self.files),
            path: path.to_path_buf(),
        }))
    }
}

struct FakeFile {
    files: Files,
    path: PathBuf,
}

impl Write for FakeFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.files
            .borrow_mut()
            .entry(self.path.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A file system whose files can be opened but not written to.
pub struct ReadOnlyFileSystem;

impl FileSystem for ReadOnlyFileSystem {
    fn exists(&self, _path: &Path) -> bool {
        false
    }

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        Err(io::Error::new(ErrorKind::NotFound, path.display().to_string()))
    }

    fn open_write(&self, _path: &Path) -> io::Result<Box<dyn Write>> {
        let mut file = MockFile::default();
        file.expect_write()
            .returning(|_| Err(io::Error::new(ErrorKind::PermissionDenied, "read-only")));
        file.expect_flush().returning(|| Ok(()));
        Ok(Box::new(file))
    }
}
