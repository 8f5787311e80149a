//! Mocks of the I/O seams.
use mockall::mock;

use std::{
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use csv_helper_rs::core::{environment::Environment, file_system::FileSystem};

mock! {
    pub File {}
    impl Write for File {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
        fn flush(&mut self) -> io::Result<()>;
    }
}

mock! {
    pub WorkingEnvironment {}
    impl Environment for WorkingEnvironment {
        fn working_directory(&self) -> PathBuf;
    }
}

mock! {
    pub Disk {}
    impl FileSystem for Disk {
        fn exists(&self, path: &Path) -> bool;
        fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read>>;
        fn open_write(&self, path: &Path) -> io::Result<Box<dyn Write>>;
    }
}
