use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use log::debug;

/// Access to files, abstracted so that scripts can be tested against an
/// in-memory file system.
pub trait FileSystem {
    /// Returns `true` if `path` points at an existing regular file.
    fn exists(&self, path: &Path) -> bool;

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read>>;

    /// Opens `path` for writing, creating the file or truncating it.
    fn open_write(&self, path: &Path) -> io::Result<Box<dyn Write>>;
}

/// The real file system, backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhysicalFileSystem;

impl FileSystem for PhysicalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        fs::metadata(path)
            .map(|metadata| metadata.is_file())
            .unwrap_or(false)
    }

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        debug!("Opening {} for reading", path.display());
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn open_write(&self, path: &Path) -> io::Result<Box<dyn Write>> {
        debug!("Opening {} for writing", path.display());
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use tempfile::TempDir;

    use super::{FileSystem, PhysicalFileSystem};

    #[test]
    fn written_content_should_be_readable() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("people.csv");
        let file_system = PhysicalFileSystem;

        assert!(!file_system.exists(&path));

        {
            let mut writer = file_system.open_write(&path)?;
            writer.write_all(b"id,name\n1,Alice\n")?;
            writer.flush()?;
        }

        assert!(file_system.exists(&path));

        let mut content = String::new();
        file_system.open_read(&path)?.read_to_string(&mut content)?;
        assert_eq!(content, "id,name\n1,Alice\n");

        Ok(())
    }

    #[test]
    fn directory_should_not_count_as_existing_file() -> std::io::Result<()> {
        let dir = TempDir::new()?;

        assert!(!PhysicalFileSystem.exists(dir.path()));

        Ok(())
    }

    #[test]
    fn opening_missing_file_should_fail() {
        let result = PhysicalFileSystem.open_read(std::path::Path::new("/nonexistent/people.csv"));

        assert!(result.is_err());
    }
}
