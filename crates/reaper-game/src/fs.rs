//! Filesystem access behind a trait so path resolution and config writes can
//! be tested without a real game install.

use std::io;
use std::path::Path;

pub trait FileSystem: Send + Sync {
    fn is_dir(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    /// Replace the file's contents, creating it if missing.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_fs_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.ini");
        let fs = StdFileSystem;

        assert!(fs.is_dir(dir.path()));
        assert!(!fs.is_file(&file));

        fs.write(&file, "[Section]\nKey=1\n").unwrap();
        assert!(fs.is_file(&file));
        assert!(!fs.is_dir(&file));
        assert_eq!(fs.read_to_string(&file).unwrap(), "[Section]\nKey=1\n");
    }
}
