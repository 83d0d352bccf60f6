use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::Path;

// @module: Filesystem abstraction used by the bucket cache

/// Minimal filesystem contract for cache artifacts
///
/// The bucket cache only ever needs these five operations. Keeping them
/// behind a trait lets tests swap in filesystems that fail on demand.
pub trait Filesystem: Send + Sync + Debug {
    /// Whether a file exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Read the whole file at `path`
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace the contents of the file at `path`
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Create a directory, including missing parents when `recursive` is set
    fn make_directory(&self, path: &Path, recursive: bool) -> io::Result<()>;

    /// Delete the file at `path`
    fn delete(&self, path: &Path) -> io::Result<()>;
}

// @struct: Filesystem backed by std::fs
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl Filesystem for LocalFilesystem {
    // @checks: File existence
    fn exists(&self, path: &Path) -> bool {
        path.exists() && path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    // @creates: Directory, parents too when recursive
    fn make_directory(&self, path: &Path, recursive: bool) -> io::Result<()> {
        if path.is_dir() {
            return Ok(());
        }
        if recursive {
            fs::create_dir_all(path)
        } else {
            fs::create_dir(path)
        }
    }

    fn delete(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}
