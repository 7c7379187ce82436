//! File system abstraction
//!
//! The watcher talks to disk exclusively through the [`FileSystem`] trait so
//! the pass logic can be driven against an in-memory mock with controllable
//! modification timestamps. `LocalFs` is the real implementation.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{MirrorError, MirrorResult};

/// Abstract file system interface consumed by the watcher.
pub trait FileSystem {
    /// Read file content as UTF-8 text
    fn read_to_string(&self, path: &Path) -> MirrorResult<String>;

    /// Read raw file content. Copy-only files go through this so binary
    /// files mirror byte-for-byte.
    fn read(&self, path: &Path) -> MirrorResult<Vec<u8>>;

    /// Write file content, creating parent directories as needed.
    /// Fully overwrites any existing file.
    fn write(&self, path: &Path, content: &str) -> MirrorResult<()>;

    /// Write raw file content, creating parent directories as needed
    fn write_bytes(&self, path: &Path, content: &[u8]) -> MirrorResult<()>;

    /// Check if a file exists
    fn exists(&self, path: &Path) -> bool;

    /// Remove a file
    fn remove_file(&self, path: &Path) -> MirrorResult<()>;

    /// Create directory and parents (idempotent)
    fn create_dir_all(&self, path: &Path) -> MirrorResult<()>;

    /// Last modification time of a file
    fn modified(&self, path: &Path) -> MirrorResult<SystemTime>;

    /// Recursively list files under `root`, as paths relative to `root`,
    /// in sorted order. Directories themselves are not listed.
    fn list_relative(&self, root: &Path) -> MirrorResult<Vec<PathBuf>>;
}

/// Local disk implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }

    fn collect_files(
        root: &Path,
        current: &Path,
        out: &mut Vec<PathBuf>,
    ) -> MirrorResult<()> {
        for entry in std::fs::read_dir(current)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                Self::collect_files(root, &path, out)?;
            } else if let Ok(rel) = path.strip_prefix(root) {
                out.push(rel.to_path_buf());
            }
        }
        Ok(())
    }
}

impl FileSystem for LocalFs {
    fn read_to_string(&self, path: &Path) -> MirrorResult<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn read(&self, path: &Path) -> MirrorResult<Vec<u8>> {
        Ok(std::fs::read(path)?)
    }

    fn write(&self, path: &Path, content: &str) -> MirrorResult<()> {
        self.write_bytes(path, content.as_bytes())
    }

    fn write_bytes(&self, path: &Path, content: &[u8]) -> MirrorResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        crate::writer::atomic_write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_file(&self, path: &Path) -> MirrorResult<()> {
        Ok(std::fs::remove_file(path)?)
    }

    fn create_dir_all(&self, path: &Path) -> MirrorResult<()> {
        Ok(std::fs::create_dir_all(path)?)
    }

    fn modified(&self, path: &Path) -> MirrorResult<SystemTime> {
        Ok(std::fs::metadata(path)?.modified()?)
    }

    fn list_relative(&self, root: &Path) -> MirrorResult<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(MirrorError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }
        let mut files = Vec::new();
        Self::collect_files(root, root, &mut files)?;
        files.sort();
        Ok(files)
    }
}

/// In-memory file system for testing
///
/// Uses `Arc<Mutex<>>` internally so it can be cloned and shared. Every
/// write bumps an internal clock, so written files always have strictly
/// increasing modification times; `set_modified` lets tests rewind or
/// advance individual files to exercise staleness rules.
#[cfg(test)]
#[derive(Clone)]
pub struct MockFileSystem {
    inner: std::sync::Arc<std::sync::Mutex<MockInner>>,
}

#[cfg(test)]
struct MockInner {
    files: std::collections::HashMap<PathBuf, (Vec<u8>, SystemTime)>,
    clock: SystemTime,
    fail_writes: bool,
}

#[cfg(test)]
impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            inner: std::sync::Arc::new(std::sync::Mutex::new(MockInner {
                files: std::collections::HashMap::new(),
                clock: SystemTime::UNIX_EPOCH,
                fail_writes: false,
            })),
        }
    }

    fn tick(inner: &mut MockInner) -> SystemTime {
        inner.clock += std::time::Duration::from_secs(1);
        inner.clock
    }

    /// Insert a file without going through `write` (no parent creation)
    pub fn insert(&self, path: impl Into<PathBuf>, content: &str) {
        self.insert_bytes(path, content.as_bytes());
    }

    /// Insert a file with raw content
    pub fn insert_bytes(&self, path: impl Into<PathBuf>, content: &[u8]) {
        let mut inner = self.inner.lock().unwrap();
        let now = Self::tick(&mut inner);
        inner.files.insert(path.into(), (content.to_vec(), now));
    }

    /// Make every subsequent write fail, to simulate a full or read-only
    /// output volume.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_writes = fail;
    }

    /// Override a file's modification time
    pub fn set_modified(&self, path: &Path, mtime: SystemTime) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(entry) = inner.files.get_mut(path) {
            entry.1 = mtime;
        }
    }

    /// Current value of the mock clock
    pub fn now(&self) -> SystemTime {
        self.inner.lock().unwrap().clock
    }
}

#[cfg(test)]
impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> MirrorResult<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|_| {
            MirrorError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "stream did not contain valid UTF-8",
            ))
        })
    }

    fn read(&self, path: &Path) -> MirrorResult<Vec<u8>> {
        let inner = self.inner.lock().unwrap();
        inner
            .files
            .get(path)
            .map(|(content, _)| content.clone())
            .ok_or_else(|| {
                MirrorError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "file not found",
                ))
            })
    }

    fn write(&self, path: &Path, content: &str) -> MirrorResult<()> {
        self.write_bytes(path, content.as_bytes())
    }

    fn write_bytes(&self, path: &Path, content: &[u8]) -> MirrorResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes {
            return Err(MirrorError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "write refused",
            )));
        }
        let now = Self::tick(&mut inner);
        inner
            .files
            .insert(path.to_path_buf(), (content.to_vec(), now));
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.lock().unwrap().files.contains_key(path)
    }

    fn remove_file(&self, path: &Path) -> MirrorResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.files.remove(path).map(|_| ()).ok_or_else(|| {
            MirrorError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "file not found",
            ))
        })
    }

    fn create_dir_all(&self, _path: &Path) -> MirrorResult<()> {
        Ok(())
    }

    fn modified(&self, path: &Path) -> MirrorResult<SystemTime> {
        let inner = self.inner.lock().unwrap();
        inner.files.get(path).map(|(_, mtime)| *mtime).ok_or_else(|| {
            MirrorError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "file not found",
            ))
        })
    }

    fn list_relative(&self, root: &Path) -> MirrorResult<Vec<PathBuf>> {
        let inner = self.inner.lock().unwrap();
        let mut files: Vec<PathBuf> = inner
            .files
            .keys()
            .filter_map(|p| p.strip_prefix(root).ok().map(|r| r.to_path_buf()))
            .collect();
        files.sort();
        Ok(files)
    }
}
