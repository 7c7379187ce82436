//! Per-file compile state
//!
//! Working memory for one watcher instance: which source mtime each file
//! was last processed at, which files are currently failing, and the most
//! recent compile error. Process-scoped; nothing here survives a restart
//! (the output tree's mtimes rebuild the skip decisions implicitly).

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::MirrorError;

/// Compile state owned by a single watcher
#[derive(Debug, Default)]
pub struct CompileState {
    /// Source-relative path -> source mtime at the last compile attempt.
    /// Present only for files processed at least once this process.
    records: HashMap<PathBuf, SystemTime>,
    /// Files currently believed to be failing
    errors: HashSet<PathBuf>,
    /// Most recent compile error, for inspection by a caller
    last_error: Option<MirrorError>,
}

impl CompileState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass-start housekeeping: the stale error slot is cleared only when
    /// no file is outstanding, so a persistent failure elsewhere is never
    /// masked by an unrelated success.
    pub fn begin_pass(&mut self) {
        if self.errors.is_empty() {
            self.last_error = None;
        }
    }

    /// Whether a file at this mtime needs recompiling: no record yet, or
    /// the record is strictly older than the source.
    pub fn needs_compile(&self, path: &Path, mtime: SystemTime) -> bool {
        match self.records.get(path) {
            Some(recorded) => *recorded < mtime,
            None => true,
        }
    }

    /// Record a successful compile attempt
    pub fn record_success(&mut self, path: &Path, mtime: SystemTime) {
        self.records.insert(path.to_path_buf(), mtime);
        self.errors.remove(path);
    }

    /// Record a failed compile attempt. The mtime is recorded anyway so an
    /// unchanged broken file is not retried every pass; it retries only
    /// when the source mtime moves again.
    pub fn record_failure(&mut self, path: &Path, mtime: SystemTime, error: MirrorError) {
        self.records.insert(path.to_path_buf(), mtime);
        self.errors.insert(path.to_path_buf());
        self.last_error = Some(error);
    }

    /// Whether any file is currently failing
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Files currently failing
    pub fn failing_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.errors.iter()
    }

    /// Most recent compile error, if still outstanding
    pub fn last_error(&self) -> Option<&MirrorError> {
        self.last_error.as_ref()
    }
}
