//! mirrorc - incremental transpile-and-mirror watcher
//!
//! Mirrors a source directory tree into an output directory tree on a fixed
//! polling interval: files with recognized extensions are transpiled through
//! a pluggable compiler backend, everything else is copied verbatim, and
//! output files orphaned by source deletions are removed. A subscriber is
//! notified once per pass with the output paths that changed.

pub mod backend;
pub mod config;
pub mod error;
pub mod fs;
pub mod paths;
pub mod watcher;
pub mod writer;

// Re-exports for convenience
pub use backend::{
    BackendKind, BackendOptions, CommandTranspiler, CompilerBackend, Diagnostic, TransformBackend,
    TranspileFn, TypeScriptBackend,
};
pub use config::{Config, WatchOptions, DEFAULT_INTERVAL_MS};
pub use error::{MirrorError, MirrorResult};
pub use fs::{FileSystem, LocalFs};
pub use watcher::{CompileState, WatchEvent, Watcher};
