//! Poll-based incremental compilation watcher
//!
//! Mirrors a source tree into an output tree on a fixed polling interval:
//! recognized files go through the compiler backend, everything else is
//! copied verbatim, and outputs orphaned by source deletions are removed.
//! Per-file state (last-compiled mtime, error membership) lives in
//! [`CompileState`], owned by one [`Watcher`] instance.

mod event;
mod pass;
mod reconcile;
mod state;


pub use event::WatchEvent;
pub use pass::{ChangeCallback, Watcher};
pub use reconcile::reconcile_deleted;
pub use state::CompileState;
