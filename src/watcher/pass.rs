//! Compile pass orchestration and the polling loop
//!
//! One `Watcher` owns the compile state for one source/output root pair, so
//! multiple watchers can coexist in a process. A pass enumerates the source
//! tree, reconciles deletions, then visits every source file in order:
//! opaque files are mirrored verbatim, transpilable files are recompiled
//! when stale. Passes are serialized by construction; the next pass is
//! scheduled a fixed delay after the current one completes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::backend::CompilerBackend;
use crate::config::WatchOptions;
use crate::error::{MirrorError, MirrorResult};
use crate::fs::FileSystem;
use crate::paths;
use crate::watcher::reconcile::reconcile_deleted;
use crate::watcher::state::CompileState;
use crate::watcher::WatchEvent;

/// Sleep slice for the inter-pass delay, so shutdown stays responsive
const SHUTDOWN_POLL_MS: u64 = 50;

/// Callback invoked once per pass with the absolute output paths that
/// changed (deletions plus successful recompiles). Not invoked when the
/// list is empty.
pub type ChangeCallback = Box<dyn Fn(&[PathBuf])>;

/// The incremental compilation watcher
pub struct Watcher<FS: FileSystem> {
    options: WatchOptions,
    backend: Box<dyn CompilerBackend>,
    fs: FS,
    state: CompileState,
    on_change: Option<ChangeCallback>,
}

impl<FS: FileSystem> Watcher<FS> {
    pub fn new(options: WatchOptions, backend: Box<dyn CompilerBackend>, fs: FS) -> Self {
        Self {
            options,
            backend,
            fs,
            state: CompileState::new(),
            on_change: None,
        }
    }

    /// Register the per-pass change subscriber
    pub fn with_on_change(mut self, on_change: ChangeCallback) -> Self {
        self.on_change = Some(on_change);
        self
    }

    /// Inspect the compile state (error set, last error)
    pub fn state(&self) -> &CompileState {
        &self.state
    }

    pub fn options(&self) -> &WatchOptions {
        &self.options
    }

    /// Output extensions the reconciler may delete: the transpilable set
    /// plus each extension's backend-rewritten form.
    fn recognized_output_extensions(&self, allowed: &[String]) -> HashSet<String> {
        let mut recognized: HashSet<String> = allowed.iter().cloned().collect();
        for ext in allowed {
            recognized.insert(self.backend.output_extension(ext));
        }
        recognized
    }

    /// Run one full pass: enumerate, reconcile deletions, compile or copy
    /// each source file, and notify the change subscriber.
    ///
    /// Returns the absolute output paths that changed. Per-file failures
    /// are reported through `on_event` and never abort the pass; only a
    /// failure to enumerate the source tree itself is fatal.
    pub fn run_pass(&mut self, on_event: &impl Fn(WatchEvent)) -> MirrorResult<Vec<PathBuf>> {
        self.state.begin_pass();
        on_event(WatchEvent::PassStarted);

        let allowed = self.options.allowed_extensions();
        let sources = self.fs.list_relative(&self.options.source_root)?;
        // The output tree may not exist until the first write
        let outputs = self
            .fs
            .list_relative(&self.options.output_root)
            .unwrap_or_default();

        let recognized = self.recognized_output_extensions(&allowed);
        let mut changed = reconcile_deleted(
            &self.fs,
            &self.options.output_root,
            &sources,
            &outputs,
            &recognized,
            on_event,
        );

        for rel in &sources {
            if paths::is_transpilable(rel, &allowed) {
                self.visit_transpilable(rel, &mut changed, on_event);
            } else {
                self.copy_opaque(rel, on_event);
            }
        }

        if !changed.is_empty() {
            if let Some(on_change) = &self.on_change {
                on_change(&changed);
            }
        }
        on_event(WatchEvent::PassComplete {
            changed: changed.len(),
        });

        Ok(changed)
    }

    /// Copy-only files mirror their source every pass, with no staleness
    /// check and no state tracking, so the output can never drift. The copy
    /// is byte-for-byte; opaque files are never decoded as text.
    fn copy_opaque(&self, rel: &Path, on_event: &impl Fn(WatchEvent)) {
        let src = self.options.source_root.join(rel);
        let content = match self.fs.read(&src) {
            Ok(content) => content,
            Err(e) => {
                on_event(WatchEvent::Error {
                    message: format!("failed to read {}: {}", src.display(), e),
                });
                return;
            }
        };
        // Empty content means the file is locked or mid-write; skip quietly
        if content.is_empty() {
            return;
        }

        let out = self.options.output_root.join(rel);
        if let Err(e) = self.fs.write_bytes(&out, &content) {
            on_event(WatchEvent::Error {
                message: format!("failed to write {}: {}", out.display(), e),
            });
        } else {
            on_event(WatchEvent::FileCopied {
                path: rel.display().to_string(),
            });
        }
    }

    fn visit_transpilable(
        &mut self,
        rel: &Path,
        changed: &mut Vec<PathBuf>,
        on_event: &impl Fn(WatchEvent),
    ) {
        let src = self.options.source_root.join(rel);
        let mtime = match self.fs.modified(&src) {
            Ok(mtime) => mtime,
            Err(e) => {
                on_event(WatchEvent::Error {
                    message: format!("failed to stat {}: {}", src.display(), e),
                });
                return;
            }
        };

        let input_ext = paths::extension(rel).unwrap_or_default();
        let out_rel = paths::rewrite_extension(rel, &self.backend.output_extension(input_ext));
        let out = self.options.output_root.join(&out_rel);

        // An output that is already newer than the source short-circuits
        // recompilation, regardless of any record we hold. This lets an
        // externally-updated output stand.
        if self.fs.exists(&out) {
            if let Ok(out_mtime) = self.fs.modified(&out) {
                if out_mtime > mtime {
                    return;
                }
            }
        }

        if !self.state.needs_compile(rel, mtime) {
            return;
        }

        let content = match self.fs.read_to_string(&src) {
            Ok(content) => content,
            Err(e) => {
                on_event(WatchEvent::Error {
                    message: format!("failed to read {}: {}", src.display(), e),
                });
                return;
            }
        };
        if content.is_empty() {
            return;
        }

        let started = Instant::now();
        let compiled = match self.backend.compile(&content, rel) {
            Ok(compiled) => compiled,
            Err(e) => {
                let error = MirrorError::Compile {
                    file: rel.to_path_buf(),
                    message: e.message,
                };
                // A failed attempt still counts as visited for this mtime;
                // the file retries only when its source mtime moves again.
                on_event(WatchEvent::CompileFailed {
                    path: rel.display().to_string(),
                    message: error.to_string(),
                });
                self.state.record_failure(rel, mtime, error);
                return;
            }
        };

        // A write failure is an output problem, not a compile failure: no
        // record is stored, so the file retries on the next pass.
        if let Err(e) = self.fs.write(&out, &compiled) {
            on_event(WatchEvent::Error {
                message: format!("failed to write {}: {}", out.display(), e),
            });
            return;
        }

        self.state.record_success(rel, mtime);
        changed.push(out);
        on_event(WatchEvent::FileCompiled {
            path: rel.display().to_string(),
            backend: self.backend.name().to_string(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        });
    }

    /// Start the polling loop (blocking)
    ///
    /// Runs a pass, then waits the configured interval before the next one;
    /// the delay starts after the pass completes, so pass duration adds to
    /// the effective period. The loop stops when `running` is cleared,
    /// checked between short sleep slices.
    pub fn start(
        &mut self,
        running: Arc<AtomicBool>,
        on_event: impl Fn(WatchEvent),
    ) -> MirrorResult<()> {
        on_event(WatchEvent::WatchStarted {
            source: self.options.source_root.display().to_string(),
            out: self.options.output_root.display().to_string(),
            backend: self.backend.name().to_string(),
        });

        while running.load(Ordering::SeqCst) {
            self.run_pass(&on_event)?;

            let deadline = Instant::now() + self.options.interval;
            while running.load(Ordering::SeqCst) {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                let remaining = deadline - now;
                std::thread::sleep(remaining.min(Duration::from_millis(SHUTDOWN_POLL_MS)));
            }
        }

        on_event(WatchEvent::Shutdown);
        Ok(())
    }
}
