//! Deleted-file reconciliation
//!
//! Keeps the output tree consistent with source-tree deletions: an output
//! file with a recognized extension whose stem no longer exists among the
//! source stems is an orphan and gets deleted. Opaque (copy-only) outputs
//! are never touched; deletion parity is not guaranteed for them.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::fs::FileSystem;
use crate::paths;
use crate::watcher::WatchEvent;

/// Delete orphaned output files and return their absolute paths.
///
/// `recognized` is the set of output extensions eligible for deletion: the
/// transpilable extensions plus their backend-rewritten forms, so in
/// TypeScript mode both a stray `out/c.ts` and a compiled `out/c.js` are
/// reconciled. Runs once per pass, before compilation, so the pass's
/// changed-file list reflects removals as well as updates.
///
/// A failed delete is reported through the event callback and skipped;
/// reconciliation never aborts the pass.
pub fn reconcile_deleted<FS: FileSystem>(
    fs: &FS,
    output_root: &Path,
    source_paths: &[PathBuf],
    output_paths: &[PathBuf],
    recognized: &HashSet<String>,
    on_event: &impl Fn(WatchEvent),
) -> Vec<PathBuf> {
    let source_stems: HashSet<PathBuf> = source_paths.iter().map(|p| paths::stem(p)).collect();

    let mut deleted = Vec::new();

    for output in output_paths {
        let eligible = paths::extension(output)
            .map(|ext| recognized.contains(ext))
            .unwrap_or(false);
        if !eligible {
            continue;
        }
        if source_stems.contains(&paths::stem(output)) {
            continue;
        }

        let absolute = output_root.join(output);
        match fs.remove_file(&absolute) {
            Ok(()) => {
                on_event(WatchEvent::FileDeleted {
                    path: absolute.display().to_string(),
                });
                deleted.push(absolute);
            }
            Err(e) => {
                on_event(WatchEvent::Error {
                    message: format!("failed to delete {}: {}", absolute.display(), e),
                });
            }
        }
    }

    deleted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    fn recognized(list: &[&str]) -> HashSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn rel(paths: &[&str]) -> Vec<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn deletes_orphaned_recognized_output() {
        let fs = MockFileSystem::new();
        fs.insert("out/c.js", "stale");

        let deleted = reconcile_deleted(
            &fs,
            Path::new("out"),
            &rel(&["a.ts"]),
            &rel(&["c.js"]),
            &recognized(&["ts", "js"]),
            &|_| {},
        );

        assert_eq!(deleted, vec![PathBuf::from("out/c.js")]);
        assert!(!fs.exists(Path::new("out/c.js")));
    }

    #[test]
    fn keeps_output_with_matching_source_stem() {
        let fs = MockFileSystem::new();
        fs.insert("out/a.js", "compiled");

        let deleted = reconcile_deleted(
            &fs,
            Path::new("out"),
            &rel(&["a.ts"]),
            &rel(&["a.js"]),
            &recognized(&["ts", "js"]),
            &|_| {},
        );

        assert!(deleted.is_empty());
        assert!(fs.exists(Path::new("out/a.js")));
    }

    #[test]
    fn never_touches_unrecognized_extensions() {
        let fs = MockFileSystem::new();
        fs.insert("out/c.txt", "artifact");

        let deleted = reconcile_deleted(
            &fs,
            Path::new("out"),
            &rel(&[]),
            &rel(&["c.txt"]),
            &recognized(&["ts", "js"]),
            &|_| {},
        );

        assert!(deleted.is_empty());
        assert!(fs.exists(Path::new("out/c.txt")));
    }

    #[test]
    fn any_source_extension_protects_the_stem() {
        // Stems are compared across all source files, so src/c.txt keeps
        // out/c.js alive even though .txt is not transpilable.
        let fs = MockFileSystem::new();
        fs.insert("out/c.js", "compiled");

        let deleted = reconcile_deleted(
            &fs,
            Path::new("out"),
            &rel(&["c.txt"]),
            &rel(&["c.js"]),
            &recognized(&["ts", "js"]),
            &|_| {},
        );

        assert!(deleted.is_empty());
    }

    #[test]
    fn nested_orphans_are_deleted() {
        let fs = MockFileSystem::new();
        fs.insert("out/sub/dir/gone.js", "stale");

        let deleted = reconcile_deleted(
            &fs,
            Path::new("out"),
            &rel(&["sub/kept.ts"]),
            &rel(&["sub/dir/gone.js"]),
            &recognized(&["ts", "js"]),
            &|_| {},
        );

        assert_eq!(deleted, vec![PathBuf::from("out/sub/dir/gone.js")]);
    }

    #[test]
    fn delete_failure_reports_and_continues() {
        let fs = MockFileSystem::new();
        // out/gone.js is listed but does not exist, so remove_file fails
        fs.insert("out/also-gone.js", "stale");

        let mut events = Vec::new();
        let deleted = {
            let events_ref = std::cell::RefCell::new(&mut events);
            reconcile_deleted(
                &fs,
                Path::new("out"),
                &rel(&[]),
                &rel(&["gone.js", "also-gone.js"]),
                &recognized(&["js"]),
                &|e| events_ref.borrow_mut().push(e),
            )
        };

        assert_eq!(deleted, vec![PathBuf::from("out/also-gone.js")]);
        assert!(events
            .iter()
            .any(|e| matches!(e, WatchEvent::Error { .. })));
    }
}
