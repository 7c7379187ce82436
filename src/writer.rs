//! Atomic output writer
//!
//! Uses the tempfile + rename pattern so a reader of the output tree never
//! observes a half-written file.

use std::io::Write;
use std::path::Path;

use crate::error::MirrorResult;

/// Write content to a file atomically, fully overwriting any existing file.
///
/// The temporary file is created in the destination's parent directory so
/// the final rename stays on the same filesystem.
pub fn atomic_write(path: &Path, content: &[u8]) -> MirrorResult<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(content)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn atomic_write_new_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.js");

        atomic_write(&path, b"var x = 1;").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "var x = 1;");
    }

    #[test]
    fn atomic_write_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.js");

        std::fs::write(&path, "original").unwrap();
        atomic_write(&path, b"replaced").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "replaced");
    }

    #[test]
    fn atomic_write_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.js");

        atomic_write(&path, b"content").unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
