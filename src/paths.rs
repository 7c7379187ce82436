//! Path classification and extension handling
//!
//! A relative path is either "transpilable" (its extension is in the
//! configured set, so it goes through the compiler backend) or "opaque"
//! (copied verbatim every pass). Source and output files are matched across
//! extension rewrites by their stem.

use std::path::{Path, PathBuf};

/// File extension, without the leading dot
pub fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

/// Whether this path's extension is in the transpilable set
pub fn is_transpilable(path: &Path, extensions: &[String]) -> bool {
    match extension(path) {
        Some(ext) => extensions.iter().any(|e| e == ext),
        None => false,
    }
}

/// Path with its extension removed
///
/// Used to match a source file against its output counterpart when the
/// backend rewrites the extension (`sub/a.ts` and `sub/a.js` share the
/// stem `sub/a`). Only the final extension is stripped: `a.test.ts` has
/// stem `a.test`.
pub fn stem(path: &Path) -> PathBuf {
    path.with_extension("")
}

/// Path with its extension replaced
pub fn rewrite_extension(path: &Path, ext: &str) -> PathBuf {
    path.with_extension(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn classifies_by_extension() {
        let allowed = exts(&["ts"]);
        assert!(is_transpilable(Path::new("a.ts"), &allowed));
        assert!(is_transpilable(Path::new("sub/dir/b.ts"), &allowed));
        assert!(!is_transpilable(Path::new("a.txt"), &allowed));
        assert!(!is_transpilable(Path::new("Makefile"), &allowed));
    }

    #[test]
    fn dotfile_has_no_extension() {
        // ".gitignore" is a bare filename, not an extension
        assert!(!is_transpilable(Path::new(".gitignore"), &exts(&["gitignore"])));
    }

    #[test]
    fn stem_strips_final_extension_only() {
        assert_eq!(stem(Path::new("sub/a.ts")), PathBuf::from("sub/a"));
        assert_eq!(stem(Path::new("a.test.ts")), PathBuf::from("a.test"));
        assert_eq!(stem(Path::new("noext")), PathBuf::from("noext"));
    }

    #[test]
    fn stems_match_across_rewrite() {
        let src = Path::new("sub/a.ts");
        let out = rewrite_extension(src, "js");
        assert_eq!(out, PathBuf::from("sub/a.js"));
        assert_eq!(stem(src), stem(&out));
    }
}
