//! Configuration: `mirrorc.toml` file loading and watcher options

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::backend::BackendKind;
use crate::error::{MirrorError, MirrorResult};

/// Default delay between passes, in milliseconds. The delay starts after a
/// pass completes, so pass duration adds to the effective interval.
pub const DEFAULT_INTERVAL_MS: u64 = 500;

/// On-disk configuration (`mirrorc.toml` in the source root)
///
/// Every field is optional; CLI flags override whatever the file supplies.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Output directory tree to write to. The source root is not
    /// configurable here: the file lives in the source root.
    pub out: Option<PathBuf>,
    /// Backend selector: `"ts"` for TypeScript, anything else for transform
    #[serde(rename = "type")]
    pub backend: Option<String>,
    /// Delay between passes, in milliseconds
    pub interval_ms: Option<u64>,
    /// Extensions eligible for transpilation (overrides backend defaults)
    pub extensions: Option<Vec<String>>,
    /// Transform backend only: retain original line numbers (default true)
    #[serde(rename = "retainLines")]
    pub retain_lines: Option<bool>,
    /// Log a line per compiled file with elapsed time and backend name
    pub log: Option<bool>,
    /// External transpiler program (stdin -> stdout)
    pub command: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> MirrorResult<Config> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| MirrorError::InvalidConfig {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `mirrorc.toml` from the source root if present, else defaults
    pub fn load_or_default(source_root: &Path) -> MirrorResult<Config> {
        let path = source_root.join("mirrorc.toml");
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Config::default())
        }
    }
}

/// Watcher options
///
/// Built once at construction; the watcher never mutates these.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Directory tree to read from
    pub source_root: PathBuf,
    /// Directory tree to write to (mirrored structure)
    pub output_root: PathBuf,
    /// Backend variant
    pub backend: BackendKind,
    /// Delay between passes (after completion, not a fixed period)
    pub interval: Duration,
    /// Transpilable extensions; empty means the backend's defaults
    pub extensions: Vec<String>,
    /// Transform backend only: retain original line numbers
    pub retain_lines: bool,
    /// Emit a per-file event with elapsed time and backend name
    pub log: bool,
}

impl WatchOptions {
    /// Create options with required roots and defaults for everything else
    pub fn new(source_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            output_root: output_root.into(),
            backend: BackendKind::default(),
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            extensions: Vec::new(),
            retain_lines: true,
            log: false,
        }
    }

    /// Set the backend variant
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Set the inter-pass delay
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Override the transpilable extension set
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Set line-number retention for the transform backend
    pub fn with_retain_lines(mut self, retain_lines: bool) -> Self {
        self.retain_lines = retain_lines;
        self
    }

    /// Enable per-file compile logging
    pub fn with_log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    /// Effective transpilable extension set: configured, or the backend's
    /// defaults when none were configured.
    pub fn allowed_extensions(&self) -> Vec<String> {
        if self.extensions.is_empty() {
            self.backend.default_extensions()
        } else {
            self.extensions.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(
            r#"
out = "build"
type = "ts"
interval_ms = 250
extensions = ["ts", "tsx"]
retainLines = false
log = true
command = "tsc-pipe"
"#,
        )
        .unwrap();

        assert_eq!(config.out, Some(PathBuf::from("build")));
        assert_eq!(config.backend.as_deref(), Some("ts"));
        assert_eq!(config.interval_ms, Some(250));
        assert_eq!(config.extensions.as_deref().unwrap().len(), 2);
        assert_eq!(config.retain_lines, Some(false));
        assert_eq!(config.log, Some(true));
        assert_eq!(config.command.as_deref(), Some("tsc-pipe"));
    }

    #[test]
    fn empty_config_is_valid() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.out.is_none());
        assert!(config.backend.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = toml::from_str::<Config>("unknown_key = 1").unwrap_err();
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn load_reports_file_in_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirrorc.toml");
        std::fs::write(&path, "type = [broken").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, MirrorError::InvalidConfig { .. }));
        assert!(err.to_string().contains("mirrorc.toml"));
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path()).unwrap();
        assert!(config.out.is_none());
    }

    #[test]
    fn options_builder_defaults() {
        let options = WatchOptions::new("src", "out");
        assert_eq!(options.backend, BackendKind::Transform);
        assert_eq!(options.interval, Duration::from_millis(DEFAULT_INTERVAL_MS));
        assert!(options.retain_lines);
        assert!(!options.log);
        assert_eq!(options.allowed_extensions(), vec!["js"]);
    }

    #[test]
    fn allowed_extensions_follow_backend_unless_configured() {
        let options = WatchOptions::new("src", "out").with_backend(BackendKind::TypeScript);
        assert_eq!(options.allowed_extensions(), vec!["ts"]);

        let options = options.with_extensions(vec!["ts".into(), "tsx".into()]);
        assert_eq!(options.allowed_extensions(), vec!["ts", "tsx"]);
    }
}
