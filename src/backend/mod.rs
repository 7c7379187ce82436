//! Compiler backends
//!
//! A backend is a pure capability: source text + filename in, transformed
//! text or a diagnostic out. All file I/O belongs to the caller. The actual
//! transpiler is an opaque function injected at construction
//! ([`TranspileFn`]), typically an external process ([`CommandTranspiler`])
//! or a test closure, so the watcher carries no compiler semantics of its
//! own.

mod command;
mod transform;
mod typescript;

pub use command::CommandTranspiler;
pub use transform::TransformBackend;
pub use typescript::TypeScriptBackend;

use std::path::Path;

/// A structured diagnostic reported by a transpiler.
/// Line and character positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub line: usize,
    pub character: usize,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, line: usize, character: usize) -> Self {
        Self {
            message: message.into(),
            line,
            character,
        }
    }
}

/// Error type for compilation failures
#[derive(Debug, Clone)]
pub struct CompileError {
    pub message: String,
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CompileError {}

/// Options threaded through to the injected transpiler
#[derive(Debug, Clone)]
pub struct BackendOptions {
    /// Preserve original source line numbers in the output, for accurate
    /// stack traces. Only the transform backend honors this.
    pub retain_lines: bool,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self { retain_lines: true }
    }
}

/// The opaque transpiler function a backend wraps.
///
/// Pure with respect to the filesystem: it sees only the source text and
/// the (relative) filename, and returns either transformed text or the
/// transpiler's diagnostics.
pub type TranspileFn =
    Box<dyn Fn(&str, &Path, &BackendOptions) -> Result<String, Vec<Diagnostic>> + Send + Sync>;

/// Compiler backend capability
///
/// Two implementations, selected at construction time: [`TypeScriptBackend`]
/// (rewrites extensions to `.js`, formats positioned diagnostics) and
/// [`TransformBackend`] (same-extension transform with `retain_lines`).
pub trait CompilerBackend: Send {
    /// Short name used in logs and events
    fn name(&self) -> &'static str;

    /// Extension the output file should carry for a given input extension
    fn output_extension(&self, input: &str) -> String;

    /// Transform source text, or fail with a single error value.
    /// Never partially produces output.
    fn compile(&self, source: &str, file: &Path) -> Result<String, CompileError>;
}

/// Which backend variant to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    TypeScript,
    #[default]
    Transform,
}

impl BackendKind {
    /// `"ts"` selects the TypeScript backend; any other value selects the
    /// transform backend.
    pub fn from_flag(flag: &str) -> Self {
        if flag == "ts" {
            BackendKind::TypeScript
        } else {
            BackendKind::Transform
        }
    }

    /// Default transpilable extensions for this backend
    pub fn default_extensions(self) -> Vec<String> {
        match self {
            BackendKind::TypeScript => vec!["ts".to_string()],
            BackendKind::Transform => vec!["js".to_string()],
        }
    }

    /// Construct the backend this kind names around an injected transpiler
    pub fn build(self, transpile: TranspileFn, options: BackendOptions) -> Box<dyn CompilerBackend> {
        match self {
            BackendKind::TypeScript => Box::new(TypeScriptBackend::new(transpile)),
            BackendKind::Transform => {
                Box::new(TransformBackend::new(transpile).with_options(options))
            }
        }
    }

    /// Construct the identity (passthrough) variant of this backend
    pub fn build_passthrough(self) -> Box<dyn CompilerBackend> {
        match self {
            BackendKind::TypeScript => Box::new(TypeScriptBackend::passthrough()),
            BackendKind::Transform => Box::new(TransformBackend::passthrough()),
        }
    }
}

/// An identity transpiler, used when no external compiler is configured
/// (pure mirroring) and in tests.
pub fn passthrough_fn() -> TranspileFn {
    Box::new(|source, _file, _opts| Ok(source.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_flag() {
        assert_eq!(BackendKind::from_flag("ts"), BackendKind::TypeScript);
        assert_eq!(BackendKind::from_flag("babel"), BackendKind::Transform);
        assert_eq!(BackendKind::from_flag(""), BackendKind::Transform);
    }

    #[test]
    fn default_extensions_per_kind() {
        assert_eq!(BackendKind::TypeScript.default_extensions(), vec!["ts"]);
        assert_eq!(BackendKind::Transform.default_extensions(), vec!["js"]);
    }

    #[test]
    fn retain_lines_defaults_on() {
        assert!(BackendOptions::default().retain_lines);
    }

    #[test]
    fn build_selects_variant() {
        let ts = BackendKind::TypeScript.build(passthrough_fn(), BackendOptions::default());
        assert_eq!(ts.name(), "typescript");

        let tr = BackendKind::Transform.build(passthrough_fn(), BackendOptions::default());
        assert_eq!(tr.name(), "transform");
    }
}
