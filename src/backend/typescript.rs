//! TypeScript-variant backend adapter
//!
//! Transpiles to a fixed target level (owned by the injected transpiler)
//! and collects structured diagnostics. Outputs carry the `.js` extension;
//! the caller performs the actual rewrite on the output path.

use std::path::Path;

use super::{passthrough_fn, BackendOptions, CompileError, CompilerBackend, TranspileFn};

/// TypeScript transpile backend
pub struct TypeScriptBackend {
    transpile: TranspileFn,
    options: BackendOptions,
}

impl TypeScriptBackend {
    /// Wrap an injected transpiler
    pub fn new(transpile: TranspileFn) -> Self {
        Self {
            transpile,
            // Line retention is a transform-backend option; the TypeScript
            // variant never requests it.
            options: BackendOptions {
                retain_lines: false,
            },
        }
    }

    /// Identity transpiler (pure mirroring with extension rewrite)
    pub fn passthrough() -> Self {
        Self::new(passthrough_fn())
    }
}

impl CompilerBackend for TypeScriptBackend {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn output_extension(&self, _input: &str) -> String {
        "js".to_string()
    }

    fn compile(&self, source: &str, file: &Path) -> Result<String, CompileError> {
        (self.transpile)(source, file, &self.options).map_err(|diagnostics| {
            // First diagnostic wins; positions are already 1-based.
            let message = match diagnostics.first() {
                Some(d) => format!("{} ({},{})", d.message, d.line, d.character),
                None => "transpile failed without diagnostics".to_string(),
            };
            CompileError { message }
        })
    }
}
