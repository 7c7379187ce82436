//! Babel-style transform backend adapter
//!
//! Transforms with a fixed preset configuration owned by the injected
//! transpiler. Keeps the input extension; by default asks the transpiler to
//! retain original line numbers so stack traces stay accurate.

use std::path::Path;

use super::{passthrough_fn, BackendOptions, CompileError, CompilerBackend, TranspileFn};

/// Transform backend
pub struct TransformBackend {
    transform: TranspileFn,
    options: BackendOptions,
}

impl TransformBackend {
    /// Wrap an injected transform function
    pub fn new(transform: TranspileFn) -> Self {
        Self {
            transform,
            options: BackendOptions::default(),
        }
    }

    /// Identity transform (pure mirroring)
    pub fn passthrough() -> Self {
        Self::new(passthrough_fn())
    }

    /// Replace the backend options
    pub fn with_options(mut self, options: BackendOptions) -> Self {
        self.options = options;
        self
    }

    /// Set whether original line numbers are retained (default true)
    pub fn with_retain_lines(mut self, retain_lines: bool) -> Self {
        self.options.retain_lines = retain_lines;
        self
    }
}

impl CompilerBackend for TransformBackend {
    fn name(&self) -> &'static str {
        "transform"
    }

    fn output_extension(&self, input: &str) -> String {
        input.to_string()
    }

    fn compile(&self, source: &str, file: &Path) -> Result<String, CompileError> {
        (self.transform)(source, file, &self.options).map_err(|diagnostics| {
            let message = match diagnostics.first() {
                Some(d) => d.message.clone(),
                None => "transform failed without diagnostics".to_string(),
            };
            CompileError { message }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Diagnostic;

    #[test]
    fn keeps_input_extension() {
        let backend = TransformBackend::passthrough();
        assert_eq!(backend.output_extension("js"), "js");
        assert_eq!(backend.output_extension("jsx"), "jsx");
    }

    #[test]
    fn forwards_retain_lines_to_transpiler() {
        let backend = TransformBackend::new(Box::new(|source, _, opts| {
            Ok(format!("retain={} {}", opts.retain_lines, source))
        }))
        .with_retain_lines(false);

        let out = backend.compile("x", Path::new("a.js")).unwrap();
        assert_eq!(out, "retain=false x");
    }

    #[test]
    fn error_message_is_first_diagnostic() {
        let backend =
            TransformBackend::new(Box::new(|_, _, _| Err(vec![Diagnostic::new("bad", 1, 1)])));
        let err = backend.compile("x", Path::new("a.js")).unwrap_err();
        assert_eq!(err.message, "bad");
    }
}
