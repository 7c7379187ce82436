//! External-process transpiler
//!
//! Builds a [`TranspileFn`] around an external program: source text goes in
//! on stdin, transformed text comes back on stdout, and a nonzero exit turns
//! stderr into a diagnostic. The relative filename is passed as the final
//! argument so the program can report it.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use super::{BackendOptions, Diagnostic, TranspileFn};

/// Transpiler backed by an external command
#[derive(Debug, Clone)]
pub struct CommandTranspiler {
    program: String,
    args: Vec<String>,
}

impl CommandTranspiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add a fixed argument passed on every invocation
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Check if the program is runnable at all
    pub fn check_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn run(&self, source: &str, file: &Path, options: &BackendOptions) -> Result<String, Vec<Diagnostic>> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if options.retain_lines {
            cmd.arg("--retain-lines");
        }
        cmd.arg(file)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let spawn_err = |e: std::io::Error| {
            vec![Diagnostic::new(
                format!("failed to run '{}': {}", self.program, e),
                1,
                1,
            )]
        };

        let mut child = cmd.spawn().map_err(spawn_err)?;

        // Feed stdin from its own thread while the parent drains stdout.
        // Writing the whole source before reading deadlocks once a streaming
        // child fills the stdout pipe. A write error here usually means the
        // child exited early; its status and stderr carry the real story.
        let stdin = child.stdin.take();
        let payload = source.as_bytes().to_vec();
        let feeder = std::thread::spawn(move || {
            if let Some(mut stdin) = stdin {
                let _ = stdin.write_all(&payload);
            }
        });
        let output = child.wait_with_output().map_err(spawn_err)?;
        let _ = feeder.join();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!(
                    "'{}' exited with {:?}",
                    self.program,
                    output.status.code()
                ),
                text => text.to_string(),
            };
            return Err(vec![Diagnostic::new(message, 1, 1)]);
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Convert into the opaque transpiler function backends expect
    pub fn into_fn(self) -> TranspileFn {
        Box::new(move |source, file, options| self.run(source, file, options))
    }
}
