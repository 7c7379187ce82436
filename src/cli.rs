use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// mirrorc - incremental transpile-and-mirror watcher
#[derive(Parser, Debug)]
#[command(name = "mirrorc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output NDJSON events for CI
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the source tree and mirror it continuously
    Watch(PassArgs),

    /// Run a single pass and exit (nonzero when compile errors remain)
    Run(PassArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PassArgs {
    /// Source directory tree to read from
    #[arg(short, long, default_value = "src")]
    pub source: PathBuf,

    /// Output directory tree to write to (default "out", or `out` from
    /// mirrorc.toml)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Backend: "ts" for TypeScript, anything else for transform
    #[arg(short = 't', long = "type")]
    pub backend: Option<String>,

    /// Delay between passes in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Extensions eligible for transpilation (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// External transpiler program (source on stdin, output on stdout)
    #[arg(short, long)]
    pub command: Option<String>,

    /// Transform backend: do not retain original line numbers
    #[arg(long)]
    pub no_retain_lines: bool,

    /// Log a line per compiled file with elapsed time and backend name
    #[arg(short, long)]
    pub log: bool,
}
