//! mirrorc CLI - incremental transpile-and-mirror watcher
//!
//! Usage: mirrorc <COMMAND>
//!
//! Commands:
//!   watch   Watch the source tree and mirror it continuously
//!   run     Run a single pass and exit

mod cli;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::Parser;

use mirrorc::{
    BackendKind, BackendOptions, CommandTranspiler, CompilerBackend, Config, LocalFs, WatchEvent,
    WatchOptions, Watcher, DEFAULT_INTERVAL_MS,
};

use cli::{Cli, Commands, PassArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Watch(args) => cmd_watch(args, cli.json),
        Commands::Run(args) => cmd_run(args, cli.json),
    }
}

/// Merge CLI flags over `mirrorc.toml` and build the watcher
fn build_watcher(args: &PassArgs) -> Result<Watcher<LocalFs>> {
    let config = Config::load_or_default(&args.source)?;

    let source = args
        .source
        .canonicalize()
        .with_context(|| format!("source directory not found: {}", args.source.display()))?;

    let out = args
        .out
        .clone()
        .or(config.out)
        .unwrap_or_else(|| PathBuf::from("out"));
    // Create the output root up front so changed paths are absolute
    std::fs::create_dir_all(&out)
        .with_context(|| format!("cannot create output directory: {}", out.display()))?;
    let out = out.canonicalize()?;

    let backend_flag = args
        .backend
        .clone()
        .or(config.backend)
        .unwrap_or_default();
    let kind = BackendKind::from_flag(&backend_flag);

    let retain_lines = if args.no_retain_lines {
        false
    } else {
        config.retain_lines.unwrap_or(true)
    };

    let options = WatchOptions::new(source, out)
        .with_backend(kind)
        .with_interval(Duration::from_millis(
            args.interval_ms
                .or(config.interval_ms)
                .unwrap_or(DEFAULT_INTERVAL_MS),
        ))
        .with_extensions(
            args.extensions
                .clone()
                .or(config.extensions)
                .unwrap_or_default(),
        )
        .with_retain_lines(retain_lines)
        .with_log(args.log || config.log.unwrap_or(false));

    let backend: Box<dyn CompilerBackend> = match args.command.clone().or(config.command) {
        Some(program) => kind.build(
            CommandTranspiler::new(program).into_fn(),
            BackendOptions { retain_lines },
        ),
        // Without an external transpiler mirrorc is a pure mirror
        None => kind.build_passthrough(),
    };

    Ok(Watcher::new(options, backend, LocalFs::new()))
}

fn cmd_watch(args: PassArgs, json: bool) -> Result<()> {
    let mut watcher = build_watcher(&args)?;
    let log = watcher.options().log;

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    watcher.start(running, |event| render_event(&event, json, log))?;
    Ok(())
}

fn cmd_run(args: PassArgs, json: bool) -> Result<()> {
    let mut watcher = build_watcher(&args)?;
    let log = watcher.options().log;

    let changed = watcher.run_pass(&|event| render_event(&event, json, log))?;
    if !json {
        for path in &changed {
            println!("{}", path.display());
        }
    }

    if watcher.state().has_errors() {
        match watcher.state().last_error() {
            Some(error) => bail!("{error}"),
            None => bail!("pass finished with compile errors"),
        }
    }
    Ok(())
}

fn render_event(event: &WatchEvent, json: bool, log: bool) {
    if json {
        println!("{}", event.to_json());
        return;
    }

    let prefix = format!("[{}]", timestamp());
    match event {
        WatchEvent::WatchStarted {
            source,
            out,
            backend,
        } => {
            println!("{prefix} Watching {source} -> {out} ({backend})");
            println!("{prefix} Press Ctrl+C to stop");
        }
        WatchEvent::PassStarted => {}
        WatchEvent::FileCompiled {
            path,
            backend,
            elapsed_ms,
        } => {
            if log {
                println!("{prefix} Compiled {path} with {backend} in {elapsed_ms}ms");
            }
        }
        WatchEvent::FileCopied { .. } => {}
        WatchEvent::FileDeleted { path } => println!("{prefix} Deleted {path}"),
        WatchEvent::CompileFailed { path, message } => {
            eprintln!("{prefix} {path}: {message}");
        }
        WatchEvent::PassComplete { changed } => {
            if *changed > 0 {
                println!("{prefix} Pass complete: {changed} changed");
            }
        }
        WatchEvent::Error { message } => eprintln!("{prefix} Error: {message}"),
        WatchEvent::Shutdown => println!("{prefix} Watch stopped."),
    }
}

fn timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 86_400;
            let h = secs / 3600;
            let m = (secs % 3600) / 60;
            let s = secs % 60;
            format!("{h:02}:{m:02}:{s:02}")
        })
        .unwrap_or_else(|_| "00:00:00".to_string())
}
