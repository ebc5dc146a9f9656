// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod watch;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::Settings;
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::{spawn_watcher, PathResolver, StdoutHandler, WatchOptions};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and CLI merging
/// - pattern compilation / path resolution
/// - the poll-loop watcher task
/// - Ctrl-C handling (graceful stop + drain)
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = Settings::from_cli(&args)?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let resolver = PathResolver::new(
        Arc::clone(&fs),
        settings.root.clone(),
        &settings.watch,
        &settings.exclude,
    )?;

    if args.list {
        print_watch_list(&resolver);
        return Ok(());
    }

    let options = WatchOptions {
        interval: settings.interval,
        immediate: settings.immediate,
    };

    let (handle, join) = spawn_watcher(fs, resolver, options, StdoutHandler);

    // Ctrl-C → graceful stop; the loop drains trailing changes before exiting.
    {
        let handle = handle.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("Ctrl-C received; stopping watch");
            let _ = handle.stop().await;
        });
    }

    join.await??;
    Ok(())
}

/// Simple `--list` output: resolve the watch set once and print it.
fn print_watch_list(resolver: &PathResolver) {
    let paths = resolver.resolve();
    println!("pollwatch list ({} paths):", paths.len());
    for path in paths {
        println!("  {}", path.display());
    }
}
