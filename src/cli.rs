// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pollwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pollwatch",
    version,
    about = "Watch files for changes by polling modification times.",
    long_about = None
)]
pub struct CliArgs {
    /// Glob patterns to watch, relative to the watch root.
    ///
    /// A pattern naming a directory watches every file inside it. When given,
    /// these replace the `[watch].patterns` list from the config file.
    #[arg(value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Glob patterns to exclude from the watch set.
    ///
    /// When given, these replace the `[watch].exclude` list from the config
    /// file.
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Poll interval in seconds (fractional allowed, e.g. 0.25).
    #[arg(long, value_name = "SECS")]
    pub interval: Option<f64>,

    /// Invoke the notification callback once, with no changes, before the
    /// first poll.
    #[arg(long)]
    pub immediate: bool,

    /// Directory the watch patterns are resolved against.
    ///
    /// Default: the current working directory.
    #[arg(long, value_name = "PATH")]
    pub root: Option<String>,

    /// Path to an optional config file (TOML).
    ///
    /// Default: `Pollwatch.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `POLLWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve the watch set once, print the matched paths, and exit.
    #[arg(long)]
    pub list: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
