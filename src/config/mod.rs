// src/config/mod.rs

//! Configuration loading and validation for pollwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants like interval sanity (`validate.rs`).
//! - Merge the file with command-line overrides into [`Settings`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, PollSection, RawConfigFile, WatchSection};

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::CliArgs;
use crate::errors::{PollwatchError, Result};

/// Effective watch settings after merging the config file with CLI flags.
///
/// Precedence: CLI pattern/exclude lists replace the file's lists when
/// non-empty; `--interval` overrides `[poll].interval`; `--immediate` ORs
/// with `[poll].immediate`.
#[derive(Debug, Clone)]
pub struct Settings {
    pub watch: Vec<String>,
    pub exclude: Vec<String>,
    pub interval: Duration,
    pub immediate: bool,
    pub root: PathBuf,
}

impl Settings {
    /// Resolve the effective settings for this invocation.
    ///
    /// `--config` names a file that must load; without the flag,
    /// `Pollwatch.toml` is used when present and defaults otherwise.
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let cfg = match &args.config {
            Some(path) => load_and_validate(path)?,
            None => {
                let path = default_config_path();
                if path.exists() {
                    load_and_validate(&path)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        Self::merge(args, &cfg)
    }

    /// Merge already-loaded config with CLI flags.
    pub fn merge(args: &CliArgs, cfg: &ConfigFile) -> Result<Self> {
        let watch = if args.patterns.is_empty() {
            cfg.watch().patterns.clone()
        } else {
            args.patterns.clone()
        };
        if watch.is_empty() {
            return Err(PollwatchError::ConfigError(
                "nothing to watch: give patterns on the command line or in [watch].patterns"
                    .to_string(),
            ));
        }

        let exclude = if args.exclude.is_empty() {
            cfg.watch().exclude.clone()
        } else {
            args.exclude.clone()
        };

        let interval_secs = args.interval.unwrap_or(cfg.poll().interval);
        validate::validate_interval(interval_secs)?;
        let interval = Duration::try_from_secs_f64(interval_secs).map_err(|err| {
            PollwatchError::ConfigError(format!("invalid poll interval {interval_secs}: {err}"))
        })?;

        let root = match &args.root {
            Some(root) => PathBuf::from(root),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };

        Ok(Self {
            watch,
            exclude,
            interval,
            immediate: args.immediate || cfg.poll().immediate,
            root,
        })
    }
}
