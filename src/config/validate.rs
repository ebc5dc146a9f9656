// src/config/validate.rs

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PollwatchError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::PollwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.watch, raw.poll))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_interval(cfg.poll.interval)?;
    validate_patterns("watch.patterns", &cfg.watch.patterns)?;
    validate_patterns("watch.exclude", &cfg.watch.exclude)?;
    Ok(())
}

/// Shared with the CLI merge path, which may override the file's interval.
pub fn validate_interval(interval: f64) -> Result<()> {
    if !interval.is_finite() || interval <= 0.0 {
        return Err(PollwatchError::ConfigError(format!(
            "[poll].interval must be a positive number of seconds (got {interval})"
        )));
    }
    Ok(())
}

fn validate_patterns(field: &str, patterns: &[String]) -> Result<()> {
    for pat in patterns {
        Glob::new(pat).map_err(|err| {
            PollwatchError::ConfigError(format!("{field} contains invalid glob '{pat}': {err}"))
        })?;
    }
    Ok(())
}
