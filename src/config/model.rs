// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [watch]
/// patterns = ["src/**/*.rs", "assets"]
/// exclude = ["src/**/*.tmp.rs"]
///
/// [poll]
/// interval = 0.5
/// immediate = false
/// ```
///
/// All sections are optional and have reasonable defaults. This is the raw
/// deserialization target; use [`ConfigFile`] (via `TryFrom`) for a
/// validated value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Watch/exclude pattern lists from `[watch]`.
    #[serde(default)]
    pub watch: WatchSection,

    /// Polling behaviour from `[poll]`.
    #[serde(default)]
    pub poll: PollSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchSection {
    /// Glob patterns selecting the files to watch. May be empty here when
    /// the patterns come from the command line instead.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Glob patterns removed from the watch set.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// `[poll]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PollSection {
    /// Poll interval in seconds; fractional values allowed.
    #[serde(default = "default_interval")]
    pub interval: f64,

    /// Whether to fire one empty notification before the first poll.
    #[serde(default)]
    pub immediate: bool,
}

fn default_interval() -> f64 {
    1.0
}

impl Default for PollSection {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            immediate: false,
        }
    }
}

/// Validated configuration.
///
/// Constructed through `TryFrom<RawConfigFile>` (see `validate.rs`), so any
/// value of this type has a sane interval and compilable glob patterns.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    watch: WatchSection,
    poll: PollSection,
}

impl ConfigFile {
    /// Construct without validation. Only `validate.rs` and tests that have
    /// already established the invariants should call this.
    pub fn new_unchecked(watch: WatchSection, poll: PollSection) -> Self {
        Self { watch, poll }
    }

    pub fn watch(&self) -> &WatchSection {
        &self.watch
    }

    pub fn poll(&self) -> &PollSection {
        &self.poll
    }
}
