//! Game and tick configuration.
//!
//! Configuration is plain JSON. Every field has a default, so a partial file
//! (or none at all) is valid:
//!
//! ```
//! use sable_engine::config::GameConfig;
//!
//! let config = GameConfig::from_json_str(r#"{ "fullscreen": true, "tick": { "fps_limit": 30 } }"#).unwrap();
//! assert!(config.fullscreen);
//! assert_eq!(config.window_width, 800);
//! assert_eq!(config.tick.fps_limit, 30);
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Errors produced while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// TickConfig
// ---------------------------------------------------------------------------

/// Per-frame timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Simulation step in seconds handed to every system. Must be positive
    /// and finite.
    pub fixed_dt: f64,
    /// Upper bound on frames per second when pacing is enabled. 0 disables
    /// the limit.
    pub fps_limit: u32,
    /// Headless mode: never sleep between frames.
    pub headless: bool,
}

impl Default for TickConfig {
    /// 60 Hz step and frame limit, pacing on.
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            fps_limit: 60,
            headless: false,
        }
    }
}

impl TickConfig {
    /// Wall-clock length of one frame, or `None` when unlimited.
    pub fn frame_budget(&self) -> Option<Duration> {
        (self.fps_limit > 0).then(|| Duration::from_secs(1) / self.fps_limit)
    }

    /// How long to sleep after a frame that took `elapsed`.
    ///
    /// `None` when there is no limit, when headless, or when the frame
    /// already used up its budget.
    pub fn time_to_wait(&self, elapsed: Duration) -> Option<Duration> {
        if self.headless {
            return None;
        }
        self.frame_budget()?
            .checked_sub(elapsed)
            .filter(|wait| !wait.is_zero())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_dt > 0.0 && self.fixed_dt.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "fixed_dt must be positive and finite, got {}",
                self.fixed_dt
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Top-level configuration consumed by the game driver.
///
/// The window fields are carried for the presentation layer; the core never
/// opens a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub fullscreen: bool,
    pub tick: TickConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            fullscreen: false,
            tick: TickConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        self.tick.validate()
    }
}
