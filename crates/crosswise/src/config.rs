//! Arena configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) yields a
//! playable setup:
//!
//! ```toml
//! player_name = "Ada"
//!
//! [ai]
//! min_delay_ms = 500
//! max_delay_ms = 1000
//!
//! [ai.medium]
//! smart = 0.6
//! block = 0.7
//! center = 0.5
//!
//! [hints]
//! display_ms = 5000
//! ```

use crate::ConfigError;
use crosswise_tictactoe::MediumOdds;
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CROSSWISE_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ArenaConfig {
    /// Name announced to the matchmaker in live matches.
    #[serde(default = "default_player_name")]
    #[setters(into)]
    player_name: String,

    /// Computer opponent tuning.
    #[serde(default)]
    ai: AiConfig,

    /// Hint display tuning.
    #[serde(default)]
    hints: HintConfig,
}

/// Computer opponent tuning.
#[derive(Debug, Clone, Copy, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct AiConfig {
    /// Shortest "thinking" pause before the computer replies.
    #[serde(default = "default_min_delay_ms")]
    min_delay_ms: u64,

    /// Longest "thinking" pause before the computer replies.
    #[serde(default = "default_max_delay_ms")]
    max_delay_ms: u64,

    /// Probabilities for the medium strategy.
    #[serde(default)]
    medium: MediumOdds,
}

/// Hint display tuning.
#[derive(Debug, Clone, Copy, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct HintConfig {
    /// How long a hint stays visible before hiding itself.
    #[serde(default = "default_display_ms")]
    display_ms: u64,
}

fn default_player_name() -> String {
    "Player".to_string()
}

fn default_min_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    1000
}

fn default_display_ms() -> u64 {
    5000
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            player_name: default_player_name(),
            ai: AiConfig::default(),
            hints: HintConfig::default(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            medium: MediumOdds::default(),
        }
    }
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            display_ms: default_display_ms(),
        }
    }
}

impl HintConfig {
    /// Display time as a [`Duration`].
    pub fn display_for(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }
}

impl ArenaConfig {
    /// Parses and validates configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        debug!(?config, "Config parsed");
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!("Failed to read config file: {}", e))
        })?;

        let config = Self::from_toml(&content)?;
        info!(player_name = %config.player_name, "Config loaded successfully");
        Ok(config)
    }

    /// Loads from `path`, else from `$CROSSWISE_CONFIG`, else defaults.
    #[instrument]
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        match path.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from)) {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Checks ranges the type system cannot express.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ai.min_delay_ms > self.ai.max_delay_ms {
            return Err(ConfigError::new(format!(
                "ai.min_delay_ms ({}) exceeds ai.max_delay_ms ({})",
                self.ai.min_delay_ms, self.ai.max_delay_ms
            )));
        }

        let odds = self.ai.medium;
        for (name, value) in [
            ("smart", odds.smart),
            ("block", odds.block),
            ("center", odds.center),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::new(format!(
                    "ai.medium.{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.player_name.trim().is_empty() {
            return Err(ConfigError::new("player_name must not be empty"));
        }

        Ok(())
    }
}
