/// Player configuration
use crate::error::{PlayerError, Result};
use cadence_playback::{PlaybackConfig, RepeatMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_search")]
    pub search: SearchSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_feedback")]
    pub feedback: FeedbackSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    /// redb database file
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,

    /// Keep everything in memory (nothing survives the process)
    #[serde(default)]
    pub in_memory: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Simulated catalog round trip
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default)]
    pub shuffle: bool,

    #[serde(default)]
    pub repeat: RepeatMode,

    /// How often the simulated device reports its position
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Virtual seconds that pass per wall-clock second on the simulated device
    #[serde(default = "default_simulation_speed")]
    pub simulation_speed: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedbackSettings {
    /// How long a track stays marked as recently added
    #[serde(default = "default_added_ttl_ms")]
    pub added_ttl_ms: u64,
}

impl PlayerConfig {
    /// Load configuration from `cadence.toml` (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(None, None)
    }

    /// Load configuration from an explicit file and/or environment map
    ///
    /// `path` falls back to [`DEFAULT_CONFIG_FILE`] when it exists. `env`
    /// replaces the process environment (used by tests). Environment keys
    /// look like `CADENCE_SEARCH__DEBOUNCE_MS`.
    pub fn load_from(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(PlayerError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with CADENCE_)
        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.storage.in_memory && self.storage.path.as_os_str().is_empty() {
            return Err(PlayerError::Config(
                "storage path is required (set CADENCE_STORAGE__PATH)".to_string(),
            ));
        }

        if self.playback.tick_ms == 0 {
            return Err(PlayerError::Config(
                "playback.tick_ms must be greater than zero".to_string(),
            ));
        }

        if !self.playback.simulation_speed.is_finite() || self.playback.simulation_speed <= 0.0 {
            return Err(PlayerError::Config(format!(
                "playback.simulation_speed must be positive, got {}",
                self.playback.simulation_speed
            )));
        }

        Ok(())
    }

    /// Initial transport settings (volume and mute are restored from storage)
    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            shuffled: self.playback.shuffle,
            repeat: self.playback.repeat,
            ..PlaybackConfig::default()
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    pub fn search_latency(&self) -> Duration {
        Duration::from_millis(self.search.latency_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.playback.tick_ms)
    }

    pub fn added_ttl(&self) -> Duration {
        Duration::from_millis(self.feedback.added_ttl_ms)
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        path: default_storage_path(),
        in_memory: false,
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./data/cadence.redb")
}

fn default_search() -> SearchSettings {
    SearchSettings {
        debounce_ms: default_debounce_ms(),
        latency_ms: default_latency_ms(),
    }
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_latency_ms() -> u64 {
    500
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        shuffle: false,
        repeat: RepeatMode::Off,
        tick_ms: default_tick_ms(),
        simulation_speed: default_simulation_speed(),
    }
}

fn default_tick_ms() -> u64 {
    250
}

fn default_simulation_speed() -> f64 {
    1.0
}

fn default_feedback() -> FeedbackSettings {
    FeedbackSettings {
        added_ttl_ms: default_added_ttl_ms(),
    }
}

fn default_added_ttl_ms() -> u64 {
    2000
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            search: default_search(),
            playback: default_playback(),
            feedback: default_feedback(),
        }
    }
}
