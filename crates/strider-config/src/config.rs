//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strider_locomotion::{
    LocomotionSettings, ObstructionMask, SettingsError, Stance, StanceProfiles,
};

use crate::error::ConfigError;

/// Name of the config file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "strider.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Look, movement, jump, gravity and stance tuning.
    pub locomotion: LocomotionSettings,
    /// Camera and collider envelope per stance.
    pub stances: StanceProfiles,
    /// Collision body settings.
    pub character: CharacterConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Collision body configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CharacterConfig {
    /// Capsule radius in meters.
    pub radius: f32,
    /// Collision layers that block stance changes.
    pub obstruction_mask: ObstructionMask,
    /// Stance the character spawns in.
    pub initial_stance: Stance,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level filter (e.g., "debug", "info,strider_physics=trace").
    pub log_level: String,
    /// Frames between posture reports in the demo.
    pub report_interval: u32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            radius: 0.3,
            obstruction_mask: ObstructionMask::ALL,
            initial_stance: Stance::Stand,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            report_interval: 60,
        }
    }
}

/// Platform config directory for Strider, or the working directory when the
/// platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("strider"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// --- Validate / Load / Save / Reload ---

impl Config {
    /// Reject settings the controller cannot run with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.locomotion.validate()?;
        self.stances.validate()?;
        let radius = self.character.radius;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(SettingsError::NonPositiveRadius(radius));
        }
        Ok(())
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `strider.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    ///
    /// A changed file that fails validation is an error; the caller keeps
    /// running on the current config.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE_NAME))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }
}
