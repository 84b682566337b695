//! Configuration for the Strider locomotion controller.
//!
//! Settings persist to disk as a RON file, `strider.ron`. CLI flags parsed
//! with clap override the loaded values, changed files can be picked up with
//! [`Config::reload`], and every load is validated before it is handed out.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE_NAME, CharacterConfig, Config, DebugConfig, default_config_dir};
pub use error::ConfigError;
