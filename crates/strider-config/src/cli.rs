//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Strider command-line arguments.
///
/// CLI values override settings loaded from `strider.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "strider", about = "Strider locomotion demo")]
pub struct CliArgs {
    /// Horizontal look sensitivity.
    #[arg(long)]
    pub sensitivity_x: Option<f32>,

    /// Vertical look sensitivity.
    #[arg(long)]
    pub sensitivity_y: Option<f32>,

    /// Invert horizontal look.
    #[arg(long)]
    pub invert_x: Option<bool>,

    /// Invert vertical look.
    #[arg(long)]
    pub invert_y: Option<bool>,

    /// Sprint only while the sprint input is held.
    #[arg(long)]
    pub sprint_hold: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of simulation frames the demo runs.
    #[arg(long)]
    pub frames: Option<u32>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let view = &mut self.locomotion.view;
        if let Some(x) = args.sensitivity_x {
            view.sensitivity_x = x;
        }
        if let Some(y) = args.sensitivity_y {
            view.sensitivity_y = y;
        }
        if let Some(invert) = args.invert_x {
            view.inverted_x = invert;
        }
        if let Some(invert) = args.invert_y {
            view.inverted_y = invert;
        }
        if let Some(hold) = args.sprint_hold {
            self.locomotion.movement.sprint_hold = hold;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            sensitivity_x: Some(2.5),
            sensitivity_y: None,
            invert_x: None,
            invert_y: Some(true),
            sprint_hold: Some(true),
            log_level: Some("debug".to_string()),
            config: None,
            frames: None,
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.locomotion.view.sensitivity_x, 2.5);
        assert!(config.locomotion.view.inverted_y);
        assert!(config.locomotion.movement.sprint_hold);
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert_eq!(config.locomotion.view.sensitivity_y, 12.0);
        assert!(!config.locomotion.view.inverted_x);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::try_parse_from([
            "strider",
            "--sensitivity-y",
            "7",
            "--invert-x",
            "true",
            "--frames",
            "600",
            "--config",
            "/tmp/strider",
        ])
        .unwrap();
        assert_eq!(args.sensitivity_y, Some(7.0));
        assert_eq!(args.invert_x, Some(true));
        assert_eq!(args.frames, Some(600));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/strider")));
        assert_eq!(args.sensitivity_x, None);
    }
}
