//! Tuning values for the locomotion controller.
//!
//! Settings are plain data supplied at construction and never mutated by the
//! controller. Every struct is `#[serde(default)]` so partially written
//! config files fill the gaps from [`Default`].

use serde::{Deserialize, Serialize};

use crate::error::{SettingsError, check_finite, check_non_negative};

/// Forward axis value at or below which sprinting cannot be held.
pub const SPRINT_FORWARD_THRESHOLD: f32 = 0.2;

/// Downward per-frame speed kept while grounded so ground contact stays detectable.
pub const GROUNDED_BIAS: f32 = -0.1;

/// Extra gap applied at both ends of a stance clearance capsule.
pub const STANCE_CHECK_MARGIN: f32 = 0.05;

/// All locomotion tuning, grouped by the integrator that reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionSettings {
    /// Look sensitivity, inversion and pitch limits.
    pub view: ViewSettings,
    /// Walk/run speeds, sprint behavior and horizontal smoothing.
    pub movement: MovementSettings,
    /// Jump impulse strength and decay.
    pub jump: JumpSettings,
    /// Gravity accumulation.
    pub gravity: GravitySettings,
    /// Speed multipliers per stance and while airborne.
    pub effectors: SpeedEffectors,
    /// Posture animation and clearance probing.
    pub stance: StanceSettings,
}

/// Look input settings. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Degrees of yaw per unit of horizontal look input per second.
    pub sensitivity_x: f32,
    /// Degrees of pitch per unit of vertical look input per second.
    pub sensitivity_y: f32,
    /// Invert horizontal look.
    pub inverted_x: bool,
    /// Invert vertical look.
    pub inverted_y: bool,
    /// Lowest pitch (most upward view) in degrees.
    pub pitch_min: f32,
    /// Highest pitch (most downward view) in degrees.
    pub pitch_max: f32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            sensitivity_x: 12.0,
            sensitivity_y: 12.0,
            inverted_x: false,
            inverted_y: false,
            pitch_min: -50.0,
            pitch_max: 80.0,
        }
    }
}

/// Horizontal movement settings. Speeds are meters per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    /// Sprint lasts only while the sprint input is held.
    pub sprint_hold: bool,
    /// Smoothing time constant while grounded.
    pub grounded_smoothing: f32,
    /// Smoothing time constant while airborne.
    pub falling_smoothing: f32,
    /// Forward speed while sprinting.
    pub run_forward: f32,
    /// Strafe speed while sprinting.
    pub run_strafe: f32,
    /// Forward speed while walking.
    pub walk_forward: f32,
    /// Backward speed while walking.
    pub walk_backward: f32,
    /// Strafe speed while walking.
    pub walk_strafe: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            sprint_hold: false,
            grounded_smoothing: 0.35,
            falling_smoothing: 0.75,
            run_forward: 6.0,
            run_strafe: 5.0,
            walk_forward: 4.0,
            walk_backward: 2.0,
            walk_strafe: 3.0,
        }
    }
}

/// Jump settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpSettings {
    /// Initial upward impulse, in meters per second.
    pub height: f32,
    /// Time constant with which the impulse relaxes to zero.
    pub falloff: f32,
}

impl Default for JumpSettings {
    fn default() -> Self {
        Self {
            height: 6.0,
            falloff: 0.35,
        }
    }
}

/// Gravity accumulation. `vertical_speed` is a per-frame displacement, so
/// `amount` is how much that displacement grows each second of free fall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravitySettings {
    /// Downward speed gained per second while airborne.
    pub amount: f32,
    /// Terminal (most negative) vertical speed.
    pub terminal_speed: f32,
}

impl Default for GravitySettings {
    fn default() -> Self {
        Self {
            amount: 0.16,
            terminal_speed: -1.0,
        }
    }
}

/// Multipliers applied to base speeds. Standing on the ground is always 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedEffectors {
    /// Multiplier while crouched.
    pub crouch: f32,
    /// Multiplier while prone.
    pub prone: f32,
    /// Multiplier while airborne, regardless of stance.
    pub falling: f32,
}

impl Default for SpeedEffectors {
    fn default() -> Self {
        Self {
            crouch: 0.6,
            prone: 0.3,
            falling: 0.5,
        }
    }
}

/// Posture settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StanceSettings {
    /// Time constant for eye height and collider envelope interpolation.
    pub smoothing: f32,
    /// Extra gap at both ends of the clearance capsule.
    pub clearance_margin: f32,
}

impl Default for StanceSettings {
    fn default() -> Self {
        Self {
            smoothing: 0.12,
            clearance_margin: STANCE_CHECK_MARGIN,
        }
    }
}

impl LocomotionSettings {
    /// Check every value for sanity. Called by the controller constructor.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let view = &self.view;
        check_finite("view.sensitivity_x", view.sensitivity_x)?;
        check_finite("view.sensitivity_y", view.sensitivity_y)?;
        check_finite("view.pitch_min", view.pitch_min)?;
        check_finite("view.pitch_max", view.pitch_max)?;
        if view.pitch_min > view.pitch_max {
            return Err(SettingsError::InvertedPitchClamp {
                min: view.pitch_min,
                max: view.pitch_max,
            });
        }

        let m = &self.movement;
        check_non_negative("movement.grounded_smoothing", m.grounded_smoothing)?;
        check_non_negative("movement.falling_smoothing", m.falling_smoothing)?;
        check_non_negative("movement.run_forward", m.run_forward)?;
        check_non_negative("movement.run_strafe", m.run_strafe)?;
        check_non_negative("movement.walk_forward", m.walk_forward)?;
        check_non_negative("movement.walk_backward", m.walk_backward)?;
        check_non_negative("movement.walk_strafe", m.walk_strafe)?;

        check_non_negative("jump.height", self.jump.height)?;
        check_non_negative("jump.falloff", self.jump.falloff)?;

        check_non_negative("gravity.amount", self.gravity.amount)?;
        check_finite("gravity.terminal_speed", self.gravity.terminal_speed)?;
        if self.gravity.terminal_speed > 0.0 {
            return Err(SettingsError::PositiveTerminalSpeed(
                self.gravity.terminal_speed,
            ));
        }

        check_non_negative("effectors.crouch", self.effectors.crouch)?;
        check_non_negative("effectors.prone", self.effectors.prone)?;
        check_non_negative("effectors.falling", self.effectors.falling)?;

        check_non_negative("stance.smoothing", self.stance.smoothing)?;
        check_non_negative("stance.clearance_margin", self.stance.clearance_margin)?;
        Ok(())
    }
}
