//! Validation errors raised when a controller is built from bad settings.

use crate::stance::Stance;

/// Errors produced by [`LocomotionSettings::validate`](crate::LocomotionSettings::validate)
/// and [`StanceProfiles::validate`](crate::StanceProfiles::validate).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    /// A setting is NaN or infinite.
    #[error("{field} must be finite")]
    NonFinite {
        /// Dotted path of the offending field.
        field: &'static str,
    },

    /// A setting that must be zero or greater is negative.
    #[error("{field} must not be negative, got {value}")]
    Negative {
        /// Dotted path of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// The pitch clamp range is empty.
    #[error("pitch clamp is inverted: min {min} > max {max}")]
    InvertedPitchClamp {
        /// Lower pitch bound in degrees.
        min: f32,
        /// Upper pitch bound in degrees.
        max: f32,
    },

    /// The terminal fall speed points upward.
    #[error("gravity terminal speed must be zero or negative, got {0}")]
    PositiveTerminalSpeed(f32),

    /// A stance profile has a collider or camera height of zero or less.
    #[error("{stance:?} profile {field} must be positive, got {value}")]
    NonPositiveHeight {
        /// Which profile failed.
        stance: Stance,
        /// Which height field failed.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// The character's collision radius is zero, negative, or not finite.
    #[error("collision radius must be positive, got {0}")]
    NonPositiveRadius(f32),
}

/// Reject NaN and infinities.
pub(crate) fn check_finite(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::NonFinite { field })
    }
}

/// Reject NaN, infinities and values below zero.
pub(crate) fn check_non_negative(field: &'static str, value: f32) -> Result<(), SettingsError> {
    check_finite(field, value)?;
    if value < 0.0 {
        return Err(SettingsError::Negative { field, value });
    }
    Ok(())
}
