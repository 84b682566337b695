//! Look integration: yaw for the body, pitch for the camera pivot.
//!
//! Angles are kept in degrees. Positive yaw turns right (clockwise seen from
//! above). Positive pitch tilts the view downward, so upward look input
//! decreases pitch unless the vertical axis is inverted. Yaw is unbounded;
//! the rotation representation wraps it. Pitch is clamped every update.

use glam::{Quat, Vec2};

use crate::settings::ViewSettings;

/// Accumulated look angles.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewIntegrator {
    yaw: f32,
    pitch: f32,
}

impl ViewIntegrator {
    /// Start facing `yaw` with `pitch` clamped to the settings' range.
    pub fn new(yaw: f32, pitch: f32, settings: &ViewSettings) -> Self {
        Self {
            yaw,
            pitch: pitch.clamp(settings.pitch_min, settings.pitch_max),
        }
    }

    /// Body heading in degrees.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Camera pitch in degrees.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Apply one frame of look input.
    pub fn integrate(&mut self, settings: &ViewSettings, look: Vec2, dt: f32) {
        let dx = if settings.inverted_x { -look.x } else { look.x };
        let dy = if settings.inverted_y { look.y } else { -look.y };
        self.yaw += settings.sensitivity_x * dx * dt;
        self.pitch += settings.sensitivity_y * dy * dt;
        self.pitch = self.pitch.clamp(settings.pitch_min, settings.pitch_max);
    }

    /// Rotation of the body about the up axis. Local forward is `-Z`.
    #[must_use]
    pub fn body_rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw.to_radians())
    }

    /// Rotation of the camera pivot relative to the body.
    #[must_use]
    pub fn camera_rotation(&self) -> Quat {
        Quat::from_rotation_x(-self.pitch.to_radians())
    }
}
