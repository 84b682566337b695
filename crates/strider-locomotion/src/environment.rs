//! The narrow surface through which the controller touches the world.
//!
//! The controller never owns collision geometry. It asks an implementation of
//! [`CharacterEnvironment`] whether the body is grounded, where its feet are,
//! whether a capsule would overlap anything, and finally hands it the frame's
//! displacement to resolve against colliders.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Bit mask selecting which collision layers count as obstructions for
/// clearance checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObstructionMask(pub u32);

impl ObstructionMask {
    /// Every layer obstructs.
    pub const ALL: Self = Self(u32::MAX);
    /// Nothing obstructs; every clearance check passes.
    pub const NONE: Self = Self(0);

    /// True if any bit of `layers` is selected by this mask.
    #[must_use]
    pub fn intersects(self, layers: u32) -> bool {
        self.0 & layers != 0
    }
}

impl Default for ObstructionMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// World services consumed by the controller once per frame.
pub trait CharacterEnvironment {
    /// Whether the body is standing on something.
    fn is_grounded(&self) -> bool;

    /// Radius of the body's collision capsule.
    fn collision_radius(&self) -> f32;

    /// World position of the bottom of the body.
    fn feet_position(&self) -> Vec3;

    /// True if a capsule with segment `start..end` and `radius` overlaps any
    /// collider on a layer selected by `mask`.
    fn cast_capsule(&self, start: Vec3, end: Vec3, radius: f32, mask: ObstructionMask) -> bool;

    /// Apply a world-space displacement, resolving collisions.
    fn move_character(&mut self, displacement: Vec3);
}

/// Continuous input sampled for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Movement axes: `x` strafe (right positive), `y` forward (forward positive).
    pub movement: Vec2,
    /// Raw look delta: `x` horizontal, `y` vertical (up positive).
    pub look: Vec2,
    /// Elapsed frame time in seconds.
    pub dt: f32,
}

impl FrameInput {
    /// Input with movement and look, sampled over `dt` seconds.
    pub fn new(movement: Vec2, look: Vec2, dt: f32) -> Self {
        Self { movement, look, dt }
    }

    /// A frame with no input at all.
    pub fn idle(dt: f32) -> Self {
        Self {
            dt,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_intersection() {
        let mask = ObstructionMask(0b0110);
        assert!(mask.intersects(0b0010));
        assert!(!mask.intersects(0b1001));
        assert!(!ObstructionMask::NONE.intersects(u32::MAX));
        assert!(ObstructionMask::ALL.intersects(1));
    }

    #[test]
    fn test_idle_input_has_no_axes() {
        let input = FrameInput::idle(0.5);
        assert_eq!(input.movement, Vec2::ZERO);
        assert_eq!(input.look, Vec2::ZERO);
        assert_eq!(input.dt, 0.5);
    }
}
