//! Gravity accumulation and jump impulse decay.
//!
//! `vertical_speed` is a per-frame displacement that grows downward by
//! `gravity.amount * dt` each airborne frame until it reaches the terminal
//! speed. On the ground it is held at a small negative bias so the collision
//! layer keeps reporting contact. The jump impulse is a separate velocity
//! vector that relaxes toward zero every frame.

use glam::Vec3;

use crate::settings::{GROUNDED_BIAS, GravitySettings};
use crate::smoothing::Smoothed;

/// Vertical motion state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerticalIntegrator {
    vertical_speed: f32,
    jump_impulse: Smoothed<Vec3>,
}

impl VerticalIntegrator {
    /// At rest with no impulse.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current gravity accumulator.
    pub fn vertical_speed(&self) -> f32 {
        self.vertical_speed
    }

    /// Current jump impulse.
    pub fn jump_impulse(&self) -> Vec3 {
        self.jump_impulse.value()
    }

    /// Overwrite the gravity accumulator.
    pub fn set_vertical_speed(&mut self, speed: f32) {
        self.vertical_speed = speed;
    }

    /// Start a jump: impulse straight up, gravity accumulator cleared.
    pub fn launch(&mut self, jump_height: f32) {
        self.jump_impulse.set(Vec3::Y * jump_height);
        self.vertical_speed = 0.0;
    }

    /// Update gravity for the frame and return the vertical displacement,
    /// including the jump impulse contribution.
    pub fn integrate(&mut self, gravity: &GravitySettings, grounded: bool, dt: f32) -> Vec3 {
        if !grounded && self.vertical_speed > gravity.terminal_speed {
            self.vertical_speed =
                (self.vertical_speed - gravity.amount * dt).max(gravity.terminal_speed);
        }
        if grounded && self.vertical_speed < GROUNDED_BIAS {
            self.vertical_speed = GROUNDED_BIAS;
        }
        Vec3::Y * self.vertical_speed + self.jump_impulse.value() * dt
    }

    /// Relax the jump impulse toward zero.
    pub fn relax_jump(&mut self, falloff: f32, dt: f32) {
        self.jump_impulse.approach(Vec3::ZERO, falloff, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gravity() -> GravitySettings {
        GravitySettings {
            amount: 10.0,
            terminal_speed: -20.0,
        }
    }

    #[test]
    fn test_airborne_gravity_accumulates_then_clamps() {
        let mut v = VerticalIntegrator::new();
        let mut speeds = Vec::new();
        for _ in 0..3 {
            v.integrate(&gravity(), false, 1.0);
            speeds.push(v.vertical_speed());
        }
        assert_eq!(speeds, vec![-10.0, -20.0, -20.0]);
    }

    #[test]
    fn test_terminal_speed_not_overshot() {
        let mut v = VerticalIntegrator::new();
        v.set_vertical_speed(-15.0);
        v.integrate(&gravity(), false, 1.0);
        assert_eq!(v.vertical_speed(), -20.0);
    }

    #[test]
    fn test_landing_resets_to_bias() {
        let mut v = VerticalIntegrator::new();
        v.set_vertical_speed(-12.0);
        v.integrate(&gravity(), true, 1.0 / 60.0);
        assert_eq!(v.vertical_speed(), GROUNDED_BIAS);
    }

    #[test]
    fn test_grounded_does_not_accumulate() {
        let mut v = VerticalIntegrator::new();
        v.integrate(&gravity(), true, 1.0);
        assert_eq!(v.vertical_speed(), 0.0);
    }

    #[test]
    fn test_launch_sets_impulse_and_clears_gravity() {
        let mut v = VerticalIntegrator::new();
        v.set_vertical_speed(-0.1);
        v.launch(5.0);
        assert_eq!(v.jump_impulse(), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(v.vertical_speed(), 0.0);
    }

    #[test]
    fn test_displacement_combines_gravity_and_impulse() {
        let mut v = VerticalIntegrator::new();
        v.launch(6.0);
        let d = v.integrate(&gravity(), false, 0.5);
        // Gravity -5 this frame, impulse 6 * 0.5.
        assert!((d.y - (-5.0 + 3.0)).abs() < 1e-6);
        assert_eq!(d.x, 0.0);
        assert_eq!(d.z, 0.0);
    }

    #[test]
    fn test_impulse_relaxes_monotonically_to_zero() {
        let mut v = VerticalIntegrator::new();
        v.launch(5.0);
        let mut previous = v.jump_impulse().y;
        for _ in 0..120 {
            v.relax_jump(0.35, 1.0 / 60.0);
            let y = v.jump_impulse().y;
            assert!(y >= 0.0, "impulse overshot to {y}");
            assert!(y <= previous);
            previous = y;
        }
        assert!(previous < 0.01);
    }
}
