//! Ground-relative horizontal movement with smoothed acceleration.

use glam::{Quat, Vec2, Vec3};

use crate::settings::{LocomotionSettings, SPRINT_FORWARD_THRESHOLD, SpeedEffectors};
use crate::smoothing::Smoothed;
use crate::stance::Stance;

/// Speed multiplier for the current ground and stance state.
///
/// Airborne overrides stance. Derived fresh each frame; never stored.
pub fn speed_multiplier(grounded: bool, stance: Stance, effectors: &SpeedEffectors) -> f32 {
    if !grounded {
        return effectors.falling;
    }
    match stance {
        Stance::Stand => 1.0,
        Stance::Crouch => effectors.crouch,
        Stance::Prone => effectors.prone,
    }
}

/// Result of one horizontal integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementStep {
    /// World-space horizontal displacement for the frame.
    pub displacement: Vec3,
    /// Multiplier applied to base speeds this frame.
    pub speed_multiplier: f32,
}

/// Smoothed body-local velocity plus the sprint flag.
///
/// Velocities are per-frame displacements: `x` strafe, `y` forward.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovementIntegrator {
    target: Vec2,
    velocity: Smoothed<Vec2>,
    sprinting: bool,
}

impl MovementIntegrator {
    /// At rest, walking.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether sprint speeds are in use.
    pub fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    /// Target local velocity computed on the last step.
    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Current smoothed local velocity.
    pub fn current(&self) -> Vec2 {
        self.velocity.value()
    }

    pub(crate) fn stop_sprint(&mut self) {
        self.sprinting = false;
    }

    pub(crate) fn toggle_sprint(&mut self) {
        self.sprinting = !self.sprinting;
    }

    /// Advance one frame.
    ///
    /// `axes` are `(strafe, forward)` in `[-1, 1]`; `rotation` is the body's
    /// yaw rotation used to express the result in world space.
    pub fn integrate(
        &mut self,
        settings: &LocomotionSettings,
        axes: Vec2,
        grounded: bool,
        stance: Stance,
        rotation: Quat,
        dt: f32,
    ) -> MovementStep {
        if axes.y <= SPRINT_FORWARD_THRESHOLD {
            self.sprinting = false;
        }

        let m = &settings.movement;
        // Running has no backward speed; sprint only survives forward input.
        let (forward_speed, strafe_speed) = if self.sprinting {
            (m.run_forward, m.run_strafe)
        } else if axes.y < 0.0 {
            (m.walk_backward, m.walk_strafe)
        } else {
            (m.walk_forward, m.walk_strafe)
        };

        let multiplier = speed_multiplier(grounded, stance, &settings.effectors);
        self.target = Vec2::new(
            strafe_speed * multiplier * axes.x,
            forward_speed * multiplier * axes.y,
        ) * dt;

        let smoothing = if grounded {
            m.grounded_smoothing
        } else {
            m.falling_smoothing
        };
        let local = self.velocity.approach(self.target, smoothing, dt);

        MovementStep {
            displacement: rotation * Vec3::new(local.x, 0.0, -local.y),
            speed_multiplier: multiplier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn settings() -> LocomotionSettings {
        LocomotionSettings::default()
    }

    fn step(
        integrator: &mut MovementIntegrator,
        axes: Vec2,
        grounded: bool,
        stance: Stance,
    ) -> MovementStep {
        integrator.integrate(&settings(), axes, grounded, stance, Quat::IDENTITY, DT)
    }

    #[test]
    fn test_multiplier_by_state() {
        let e = SpeedEffectors::default();
        assert_eq!(speed_multiplier(true, Stance::Stand, &e), 1.0);
        assert_eq!(speed_multiplier(true, Stance::Crouch, &e), e.crouch);
        assert_eq!(speed_multiplier(true, Stance::Prone, &e), e.prone);
        assert_eq!(speed_multiplier(false, Stance::Crouch, &e), e.falling);
        assert_eq!(speed_multiplier(false, Stance::Stand, &e), e.falling);
    }

    #[test]
    fn test_walk_target_scaled_by_dt() {
        let mut m = MovementIntegrator::new();
        step(&mut m, Vec2::new(0.5, 1.0), true, Stance::Stand);
        let s = settings().movement;
        let expected = Vec2::new(s.walk_strafe * 0.5, s.walk_forward) * DT;
        assert!((m.target() - expected).length() < 1e-7);
    }

    #[test]
    fn test_backward_walk_uses_backward_speed() {
        let mut m = MovementIntegrator::new();
        step(&mut m, Vec2::new(0.0, -1.0), true, Stance::Stand);
        let expected = -settings().movement.walk_backward * DT;
        assert!((m.target().y - expected).abs() < 1e-7);
    }

    #[test]
    fn test_sprint_uses_run_speeds() {
        let mut m = MovementIntegrator::new();
        m.toggle_sprint();
        step(&mut m, Vec2::new(1.0, 1.0), true, Stance::Stand);
        assert!(m.is_sprinting());
        let s = settings().movement;
        assert!((m.target().x - s.run_strafe * DT).abs() < 1e-7);
        assert!((m.target().y - s.run_forward * DT).abs() < 1e-7);
    }

    #[test]
    fn test_sprint_cleared_at_or_below_threshold() {
        for forward in [0.2, 0.0, -1.0, 0.1] {
            let mut m = MovementIntegrator::new();
            m.toggle_sprint();
            step(&mut m, Vec2::new(0.0, forward), true, Stance::Stand);
            assert!(!m.is_sprinting(), "still sprinting at forward={forward}");
        }
    }

    #[test]
    fn test_sprint_survives_above_threshold() {
        let mut m = MovementIntegrator::new();
        m.toggle_sprint();
        step(&mut m, Vec2::new(0.0, 0.21), true, Stance::Stand);
        assert!(m.is_sprinting());
    }

    #[test]
    fn test_crouch_slows_target() {
        let mut standing = MovementIntegrator::new();
        let mut crouched = MovementIntegrator::new();
        step(&mut standing, Vec2::Y, true, Stance::Stand);
        let s = step(&mut crouched, Vec2::Y, true, Stance::Crouch);
        assert_eq!(s.speed_multiplier, settings().effectors.crouch);
        assert!(crouched.target().y < standing.target().y);
    }

    #[test]
    fn test_idle_velocity_decays_without_reversing() {
        let mut m = MovementIntegrator::new();
        for _ in 0..60 {
            step(&mut m, Vec2::new(1.0, 1.0), true, Stance::Stand);
        }
        let mut previous = m.current();
        assert!(previous.x > 0.0 && previous.y > 0.0);
        for _ in 0..300 {
            step(&mut m, Vec2::ZERO, true, Stance::Stand);
            let v = m.current();
            assert!(v.x >= 0.0 && v.y >= 0.0, "reversed to {v}");
            assert!(v.x <= previous.x && v.y <= previous.y);
            previous = v;
        }
        assert!(previous.length() < 1e-4);
    }

    #[test]
    fn test_idle_after_strafe_reversal_never_flips_sign() {
        let mut m = MovementIntegrator::new();
        for _ in 0..60 {
            step(&mut m, Vec2::new(1.0, 1.0), true, Stance::Stand);
        }
        for _ in 0..14 {
            step(&mut m, Vec2::new(-1.0, 1.0), true, Stance::Stand);
        }
        let start = m.current();
        for _ in 0..300 {
            step(&mut m, Vec2::ZERO, true, Stance::Stand);
            let v = m.current();
            assert!(v.x * start.x >= 0.0, "strafe reversed: {} -> {}", start.x, v.x);
            assert!(v.y * start.y >= 0.0, "forward reversed: {} -> {}", start.y, v.y);
        }
        assert!(m.current().length() < 1e-4);
    }

    #[test]
    fn test_air_response_is_slower_than_ground() {
        let mut ground = MovementIntegrator::new();
        let mut air = MovementIntegrator::new();
        step(&mut ground, Vec2::Y, true, Stance::Stand);
        air.integrate(
            &settings(),
            Vec2::Y,
            false,
            Stance::Stand,
            Quat::IDENTITY,
            DT,
        );
        let ground_fraction = ground.current().y / ground.target().y;
        let air_fraction = air.current().y / air.target().y;
        assert!(air_fraction < ground_fraction);
    }

    #[test]
    fn test_displacement_follows_body_rotation() {
        let mut m = MovementIntegrator::new();
        let rotation = Quat::from_rotation_y(-90_f32.to_radians());
        let mut last = Vec3::ZERO;
        for _ in 0..30 {
            last = m
                .integrate(&settings(), Vec2::Y, true, Stance::Stand, rotation, DT)
                .displacement;
        }
        assert!(last.x > 0.0);
        assert!(last.z.abs() < 1e-5);
        assert_eq!(last.y, 0.0);
    }
}
