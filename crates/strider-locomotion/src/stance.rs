//! Stance state machine and posture envelope animation.
//!
//! The character is always in exactly one [`Stance`]. Upward transitions are
//! gated by a [`ClearanceCheck`]: a capsule is swept along the up axis from
//! just above the feet to just below the target height, and any overlap with
//! an obstruction rejects the transition, leaving the state untouched.
//!
//! Independently of transitions, the eye height and collider envelope chase
//! the active stance's [`StanceProfile`] every frame, so posture changes are
//! animated rather than instant.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::environment::{CharacterEnvironment, ObstructionMask};
use crate::error::{SettingsError, check_finite};
use crate::events::TransitionOutcome;
use crate::smoothing::Smoothed;

/// Body posture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stance {
    /// Upright. The initial stance.
    #[default]
    Stand,
    /// Crouched.
    Crouch,
    /// Lying down.
    Prone,
}

/// Target envelope for one stance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StanceProfile {
    /// Camera offset above the feet.
    pub camera_height: f32,
    /// Total collision capsule height.
    pub collider_height: f32,
    /// Capsule center relative to the feet.
    pub collider_center: Vec3,
}

impl StanceProfile {
    /// A profile whose capsule is centered at half its height.
    pub fn upright(camera_height: f32, collider_height: f32) -> Self {
        Self {
            camera_height,
            collider_height,
            collider_center: Vec3::new(0.0, collider_height * 0.5, 0.0),
        }
    }

    fn validate(&self, stance: Stance) -> Result<(), SettingsError> {
        check_finite("camera_height", self.camera_height)?;
        check_finite("collider_height", self.collider_height)?;
        if !self.collider_center.is_finite() {
            return Err(SettingsError::NonFinite {
                field: "collider_center",
            });
        }
        if self.camera_height <= 0.0 {
            return Err(SettingsError::NonPositiveHeight {
                stance,
                field: "camera_height",
                value: self.camera_height,
            });
        }
        if self.collider_height <= 0.0 {
            return Err(SettingsError::NonPositiveHeight {
                stance,
                field: "collider_height",
                value: self.collider_height,
            });
        }
        Ok(())
    }
}

/// The three stance profiles, fixed for the controller's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StanceProfiles {
    /// Standing envelope.
    pub stand: StanceProfile,
    /// Crouching envelope.
    pub crouch: StanceProfile,
    /// Prone envelope.
    pub prone: StanceProfile,
}

impl Default for StanceProfiles {
    fn default() -> Self {
        Self {
            stand: StanceProfile::upright(1.6, 1.8),
            crouch: StanceProfile::upright(1.0, 1.2),
            prone: StanceProfile::upright(0.35, 0.6),
        }
    }
}

impl StanceProfiles {
    /// Profile for `stance`.
    pub fn get(&self, stance: Stance) -> &StanceProfile {
        match stance {
            Stance::Stand => &self.stand,
            Stance::Crouch => &self.crouch,
            Stance::Prone => &self.prone,
        }
    }

    /// Reject non-finite or non-positive heights.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.stand.validate(Stance::Stand)?;
        self.crouch.validate(Stance::Crouch)?;
        self.prone.validate(Stance::Prone)
    }
}

/// Segment and radius of a clearance capsule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearanceProbe {
    /// Lower segment end.
    pub start: Vec3,
    /// Upper segment end.
    pub end: Vec3,
    /// Capsule radius.
    pub radius: f32,
}

impl ClearanceProbe {
    /// Probe covering `target_height` above `feet`, shrunk by `margin` at both ends.
    pub fn new(feet: Vec3, radius: f32, margin: f32, target_height: f32) -> Self {
        Self {
            start: feet + Vec3::Y * (radius + margin),
            end: feet + Vec3::Y * (target_height - radius - margin),
            radius,
        }
    }
}

/// Headroom test parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearanceCheck {
    /// Gap kept at both ends of the probe.
    pub margin: f32,
    /// Layers that count as obstructions.
    pub mask: ObstructionMask,
}

impl ClearanceCheck {
    /// True if something occupies the space a body of `target_height` would need.
    pub fn is_blocked<E: CharacterEnvironment + ?Sized>(&self, env: &E, target_height: f32) -> bool {
        let probe = ClearanceProbe::new(
            env.feet_position(),
            env.collision_radius(),
            self.margin,
            target_height,
        );
        let blocked = env.cast_capsule(probe.start, probe.end, probe.radius, self.mask);
        trace!(target_height, blocked, "Stance clearance probe");
        blocked
    }
}

/// Smoothed posture values read by camera and collision code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StanceEnvelope {
    /// Current camera offset above the feet.
    pub camera_height: f32,
    /// Current capsule height.
    pub collider_height: f32,
    /// Current capsule center relative to the feet.
    pub collider_center: Vec3,
}

/// Discrete stance plus the animated envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct StanceMachine {
    stance: Stance,
    camera_height: Smoothed<f32>,
    collider_height: Smoothed<f32>,
    collider_center: Smoothed<Vec3>,
}

impl StanceMachine {
    /// Start in `stance` with the envelope already at its profile.
    pub fn new(stance: Stance, profiles: &StanceProfiles) -> Self {
        let profile = profiles.get(stance);
        Self {
            stance,
            camera_height: Smoothed::new(profile.camera_height),
            collider_height: Smoothed::new(profile.collider_height),
            collider_center: Smoothed::new(profile.collider_center),
        }
    }

    /// Active stance.
    pub fn stance(&self) -> Stance {
        self.stance
    }

    /// Current envelope values.
    pub fn envelope(&self) -> StanceEnvelope {
        StanceEnvelope {
            camera_height: self.camera_height.value(),
            collider_height: self.collider_height.value(),
            collider_center: self.collider_center.value(),
        }
    }

    /// Crouch toggle: crouched characters try to stand, everyone else tries
    /// to crouch. Both directions need clearance for the destination height.
    pub fn toggle_crouch<E: CharacterEnvironment + ?Sized>(
        &mut self,
        env: &E,
        profiles: &StanceProfiles,
        clearance: &ClearanceCheck,
    ) -> TransitionOutcome {
        let destination = if self.stance == Stance::Crouch {
            Stance::Stand
        } else {
            Stance::Crouch
        };
        self.transition_checked(env, profiles, clearance, destination)
    }

    /// Move to `destination` if its height is clear.
    pub fn transition_checked<E: CharacterEnvironment + ?Sized>(
        &mut self,
        env: &E,
        profiles: &StanceProfiles,
        clearance: &ClearanceCheck,
        destination: Stance,
    ) -> TransitionOutcome {
        if clearance.is_blocked(env, profiles.get(destination).collider_height) {
            return TransitionOutcome::Rejected;
        }
        self.stance = destination;
        TransitionOutcome::Applied
    }

    /// Move to `destination` without any clearance check.
    pub fn force(&mut self, destination: Stance) {
        self.stance = destination;
    }

    /// Advance the envelope toward the active profile.
    pub fn smooth(&mut self, profiles: &StanceProfiles, smoothing: f32, dt: f32) {
        let profile = profiles.get(self.stance);
        self.camera_height
            .approach(profile.camera_height, smoothing, dt);
        self.collider_height
            .approach(profile.collider_height, smoothing, dt);
        self.collider_center
            .approach(profile.collider_center, smoothing, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_env::FakeEnvironment;

    const DT: f32 = 1.0 / 60.0;

    fn clearance() -> ClearanceCheck {
        ClearanceCheck {
            margin: 0.05,
            mask: ObstructionMask::ALL,
        }
    }

    #[test]
    fn test_probe_spans_target_height_minus_margins() {
        let probe = ClearanceProbe::new(Vec3::new(1.0, 2.0, 3.0), 0.3, 0.05, 1.8);
        assert!((probe.start.y - 2.35).abs() < 1e-6);
        assert!((probe.end.y - 3.45).abs() < 1e-6);
        assert_eq!(probe.start.x, 1.0);
        assert_eq!(probe.end.z, 3.0);
        assert_eq!(probe.radius, 0.3);
    }

    #[test]
    fn test_check_uses_environment_radius_and_mask() {
        let env = FakeEnvironment::grounded();
        let check = ClearanceCheck {
            margin: 0.05,
            mask: ObstructionMask(4),
        };
        check.is_blocked(&env, 1.2);
        let cast = env.last_cast().unwrap();
        assert_eq!(cast.radius, 0.3);
        assert_eq!(cast.mask, ObstructionMask(4));
    }

    #[test]
    fn test_crouch_under_ceiling_then_stand_rejected() {
        let profiles = StanceProfiles::default();
        let env = FakeEnvironment::grounded().with_ceiling(1.5);
        let mut machine = StanceMachine::new(Stance::Stand, &profiles);

        // Crouch probe tops out at 1.15, below the ceiling.
        assert_eq!(
            machine.toggle_crouch(&env, &profiles, &clearance()),
            TransitionOutcome::Applied
        );
        assert_eq!(machine.stance(), Stance::Crouch);

        assert_eq!(
            machine.toggle_crouch(&env, &profiles, &clearance()),
            TransitionOutcome::Rejected
        );
        assert_eq!(machine.stance(), Stance::Crouch);
    }

    #[test]
    fn test_mask_excluding_ceiling_allows_stand() {
        let profiles = StanceProfiles::default();
        let env = FakeEnvironment::grounded().with_ceiling(1.5);
        let mut machine = StanceMachine::new(Stance::Crouch, &profiles);
        let check = ClearanceCheck {
            margin: 0.05,
            mask: ObstructionMask(2),
        };
        assert_eq!(
            machine.toggle_crouch(&env, &profiles, &check),
            TransitionOutcome::Applied
        );
        assert_eq!(machine.stance(), Stance::Stand);
    }

    #[test]
    fn test_new_snaps_envelope_to_profile() {
        let profiles = StanceProfiles::default();
        let machine = StanceMachine::new(Stance::Prone, &profiles);
        let envelope = machine.envelope();
        assert_eq!(envelope.camera_height, profiles.prone.camera_height);
        assert_eq!(envelope.collider_height, profiles.prone.collider_height);
        assert_eq!(envelope.collider_center, profiles.prone.collider_center);
    }

    #[test]
    fn test_envelope_moves_toward_new_stance() {
        let profiles = StanceProfiles::default();
        let mut machine = StanceMachine::new(Stance::Stand, &profiles);
        machine.force(Stance::Crouch);
        machine.smooth(&profiles, 0.12, DT);
        let envelope = machine.envelope();
        assert!(envelope.camera_height < profiles.stand.camera_height);
        assert!(envelope.camera_height > profiles.crouch.camera_height);

        for _ in 0..300 {
            machine.smooth(&profiles, 0.12, DT);
        }
        let envelope = machine.envelope();
        assert!((envelope.collider_height - profiles.crouch.collider_height).abs() < 1e-3);
        assert!((envelope.collider_center - profiles.crouch.collider_center).length() < 1e-3);
    }

    #[test]
    fn test_profiles_reject_zero_height() {
        let mut profiles = StanceProfiles::default();
        profiles.prone.collider_height = 0.0;
        assert_eq!(
            profiles.validate(),
            Err(SettingsError::NonPositiveHeight {
                stance: Stance::Prone,
                field: "collider_height",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_default_profiles_descend() {
        let profiles = StanceProfiles::default();
        assert!(profiles.validate().is_ok());
        assert!(profiles.stand.collider_height > profiles.crouch.collider_height);
        assert!(profiles.crouch.collider_height > profiles.prone.collider_height);
    }
}
