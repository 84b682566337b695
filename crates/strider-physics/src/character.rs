//! Kinematic capsule character and its [`CharacterEnvironment`] implementation.
//!
//! The body sits at the character's feet. Its single capsule collider is
//! offset by the stance envelope's center and resized every frame through
//! [`CharacterBody::apply_envelope`]. Moves go through Rapier's
//! [`KinematicCharacterController`], which also reports ground contact.

use bevy_ecs::prelude::*;
use glam::Vec3;
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;
use strider_locomotion::{CharacterEnvironment, ObstructionMask, StanceEnvelope, StanceProfile};
use tracing::{info, trace};

use crate::{PhysicsWorld, from_rapier, to_rapier};

/// Gap left between the requested feet position and the spawned body.
///
/// Rapier's controller lets a shape that starts touching the ground sink
/// through it, so the body starts slightly above and drops onto the floor.
pub const SPAWN_LIFT: f32 = 0.1;

/// Half length of the capsule's inner segment for a total `height`.
fn half_segment(height: f32, radius: f32) -> f32 {
    (height * 0.5 - radius).max(0.0)
}

/// Handles and controller state for one character.
#[derive(Component)]
pub struct CharacterBody {
    /// Kinematic body positioned at the feet.
    pub body_handle: RigidBodyHandle,
    /// Capsule collider attached to the body.
    pub collider_handle: ColliderHandle,
    /// Rapier's character controller.
    pub controller: KinematicCharacterController,
    /// Capsule radius, fixed for the character's lifetime.
    pub radius: f32,
    /// Ground contact reported by the last move.
    pub grounded: bool,
}

/// Spawns a kinematic capsule shaped by `profile`, standing [`SPAWN_LIFT`]
/// above `feet`.
pub fn spawn_character(
    physics: &mut PhysicsWorld,
    feet: Vec3,
    profile: &StanceProfile,
    radius: f32,
) -> CharacterBody {
    let body = RigidBodyBuilder::kinematic_position_based()
        .translation(to_rapier(feet + Vec3::Y * SPAWN_LIFT))
        .build();
    let body_handle = physics.rigid_body_set.insert(body);

    let collider = ColliderBuilder::capsule_y(half_segment(profile.collider_height, radius), radius)
        .translation(to_rapier(profile.collider_center))
        .friction(0.0)
        .build();
    let collider_handle =
        physics
            .collider_set
            .insert_with_parent(collider, body_handle, &mut physics.rigid_body_set);

    let controller = KinematicCharacterController {
        max_slope_climb_angle: std::f32::consts::FRAC_PI_4,
        min_slope_slide_angle: std::f32::consts::FRAC_PI_4,
        autostep: Some(CharacterAutostep {
            max_height: CharacterLength::Absolute(0.3),
            min_width: CharacterLength::Absolute(0.2),
            include_dynamic_bodies: false,
        }),
        snap_to_ground: Some(CharacterLength::Absolute(0.2)),
        offset: CharacterLength::Absolute(0.01),
        ..Default::default()
    };

    info!(?feet, radius, height = profile.collider_height, "Spawned character capsule");

    CharacterBody {
        body_handle,
        collider_handle,
        controller,
        radius,
        grounded: false,
    }
}

impl CharacterBody {
    /// World position of the feet as of the last physics step.
    pub fn feet(&self, physics: &PhysicsWorld) -> Vec3 {
        from_rapier(physics.rigid_body_set[self.body_handle].translation())
    }

    /// Resizes and re-centers the capsule to match `envelope`.
    pub fn apply_envelope(&self, physics: &mut PhysicsWorld, envelope: &StanceEnvelope) {
        let Some(collider) = physics.collider_set.get_mut(self.collider_handle) else {
            return;
        };
        collider.set_shape(SharedShape::capsule_y(
            half_segment(envelope.collider_height, self.radius),
            self.radius,
        ));
        collider.set_translation_wrt_parent(to_rapier(envelope.collider_center));
    }
}

/// One frame's view of the physics world for a single character.
pub struct RapierEnvironment<'a> {
    physics: &'a mut PhysicsWorld,
    body: &'a mut CharacterBody,
    dt: f32,
}

impl<'a> RapierEnvironment<'a> {
    /// Borrow `physics` and `body` for a frame of length `dt`.
    pub fn new(physics: &'a mut PhysicsWorld, body: &'a mut CharacterBody, dt: f32) -> Self {
        Self { physics, body, dt }
    }
}

impl CharacterEnvironment for RapierEnvironment<'_> {
    fn is_grounded(&self) -> bool {
        self.body.grounded
    }

    fn collision_radius(&self) -> f32 {
        self.body.radius
    }

    fn feet_position(&self) -> Vec3 {
        self.body.feet(self.physics)
    }

    fn cast_capsule(&self, start: Vec3, end: Vec3, radius: f32, mask: ObstructionMask) -> bool {
        if mask == ObstructionMask::NONE {
            return false;
        }
        let body = &self.physics.rigid_body_set[self.body.body_handle];
        // Probe segment in body space; the body is never rotated.
        let origin = body.translation();
        let probe = Capsule::new(to_rapier(start) - origin, to_rapier(end) - origin, radius);

        let predicate = |_: ColliderHandle, collider: &Collider| {
            mask.intersects(collider.collision_groups().memberships.bits())
        };
        let filter = QueryFilter::new()
            .exclude_rigid_body(self.body.body_handle)
            .exclude_sensors()
            .predicate(&predicate);
        let query_pipeline = self.physics.broad_phase.as_query_pipeline(
            self.physics.narrow_phase.query_dispatcher(),
            &self.physics.rigid_body_set,
            &self.physics.collider_set,
            filter,
        );

        let hit = query_pipeline
            .intersect_shape(*body.position(), &probe)
            .next()
            .is_some();
        trace!(?start, ?end, radius, hit, "Capsule clearance query");
        hit
    }

    fn move_character(&mut self, displacement: Vec3) {
        let handle = self.body.body_handle;
        let corrected = {
            let filter = QueryFilter::new().exclude_rigid_body(handle);
            let query_pipeline = self.physics.broad_phase.as_query_pipeline(
                self.physics.narrow_phase.query_dispatcher(),
                &self.physics.rigid_body_set,
                &self.physics.collider_set,
                filter,
            );
            let collider = &self.physics.collider_set[self.body.collider_handle];
            self.body.controller.move_shape(
                self.dt,
                &query_pipeline,
                collider.shape(),
                collider.position(),
                to_rapier(displacement),
                |_| {},
            )
        };

        let body = &mut self.physics.rigid_body_set[handle];
        let next = body.translation() + corrected.translation;
        body.set_next_kinematic_translation(next);
        self.body.grounded = corrected.grounded;
    }
}
