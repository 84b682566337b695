//! Rapier-backed collision world for the locomotion controller.
//!
//! [`PhysicsWorld`] owns all simulation state. [`character`] spawns the
//! kinematic capsule and implements the controller's environment on top of
//! Rapier's character controller; [`system`] wires both into a Bevy ECS
//! schedule.

use bevy_ecs::prelude::*;
use rapier3d::prelude::*;

pub mod character;
pub mod system;

pub use character::{CharacterBody, RapierEnvironment, spawn_character};
pub use system::{FrameTime, LastFrame, LocomotionInput, locomotion_system};

/// Converts a workspace vector into Rapier's vector type.
pub fn to_rapier(v: glam::Vec3) -> Vector {
    Vector::new(v.x, v.y, v.z)
}

/// Converts a Rapier vector into the workspace vector type.
pub fn from_rapier(v: Vector) -> glam::Vec3 {
    glam::Vec3::new(v.x, v.y, v.z)
}

/// Central physics resource owning all Rapier state.
///
/// Rapier's own gravity is zero: the locomotion controller integrates
/// gravity for the character itself, and the world only holds static level
/// geometry plus kinematic bodies.
#[derive(Resource)]
pub struct PhysicsWorld {
    /// World gravity applied to dynamic bodies.
    pub gravity: Vector,
    /// Timestep and solver configuration.
    pub integration_parameters: IntegrationParameters,
    /// The simulation pipeline.
    pub physics_pipeline: PhysicsPipeline,
    /// Sleeping/awake body islands.
    pub island_manager: IslandManager,
    /// Broad phase; also provides the query pipeline.
    pub broad_phase: BroadPhaseBvh,
    /// Narrow phase contact manifolds.
    pub narrow_phase: NarrowPhase,
    /// All rigid bodies.
    pub rigid_body_set: RigidBodySet,
    /// All colliders.
    pub collider_set: ColliderSet,
    /// Impulse joints.
    pub impulse_joint_set: ImpulseJointSet,
    /// Multibody joints.
    pub multibody_joint_set: MultibodyJointSet,
    /// Continuous collision detection.
    pub ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// An empty world stepping at `1/60` seconds.
    pub fn new() -> Self {
        let integration_parameters = IntegrationParameters {
            dt: 1.0 / 60.0,
            ..Default::default()
        };

        Self {
            gravity: Vector::new(0.0, 0.0, 0.0),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Advances the simulation by one step, committing kinematic moves.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// Sets the gravity applied to dynamic bodies.
    pub fn set_gravity(&mut self, gravity: glam::Vec3) {
        self.gravity = to_rapier(gravity);
    }

    /// Adds a fixed axis-aligned box centered at `center` on the given
    /// collision `layers`.
    pub fn add_static_box(
        &mut self,
        center: glam::Vec3,
        half_extents: glam::Vec3,
        layers: u32,
    ) -> ColliderHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(to_rapier(center))
            .build();
        let handle = self.rigid_body_set.insert(body);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .collision_groups(InteractionGroups {
                memberships: Group::from_bits_truncate(layers),
                ..InteractionGroups::all()
            })
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// ECS system that steps the physics simulation once per invocation.
///
/// Runs after [`locomotion_system`] so the character's kinematic move lands
/// in the same tick.
pub fn physics_step_system(mut physics: ResMut<PhysicsWorld>) {
    physics.step();
}
