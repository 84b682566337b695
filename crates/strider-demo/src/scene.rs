//! The demo level: a floor, a low ceiling, and one character.

use bevy_ecs::prelude::*;
use glam::Vec3;
use strider_config::Config;
use strider_locomotion::{
    LocomotionController, LocomotionSnapshot, SettingsError, TransitionRecord,
};
use strider_physics::{
    CharacterBody, FrameTime, LastFrame, LocomotionInput, PhysicsWorld, locomotion_system,
    physics_step_system, spawn_character,
};
use tracing::info;

/// Collision layer of ordinary level geometry.
pub const LEVEL_LAYER: u32 = 1;

/// Underside of the low ceiling.
pub const CEILING_HEIGHT: f32 = 1.5;

/// Headless world with one controlled character.
pub struct Scene {
    world: World,
    schedule: Schedule,
    character: Entity,
    transitions: Vec<TransitionRecord>,
}

impl Scene {
    /// Builds the level and spawns the character at the origin.
    pub fn new(config: &Config) -> Result<Self, SettingsError> {
        config.validate()?;

        let mut physics = PhysicsWorld::new();
        // Floor, top face at y = 0.
        physics.add_static_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(100.0, 0.5, 100.0),
            LEVEL_LAYER,
        );
        // Ceiling slab over z in [-10, -6].
        physics.add_static_box(
            Vec3::new(0.0, CEILING_HEIGHT + 0.5, -8.0),
            Vec3::new(100.0, 0.5, 2.0),
            LEVEL_LAYER,
        );

        let controller =
            LocomotionController::new(config.locomotion.clone(), config.stances.clone())?
                .with_initial_stance(config.character.initial_stance)
                .with_obstruction_mask(config.character.obstruction_mask);
        let profile = *controller.profiles().get(controller.stance());
        let body = spawn_character(&mut physics, Vec3::ZERO, &profile, config.character.radius);
        physics.step();
        info!(stance = ?controller.stance(), radius = config.character.radius, "Character spawned");

        let mut world = World::new();
        world.insert_resource(physics);
        world.insert_resource(FrameTime::default());
        let character = world
            .spawn((
                controller,
                body,
                LocomotionInput::default(),
                LastFrame::default(),
            ))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems((locomotion_system, physics_step_system).chain());

        Ok(Self {
            world,
            schedule,
            character,
            transitions: Vec::new(),
        })
    }

    /// Input component of the character, for scripting.
    pub fn input_mut(&mut self) -> Option<Mut<'_, LocomotionInput>> {
        self.world.get_mut::<LocomotionInput>(self.character)
    }

    /// Runs one simulation frame of `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.world.resource_mut::<FrameTime>().delta = dt;
        self.schedule.run(&mut self.world);
        if let Some(last) = self.world.get::<LastFrame>(self.character) {
            self.transitions.extend(last.0.transitions.iter().copied());
        }
    }

    /// Controller state for camera and logging.
    pub fn snapshot(&self) -> Option<LocomotionSnapshot> {
        self.world
            .get::<LocomotionController>(self.character)
            .map(LocomotionController::snapshot)
    }

    /// Feet position after the last step.
    pub fn feet(&self) -> Option<Vec3> {
        let body = self.world.get::<CharacterBody>(self.character)?;
        Some(body.feet(self.world.resource::<PhysicsWorld>()))
    }

    /// Whether the character touched ground on the last step.
    pub fn grounded(&self) -> bool {
        self.world
            .get::<CharacterBody>(self.character)
            .is_some_and(|body| body.grounded)
    }

    /// Every event drained so far, in order.
    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }
}
