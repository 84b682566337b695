//! ECS glue: per-entity input, the frame clock, and the locomotion system.

use bevy_ecs::prelude::*;
use glam::Vec2;
use strider_locomotion::{FrameInput, FrameReport, LocomotionController, LocomotionEvent};
use tracing::debug;

use crate::{CharacterBody, PhysicsWorld, RapierEnvironment};

/// Frame clock read by [`locomotion_system`].
#[derive(Resource, Debug, Clone, Default)]
pub struct FrameTime {
    /// Seconds covered by the current frame.
    pub delta: f32,
}

/// Input gathered for one character since the last frame.
#[derive(Component, Debug, Clone, Default)]
pub struct LocomotionInput {
    /// Movement axes: `x` strafe, `y` forward.
    pub movement: Vec2,
    /// Look delta: `x` horizontal, `y` vertical.
    pub look: Vec2,
    /// Discrete events, forwarded to the controller in order.
    pub events: Vec<LocomotionEvent>,
}

/// Result of the last frame, kept on the entity for camera and UI code.
#[derive(Component, Debug, Clone, Default)]
pub struct LastFrame(pub FrameReport);

/// Runs one locomotion frame for every character, then reshapes its capsule
/// to the animated stance envelope.
///
/// Must run before [`crate::physics_step_system`].
pub fn locomotion_system(
    time: Res<FrameTime>,
    mut physics: ResMut<PhysicsWorld>,
    mut query: Query<(
        &mut LocomotionController,
        &mut CharacterBody,
        &mut LocomotionInput,
        Option<&mut LastFrame>,
    )>,
) {
    let physics = &mut *physics;
    for (mut controller, mut body, mut input, last) in &mut query {
        for event in input.events.drain(..) {
            controller.push_event(event);
        }
        let frame = FrameInput::new(input.movement, input.look, time.delta);
        input.look = Vec2::ZERO;

        let report = {
            let mut env = RapierEnvironment::new(physics, &mut body, time.delta);
            controller.advance(&mut env, frame)
        };
        body.apply_envelope(physics, &controller.envelope());

        for record in &report.transitions {
            debug!(
                event = ?record.event,
                outcome = ?record.outcome,
                stance = ?record.to,
                "Character transition"
            );
        }
        if let Some(mut last) = last {
            last.0 = report;
        }
    }
}
