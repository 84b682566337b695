//! The per-frame locomotion controller.
//!
//! [`LocomotionController::advance`] runs once per simulation frame:
//!
//! 1. drain queued discrete events against the frame-start ground/stance state,
//! 2. integrate look input,
//! 3. integrate horizontal movement (stance and ground pick the speed multiplier),
//! 4. integrate gravity and add the jump impulse,
//! 5. hand the combined displacement to the environment's move primitive,
//! 6. relax the jump impulse,
//! 7. animate the stance envelope toward the active profile.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec2, Vec3};
use tracing::{debug, trace};

use crate::environment::{CharacterEnvironment, FrameInput, ObstructionMask};
use crate::error::SettingsError;
use crate::events::{EventQueue, LocomotionEvent, TransitionOutcome, TransitionRecord};
use crate::movement::MovementIntegrator;
use crate::settings::{LocomotionSettings, SPRINT_FORWARD_THRESHOLD};
use crate::stance::{ClearanceCheck, Stance, StanceEnvelope, StanceMachine, StanceProfiles};
use crate::vertical::VerticalIntegrator;
use crate::view::ViewIntegrator;

/// Everything one frame produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// World-space displacement handed to the move primitive.
    pub displacement: Vec3,
    /// Speed multiplier derived for this frame.
    pub speed_multiplier: f32,
    /// Ground state sampled at the start of the frame.
    pub grounded: bool,
    /// Events drained this frame, in order.
    pub transitions: Vec<TransitionRecord>,
}

/// Read-only view of the controller state consumed by camera and render code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionSnapshot {
    /// Body heading in degrees.
    pub yaw: f32,
    /// Camera pitch in degrees.
    pub pitch: f32,
    /// Body rotation built from `yaw`.
    pub body_rotation: Quat,
    /// Camera pivot rotation built from `pitch`, relative to the body.
    pub camera_rotation: Quat,
    /// Current camera offset above the feet.
    pub camera_height: f32,
    /// Current capsule height.
    pub collider_height: f32,
    /// Current capsule center relative to the feet.
    pub collider_center: Vec3,
    /// Active stance.
    pub stance: Stance,
    /// Whether sprint speeds are active.
    pub sprinting: bool,
    /// Gravity accumulator.
    pub vertical_speed: f32,
    /// Remaining jump impulse.
    pub jump_impulse: Vec3,
    /// Smoothed horizontal velocity in body-local axes (strafe, forward).
    pub horizontal_velocity: Vec2,
}

/// First-person locomotion state for one character.
#[derive(Component, Debug, Clone)]
pub struct LocomotionController {
    settings: LocomotionSettings,
    profiles: StanceProfiles,
    mask: ObstructionMask,
    view: ViewIntegrator,
    movement: MovementIntegrator,
    vertical: VerticalIntegrator,
    stance: StanceMachine,
    events: EventQueue,
}

impl LocomotionController {
    /// Build a standing controller, rejecting malformed settings.
    pub fn new(
        settings: LocomotionSettings,
        profiles: StanceProfiles,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        profiles.validate()?;
        let stance = StanceMachine::new(Stance::Stand, &profiles);
        let view = ViewIntegrator::new(0.0, 0.0, &settings.view);
        Ok(Self {
            settings,
            profiles,
            mask: ObstructionMask::ALL,
            view,
            movement: MovementIntegrator::new(),
            vertical: VerticalIntegrator::new(),
            stance,
            events: EventQueue::new(),
        })
    }

    /// Use `mask` to select obstructions for clearance checks.
    #[must_use]
    pub fn with_obstruction_mask(mut self, mask: ObstructionMask) -> Self {
        self.mask = mask;
        self
    }

    /// Start in `stance`, with the envelope already at that profile.
    #[must_use]
    pub fn with_initial_stance(mut self, stance: Stance) -> Self {
        self.stance = StanceMachine::new(stance, &self.profiles);
        self
    }

    /// Start facing `yaw` with camera `pitch`, both in degrees.
    #[must_use]
    pub fn with_orientation(mut self, yaw: f32, pitch: f32) -> Self {
        self.view = ViewIntegrator::new(yaw, pitch, &self.settings.view);
        self
    }

    /// Queue a discrete event for the next frame.
    pub fn push_event(&mut self, event: LocomotionEvent) {
        self.events.push(event);
    }

    /// Number of events waiting for the next frame.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Active settings.
    pub fn settings(&self) -> &LocomotionSettings {
        &self.settings
    }

    /// Stance profiles.
    pub fn profiles(&self) -> &StanceProfiles {
        &self.profiles
    }

    /// Active stance.
    pub fn stance(&self) -> Stance {
        self.stance.stance()
    }

    /// Whether sprint speeds are active.
    pub fn is_sprinting(&self) -> bool {
        self.movement.is_sprinting()
    }

    /// Current eye height and collider envelope.
    pub fn envelope(&self) -> StanceEnvelope {
        self.stance.envelope()
    }

    /// View integrator state.
    pub fn view(&self) -> &ViewIntegrator {
        &self.view
    }

    /// Horizontal movement state.
    pub fn movement(&self) -> &MovementIntegrator {
        &self.movement
    }

    /// Vertical motion state.
    pub fn vertical(&self) -> &VerticalIntegrator {
        &self.vertical
    }

    /// Everything render and camera code reads each frame.
    pub fn snapshot(&self) -> LocomotionSnapshot {
        let envelope = self.stance.envelope();
        LocomotionSnapshot {
            yaw: self.view.yaw(),
            pitch: self.view.pitch(),
            body_rotation: self.view.body_rotation(),
            camera_rotation: self.view.camera_rotation(),
            camera_height: envelope.camera_height,
            collider_height: envelope.collider_height,
            collider_center: envelope.collider_center,
            stance: self.stance.stance(),
            sprinting: self.movement.is_sprinting(),
            vertical_speed: self.vertical.vertical_speed(),
            jump_impulse: self.vertical.jump_impulse(),
            horizontal_velocity: self.movement.current(),
        }
    }

    /// Run one frame.
    pub fn advance<E: CharacterEnvironment + ?Sized>(
        &mut self,
        env: &mut E,
        input: FrameInput,
    ) -> FrameReport {
        let dt = input.dt.max(0.0);
        let axes = input.movement.clamp(Vec2::NEG_ONE, Vec2::ONE);
        let grounded = env.is_grounded();

        let mut transitions = Vec::with_capacity(self.events.len());
        while let Some(event) = self.events.pop() {
            let from = self.stance.stance();
            let outcome = self.apply_event(&*env, event, grounded, axes.y);
            let record = TransitionRecord {
                event,
                outcome,
                from,
                to: self.stance.stance(),
            };
            match outcome {
                TransitionOutcome::Applied => debug!(?event, ?from, to = ?record.to, "Locomotion event applied"),
                _ => trace!(?event, ?outcome, stance = ?from, "Locomotion event not applied"),
            }
            transitions.push(record);
        }

        self.view.integrate(&self.settings.view, input.look, dt);

        let step = self.movement.integrate(
            &self.settings,
            axes,
            grounded,
            self.stance.stance(),
            self.view.body_rotation(),
            dt,
        );
        let vertical = self.vertical.integrate(&self.settings.gravity, grounded, dt);
        let displacement = step.displacement + vertical;
        env.move_character(displacement);

        self.vertical.relax_jump(self.settings.jump.falloff, dt);
        self.stance
            .smooth(&self.profiles, self.settings.stance.smoothing, dt);

        trace!(
            ?displacement,
            speed_multiplier = step.speed_multiplier,
            grounded,
            "Locomotion frame"
        );

        FrameReport {
            displacement,
            speed_multiplier: step.speed_multiplier,
            grounded,
            transitions,
        }
    }

    fn clearance(&self) -> ClearanceCheck {
        ClearanceCheck {
            margin: self.settings.stance.clearance_margin,
            mask: self.mask,
        }
    }

    fn apply_event<E: CharacterEnvironment + ?Sized>(
        &mut self,
        env: &E,
        event: LocomotionEvent,
        grounded: bool,
        forward: f32,
    ) -> TransitionOutcome {
        match event {
            LocomotionEvent::Jump => self.jump(env, grounded),
            LocomotionEvent::Crouch => {
                let clearance = self.clearance();
                let was_crouched = self.stance.stance() == Stance::Crouch;
                let outcome = self.stance.toggle_crouch(env, &self.profiles, &clearance);
                if outcome == TransitionOutcome::Applied && !was_crouched {
                    self.movement.stop_sprint();
                }
                outcome
            }
            LocomotionEvent::Prone => {
                self.stance.force(Stance::Prone);
                self.movement.stop_sprint();
                TransitionOutcome::Applied
            }
            LocomotionEvent::SprintToggle => {
                // Stands up without a clearance check.
                if self.stance.stance() != Stance::Stand {
                    self.stance.force(Stance::Stand);
                }
                if forward <= SPRINT_FORWARD_THRESHOLD {
                    self.movement.stop_sprint();
                } else {
                    self.movement.toggle_sprint();
                }
                TransitionOutcome::Applied
            }
            LocomotionEvent::SprintReleased => {
                if self.settings.movement.sprint_hold {
                    self.movement.stop_sprint();
                    TransitionOutcome::Applied
                } else {
                    TransitionOutcome::Ignored
                }
            }
        }
    }

    fn jump<E: CharacterEnvironment + ?Sized>(&mut self, env: &E, grounded: bool) -> TransitionOutcome {
        if !grounded {
            return TransitionOutcome::Ignored;
        }
        match self.stance.stance() {
            Stance::Crouch => {
                let clearance = self.clearance();
                self.stance
                    .transition_checked(env, &self.profiles, &clearance, Stance::Stand)
            }
            // Standing up from prone skips the clearance check.
            Stance::Prone => {
                self.stance.force(Stance::Stand);
                TransitionOutcome::Applied
            }
            Stance::Stand => {
                self.vertical.launch(self.settings.jump.height);
                TransitionOutcome::Applied
            }
        }
    }
}
