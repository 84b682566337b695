//! First-person locomotion: look, walk/run/sprint, jump, gravity, and the
//! stand/crouch/prone posture state machine.
//!
//! The controller is engine-agnostic. Collision queries and the final move go
//! through [`CharacterEnvironment`]; `strider-physics` provides the Rapier
//! implementation.

pub mod controller;
pub mod environment;
pub mod error;
pub mod events;
pub mod movement;
pub mod settings;
pub mod smoothing;
pub mod stance;
pub mod vertical;
pub mod view;

#[cfg(test)]
mod test_env;

pub use controller::{FrameReport, LocomotionController, LocomotionSnapshot};
pub use environment::{CharacterEnvironment, FrameInput, ObstructionMask};
pub use error::SettingsError;
pub use events::{EventQueue, LocomotionEvent, TransitionOutcome, TransitionRecord};
pub use movement::{MovementIntegrator, MovementStep, speed_multiplier};
pub use settings::{
    GravitySettings, JumpSettings, LocomotionSettings, MovementSettings, SpeedEffectors,
    StanceSettings, ViewSettings,
};
pub use smoothing::{Smoothed, smooth_damp};
pub use stance::{
    ClearanceCheck, ClearanceProbe, Stance, StanceEnvelope, StanceMachine, StanceProfile,
    StanceProfiles,
};
pub use vertical::VerticalIntegrator;
pub use view::ViewIntegrator;
