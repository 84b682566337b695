//! Scripted input timeline for the headless walkthrough.

use glam::Vec2;
use strider_locomotion::LocomotionEvent;
use strider_physics::LocomotionInput;

/// One scripted input change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Hold these movement axes until the next `Move`.
    Move(Vec2),
    /// Look delta for a single frame.
    Look(Vec2),
    /// Deliver a discrete event.
    Event(LocomotionEvent),
}

/// An action fired on a given simulation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    /// Simulation frame the action fires on.
    pub frame: u64,
    /// What happens.
    pub action: Action,
}

/// Frame-ordered list of cues.
#[derive(Debug, Clone, Default)]
pub struct Script {
    cues: Vec<Cue>,
    next: usize,
}

impl Script {
    /// Builds a script; cues are sorted by frame, keeping insertion order
    /// for cues on the same frame.
    pub fn new(mut cues: Vec<Cue>) -> Self {
        cues.sort_by_key(|cue| cue.frame);
        Self { cues, next: 0 }
    }

    /// Walk up to a low ceiling, crouch under it, fail to stand, stand up on
    /// the far side, then turn, jump, go prone and sprint away.
    ///
    /// The scene has the character at the origin facing `-Z`, with the
    /// ceiling spanning `z` in `[-10, -6]`.
    pub fn walkthrough() -> Self {
        use Action::{Event, Look, Move};
        use LocomotionEvent::*;

        let cue = |frame, action| Cue { frame, action };
        Self::new(vec![
            cue(30, Move(Vec2::Y)),
            cue(60, Event(SprintToggle)),
            cue(90, Event(Crouch)),
            // Under the ceiling: standing is rejected.
            cue(200, Event(Crouch)),
            // Past the ceiling: standing succeeds.
            cue(320, Event(Crouch)),
            cue(360, Move(Vec2::ZERO)),
            cue(380, Look(Vec2::new(450.0, 0.0))),
            cue(400, Event(Jump)),
            cue(480, Event(Prone)),
            cue(540, Move(Vec2::Y)),
            cue(600, Event(Jump)),
            cue(660, Event(SprintToggle)),
            cue(720, Event(SprintReleased)),
            cue(780, Move(Vec2::ZERO)),
        ])
    }

    /// Applies every cue scheduled for `frame` to `input`.
    ///
    /// Cues for frames already passed are applied too, so skipped frames
    /// never lose input.
    pub fn apply(&mut self, frame: u64, input: &mut LocomotionInput) {
        while let Some(cue) = self.cues.get(self.next) {
            if cue.frame > frame {
                break;
            }
            match cue.action {
                Action::Move(axes) => input.movement = axes,
                Action::Look(delta) => input.look += delta,
                Action::Event(event) => input.events.push(event),
            }
            self.next += 1;
        }
    }

    /// Whether every cue has fired.
    pub fn is_finished(&self) -> bool {
        self.next >= self.cues.len()
    }

    /// Frame of the last cue.
    pub fn last_frame(&self) -> u64 {
        self.cues.last().map_or(0, |cue| cue.frame)
    }
}
