//! Discrete input events and their outcomes.
//!
//! Input callbacks never mutate the controller directly. They push a
//! [`LocomotionEvent`] into the [`EventQueue`], which the controller drains
//! in arrival order at the start of its next frame, so every transition sees
//! the ground and stance state as of that frame's start.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::stance::Stance;

/// A discrete action delivered by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocomotionEvent {
    /// Jump, or stand up when crouched or prone.
    Jump,
    /// Toggle between crouching and standing.
    Crouch,
    /// Drop prone.
    Prone,
    /// Toggle sprinting; also stands the character up.
    SprintToggle,
    /// The sprint input was released.
    SprintReleased,
}

/// What happened when an event was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionOutcome {
    /// The event's rule fired and state was updated.
    Applied,
    /// A clearance check failed; state is unchanged.
    Rejected,
    /// The event does not apply in the current state.
    Ignored,
}

/// One drained event with its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRecord {
    /// The event that was applied.
    pub event: LocomotionEvent,
    /// How it resolved.
    pub outcome: TransitionOutcome,
    /// Stance before the event.
    pub from: Stance,
    /// Stance after the event.
    pub to: Stance,
}

/// FIFO of events waiting for the next frame.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pending: VecDeque<LocomotionEvent>,
}

impl EventQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an event.
    pub fn push(&mut self, event: LocomotionEvent) {
        self.pending.push_back(event);
    }

    /// Remove and return the oldest event.
    pub fn pop(&mut self) -> Option<LocomotionEvent> {
        self.pending.pop_front()
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
