//! Scripted [`CharacterEnvironment`] shared by the unit tests.

use std::cell::RefCell;

use glam::Vec3;

use crate::environment::{CharacterEnvironment, ObstructionMask};

/// A capsule query seen by the fake world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleCast {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
    pub mask: ObstructionMask,
}

/// Flat infinite floor with an optional ceiling slab.
pub struct FakeEnvironment {
    pub grounded: bool,
    pub radius: f32,
    pub feet: Vec3,
    /// Height of the ceiling underside, if any.
    pub ceiling: Option<f32>,
    /// Collision layers the ceiling belongs to.
    pub ceiling_layers: u32,
    pub moves: Vec<Vec3>,
    pub casts: RefCell<Vec<CapsuleCast>>,
}

impl FakeEnvironment {
    pub fn grounded() -> Self {
        Self {
            grounded: true,
            radius: 0.3,
            feet: Vec3::ZERO,
            ceiling: None,
            ceiling_layers: 1,
            moves: Vec::new(),
            casts: RefCell::new(Vec::new()),
        }
    }

    pub fn airborne() -> Self {
        Self {
            grounded: false,
            ..Self::grounded()
        }
    }

    pub fn with_ceiling(mut self, height: f32) -> Self {
        self.ceiling = Some(height);
        self
    }

    pub fn cast_count(&self) -> usize {
        self.casts.borrow().len()
    }

    pub fn last_cast(&self) -> Option<CapsuleCast> {
        self.casts.borrow().last().copied()
    }
}

impl CharacterEnvironment for FakeEnvironment {
    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn collision_radius(&self) -> f32 {
        self.radius
    }

    fn feet_position(&self) -> Vec3 {
        self.feet
    }

    fn cast_capsule(&self, start: Vec3, end: Vec3, radius: f32, mask: ObstructionMask) -> bool {
        self.casts.borrow_mut().push(CapsuleCast {
            start,
            end,
            radius,
            mask,
        });
        match self.ceiling {
            Some(ceiling) => {
                mask.intersects(self.ceiling_layers) && start.y.max(end.y) + radius >= ceiling
            }
            None => false,
        }
    }

    fn move_character(&mut self, displacement: Vec3) {
        self.feet += displacement;
        self.moves.push(displacement);
    }
}
