//! Critically damped "smooth damp" interpolation.
//!
//! Every continuous value the controller animates (horizontal velocity, jump
//! impulse, eye height, collider envelope) approaches its target through
//! [`smooth_damp`]. The integrator is a critically damped spring solved with
//! a cheap polynomial approximation of `exp(-x)`, parameterised by a time
//! constant instead of stiffness/damping. It never overshoots the target:
//! if a step would carry any component past the target, that component
//! lands exactly on it and its carried velocity is zeroed.

use std::ops::{Add, Mul, Sub};

use glam::{Vec2, Vec3};

/// Smallest time constant accepted. Anything lower is raised to this so the
/// spring frequency stays finite.
pub const MIN_SMOOTH_TIME: f32 = 1e-4;

/// Values that can be smooth-damped.
pub trait Dampable:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self>
{
    /// The additive identity.
    const ZERO: Self;

    /// Pins every component of `output` that crossed `target` coming from
    /// `current`, zeroing the matching component of `velocity`.
    fn pin_overshoot(current: Self, target: Self, output: &mut Self, velocity: &mut Self);
}

fn pin_component(current: f32, target: f32, output: &mut f32, velocity: &mut f32) {
    if (target - current) * (*output - target) > 0.0 {
        *output = target;
        *velocity = 0.0;
    }
}

impl Dampable for f32 {
    const ZERO: Self = 0.0;

    fn pin_overshoot(current: Self, target: Self, output: &mut Self, velocity: &mut Self) {
        pin_component(current, target, output, velocity);
    }
}

impl Dampable for Vec2 {
    const ZERO: Self = Vec2::ZERO;

    fn pin_overshoot(current: Self, target: Self, output: &mut Self, velocity: &mut Self) {
        pin_component(current.x, target.x, &mut output.x, &mut velocity.x);
        pin_component(current.y, target.y, &mut output.y, &mut velocity.y);
    }
}

impl Dampable for Vec3 {
    const ZERO: Self = Vec3::ZERO;

    fn pin_overshoot(current: Self, target: Self, output: &mut Self, velocity: &mut Self) {
        pin_component(current.x, target.x, &mut output.x, &mut velocity.x);
        pin_component(current.y, target.y, &mut output.y, &mut velocity.y);
        pin_component(current.z, target.z, &mut output.z, &mut velocity.z);
    }
}

/// Move `current` toward `target`, updating the spring `velocity` in place.
///
/// `smooth_time` is roughly the time needed to cover most of the distance.
/// A non-positive `dt` leaves both the value and the velocity untouched.
pub fn smooth_damp<T: Dampable>(
    current: T,
    target: T,
    velocity: &mut T,
    smooth_time: f32,
    dt: f32,
) -> T {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + change * omega) * dt;
    *velocity = (*velocity - temp * omega) * decay;
    let mut output = target + (change + temp) * decay;

    // Components are pinned separately so no axis can cross its target.
    T::pin_overshoot(current, target, &mut output, velocity);
    output
}

/// A value paired with its smoothing velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothed<T> {
    value: T,
    velocity: T,
}

impl<T: Dampable> Smoothed<T> {
    /// Start at rest at `value`.
    pub fn new(value: T) -> Self {
        Self {
            value,
            velocity: T::ZERO,
        }
    }

    /// Current value.
    pub fn value(&self) -> T {
        self.value
    }

    /// Current rate of change carried by the spring.
    pub fn velocity(&self) -> T {
        self.velocity
    }

    /// Replace the value, keeping the spring velocity.
    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    /// Replace the value and bring the spring to rest.
    pub fn snap(&mut self, value: T) {
        self.value = value;
        self.velocity = T::ZERO;
    }

    /// Advance one step toward `target` and return the new value.
    pub fn approach(&mut self, target: T, smooth_time: f32, dt: f32) -> T {
        self.value = smooth_damp(self.value, target, &mut self.velocity, smooth_time, dt);
        self.value
    }
}

impl<T: Dampable> Default for Smoothed<T> {
    fn default() -> Self {
        Self::new(T::ZERO)
    }
}
