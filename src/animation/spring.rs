//! Damped spring used to ease the joystick knob back to center
//!
//! F = -k * x - c * v, integrated with semi-implicit Euler steps.

use crate::control::types::PointerOffset;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

impl Default for SpringConfig {
    /// Slightly under-damped; settles in roughly a third of a second
    fn default() -> Self {
        Self {
            stiffness: 470.0,
            damping: 70.0,
            mass: 3.0,
        }
    }
}

/// Knob position and velocity under a spring pulling toward a target
#[derive(Debug, Clone, Copy)]
pub struct KnobSpring {
    position: PointerOffset,
    velocity: PointerOffset,
}

impl KnobSpring {
    pub fn new(start: PointerOffset) -> Self {
        Self {
            position: start,
            velocity: PointerOffset::ZERO,
        }
    }

    /// Advance by `dt` seconds toward `target`
    pub fn step(&mut self, target: PointerOffset, config: &SpringConfig, dt: f64) {
        let acceleration = |offset: f64, velocity: f64| {
            (-config.stiffness * offset - config.damping * velocity) / config.mass
        };
        let ax = acceleration(self.position.dx - target.dx, self.velocity.dx);
        let ay = acceleration(self.position.dy - target.dy, self.velocity.dy);

        self.velocity = PointerOffset::new(self.velocity.dx + ax * dt, self.velocity.dy + ay * dt);
        self.position = PointerOffset::new(
            self.position.dx + self.velocity.dx * dt,
            self.position.dy + self.velocity.dy * dt,
        );
    }

    pub fn position(&self) -> PointerOffset {
        self.position
    }

    /// Within `threshold` pixels of `target` and moving slower than
    /// `threshold` pixels per second
    pub fn is_settled(&self, target: PointerOffset, threshold: f64) -> bool {
        let distance =
            PointerOffset::new(self.position.dx - target.dx, self.position.dy - target.dy).magnitude();
        distance < threshold && self.velocity.magnitude() < threshold
    }
}
