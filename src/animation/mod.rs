//! Knob animation
//!
//! Purely cosmetic: the command path treats a released knob as centered
//! immediately.

pub mod knob_return;
pub mod spring;

pub use knob_return::KnobReturn;
pub use spring::{KnobSpring, SpringConfig};
