//! Operator input
//!
//! The joystick maps pointer/touch drags to a direction plus intensity and
//! re-sends it on a fixed cadence; the button pad maps keys to discrete
//! moves. Hosts feed both through plain method calls, so the same code runs
//! behind a browser bridge, a terminal or a test.

pub mod buttons;
pub mod emitter;
pub mod joystick;
pub mod mapper;
pub mod types;

pub use buttons::{key_binding, ButtonPad, PadKey};
pub use joystick::{JoystickController, JoystickPhase, JoystickReading};
pub use mapper::{classify_direction, clamp_offset, compute_intensity, deflection_for, JoystickGeometry};
pub use types::{
    Direction, DirectionResult, MovementCommand, PointerEvent, PointerOffset, PointerSample,
    SectorScheme, TimedPointerEvent, ZoneRect,
};
