use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bounding box of the joystick base, in host coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ZoneRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Raw pointer or touch coordinates, in host coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
}

impl PointerSample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Knob displacement from the zone center, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerOffset {
    pub dx: f64,
    pub dy: f64,
}

impl PointerOffset {
    pub const ZERO: PointerOffset = PointerOffset { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn magnitude(&self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }
}

/// Movement direction understood by the `/api/move` endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Forward,
    ForwardRight,
    Right,
    BackwardRight,
    Backward,
    BackwardLeft,
    Left,
    ForwardLeft,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Forward,
        Direction::ForwardRight,
        Direction::Right,
        Direction::BackwardRight,
        Direction::Backward,
        Direction::BackwardLeft,
        Direction::Left,
        Direction::ForwardLeft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::ForwardRight => "forward-right",
            Direction::Right => "right",
            Direction::BackwardRight => "backward-right",
            Direction::Backward => "backward",
            Direction::BackwardLeft => "backward-left",
            Direction::Left => "left",
            Direction::ForwardLeft => "forward-left",
        }
    }

    /// Sector center angle in degrees, counter-clockwise from "right"
    pub fn center_angle(&self) -> f64 {
        match self {
            Direction::Right => 0.0,
            Direction::ForwardRight => 45.0,
            Direction::Forward => 90.0,
            Direction::ForwardLeft => 135.0,
            Direction::Left => 180.0,
            Direction::BackwardLeft => 225.0,
            Direction::Backward => 270.0,
            Direction::BackwardRight => 315.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown direction: {}", s))
    }
}

/// Direction classified from a knob offset, with the angle it came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionResult {
    pub direction: Direction,
    /// Normalized to [0, 360)
    pub angle_degrees: f64,
}

/// Sector layout used to classify directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectorScheme {
    #[default]
    EightWay,
    FourWay,
}

/// Command re-sent on every emission tick while the knob is deflected
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementCommand {
    pub direction: Direction,
    /// Percent, 1..=100 while emitting
    pub intensity: u8,
    pub angle_degrees: f64,
}

/// Host input event, as fed to [`crate::control::JoystickController::dispatch`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PointerEvent {
    Resize { rect: ZoneRect },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    EmergencyStop,
}

/// Pointer event stamped with its time from the start of a trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedPointerEvent {
    pub at_ms: u64,
    pub event: PointerEvent,
}
