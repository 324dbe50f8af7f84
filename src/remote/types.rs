use crate::control::types::{Direction, MovementCommand};
use crate::remote::sender::{RemoteError, RemoteResult};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/move`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
}

impl MoveRequest {
    /// Button/keyboard move: direction only, the server applies its own speed
    pub fn discrete(direction: Direction) -> Self {
        Self {
            direction,
            intensity: None,
            angle: None,
        }
    }
}

impl From<MovementCommand> for MoveRequest {
    fn from(command: MovementCommand) -> Self {
        Self {
            direction: command.direction,
            intensity: Some(command.intensity),
            angle: Some(command.angle_degrees),
        }
    }
}

/// Body of `POST /api/speed`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedRequest {
    pub speed: u8,
}

fn default_motor_speed() -> u8 {
    50
}

fn default_current_direction() -> String {
    "stopped".to_string()
}

/// Robot state as reported by the server.
///
/// Every field is optional on the wire; missing ones take the server's
/// startup values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotState {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub heading: f64,
    #[serde(default = "default_motor_speed")]
    pub motor_speed: u8,
    #[serde(default)]
    pub servo_angle: f64,
    #[serde(default)]
    pub camera_enabled: bool,
    #[serde(default)]
    pub is_moving: bool,
    #[serde(default = "default_current_direction")]
    pub current_direction: String,
    #[serde(default)]
    pub gps_status: Option<String>,
    #[serde(default)]
    pub battery: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl Default for RobotState {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            heading: 0.0,
            motor_speed: default_motor_speed(),
            servo_angle: 0.0,
            camera_enabled: false,
            is_moving: false,
            current_direction: default_current_direction(),
            gps_status: None,
            battery: None,
            temperature: None,
            timestamp: None,
        }
    }
}

impl RobotState {
    /// Extract the robot state from a response body.
    ///
    /// Command endpoints wrap it as `{"status": .., "state": {..}}` while
    /// `/api/status` returns it bare.
    pub fn from_response(body: serde_json::Value) -> RemoteResult<Self> {
        let inner = match body {
            serde_json::Value::Object(mut map) => match map.remove("state") {
                Some(state @ serde_json::Value::Object(_)) => state,
                _ => serde_json::Value::Object(map),
            },
            other => {
                return Err(RemoteError::InvalidResponse(format!(
                    "expected a JSON object, got {}",
                    other
                )))
            }
        };

        serde_json::from_value(inner).map_err(|e| RemoteError::InvalidResponse(e.to_string()))
    }
}
