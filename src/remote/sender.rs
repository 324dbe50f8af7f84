//! Robot command traits
//!
//! Defines the interface the controllers use to reach the robot server. The
//! joystick only needs [`MovementSender`]; the console needs the wider
//! [`RobotControl`] surface.

use crate::remote::types::{MoveRequest, RobotState};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while talking to the robot server
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status} for {path}")]
    Status { status: u16, path: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Robot unreachable: {0}")]
    Unreachable(String),
}

/// Result type for remote operations
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Movement endpoint used by the joystick and button controllers
#[async_trait]
pub trait MovementSender: Send + Sync {
    /// `POST /api/move`
    async fn send_move(&self, request: &MoveRequest) -> RemoteResult<RobotState>;

    /// `POST /api/stop`
    async fn send_stop(&self) -> RemoteResult<RobotState>;
}

/// Full robot surface used by the console
#[async_trait]
pub trait RobotControl: MovementSender {
    /// `GET /api/status`
    async fn fetch_status(&self) -> RemoteResult<RobotState>;

    /// `POST /api/speed`; the server clamps to 0..=100
    async fn set_speed(&self, speed: u8) -> RemoteResult<RobotState>;

    /// `POST /api/camera/toggle`
    async fn toggle_camera(&self) -> RemoteResult<RobotState>;

    /// `POST /api/servo/toggle`
    async fn toggle_servo(&self) -> RemoteResult<RobotState>;
}
