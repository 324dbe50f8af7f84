//! Robot server access
//!
//! The remote server owns motion, perception and device state. This module
//! only knows how to send commands to it and decode the state it reports.

pub mod http;
pub mod memory;
pub mod sender;
pub mod types;

pub use http::HttpRobotClient;
pub use memory::{MemoryRobot, SentCommand};
pub use sender::{MovementSender, RemoteError, RemoteResult, RobotControl};
pub use types::{MoveRequest, RobotState, SpeedRequest};
