//! In-process robot stand-in
//!
//! Records every command it receives and keeps a simulated robot state the
//! way the real server does (heading nudges on left/right, moving flag,
//! speed clamp, camera and servo toggles). Used for `--dry-run` and tests.

use crate::control::types::Direction;
use crate::remote::sender::{MovementSender, RemoteError, RemoteResult, RobotControl};
use crate::remote::types::{MoveRequest, RobotState};
use async_trait::async_trait;
use parking_lot::Mutex as ParkingMutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Heading change applied per left/right move
const HEADING_STEP_DEGREES: f64 = 5.0;

/// A command as received by the robot
#[derive(Debug, Clone, PartialEq)]
pub enum SentCommand {
    Move(MoveRequest),
    Stop,
    Speed(u8),
    CameraToggle,
    ServoToggle,
}

#[derive(Default)]
pub struct MemoryRobot {
    state: ParkingMutex<RobotState>,
    sent: ParkingMutex<Vec<SentCommand>>,
    offline: AtomicBool,
}

impl MemoryRobot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent request fail as if the server were unreachable
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentCommand> {
        self.sent.lock().clone()
    }

    pub fn move_count(&self) -> usize {
        self.sent
            .lock()
            .iter()
            .filter(|c| matches!(c, SentCommand::Move(_)))
            .count()
    }

    pub fn stop_count(&self) -> usize {
        self.sent
            .lock()
            .iter()
            .filter(|c| matches!(c, SentCommand::Stop))
            .count()
    }

    pub fn state(&self) -> RobotState {
        self.state.lock().clone()
    }

    fn check_online(&self) -> RemoteResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RemoteError::Unreachable("simulated outage".to_string()));
        }
        Ok(())
    }

    fn apply(&self, command: SentCommand) -> RemoteResult<RobotState> {
        // a failed request never reaches the robot, so it is not recorded
        self.check_online()?;

        let mut state = self.state.lock();
        match &command {
            SentCommand::Move(request) => {
                state.is_moving = true;
                state.current_direction = request.direction.to_string();
                match request.direction {
                    Direction::Left => {
                        state.heading = (state.heading - HEADING_STEP_DEGREES).rem_euclid(360.0)
                    }
                    Direction::Right => {
                        state.heading = (state.heading + HEADING_STEP_DEGREES).rem_euclid(360.0)
                    }
                    _ => {}
                }
            }
            SentCommand::Stop => {
                state.is_moving = false;
                state.current_direction = "stopped".to_string();
            }
            SentCommand::Speed(speed) => state.motor_speed = (*speed).min(100),
            SentCommand::CameraToggle => state.camera_enabled = !state.camera_enabled,
            SentCommand::ServoToggle => {
                state.servo_angle = if state.servo_angle == 0.0 { 180.0 } else { 0.0 }
            }
        }

        tracing::debug!("Simulated robot received {:?}", command);
        self.sent.lock().push(command);
        Ok(state.clone())
    }
}

#[async_trait]
impl MovementSender for MemoryRobot {
    async fn send_move(&self, request: &MoveRequest) -> RemoteResult<RobotState> {
        self.apply(SentCommand::Move(request.clone()))
    }

    async fn send_stop(&self) -> RemoteResult<RobotState> {
        self.apply(SentCommand::Stop)
    }
}

#[async_trait]
impl RobotControl for MemoryRobot {
    async fn fetch_status(&self) -> RemoteResult<RobotState> {
        self.check_online()?;
        Ok(self.state())
    }

    async fn set_speed(&self, speed: u8) -> RemoteResult<RobotState> {
        self.apply(SentCommand::Speed(speed))
    }

    async fn toggle_camera(&self) -> RemoteResult<RobotState> {
        self.apply(SentCommand::CameraToggle)
    }

    async fn toggle_servo(&self) -> RemoteResult<RobotState> {
        self.apply(SentCommand::ServoToggle)
    }
}
