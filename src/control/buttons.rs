//! Discrete button and keyboard control
//!
//! A press sends a single direction-only move and the server keeps the robot
//! going until a stop arrives; nothing is re-sent while the key is held.

use crate::control::types::Direction;
use crate::remote::{MoveRequest, RemoteResult, RobotControl, RobotState};
use crate::status::StatusMonitor;
use std::sync::Arc;

/// What a key does on the pad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadKey {
    Move(Direction),
    Stop,
    CameraToggle,
    ServoToggle,
}

/// Map a key name (as reported by a browser `KeyboardEvent.key`, any case)
pub fn key_binding(key: &str) -> Option<PadKey> {
    match key.to_ascii_lowercase().as_str() {
        "w" | "arrowup" => Some(PadKey::Move(Direction::Forward)),
        "s" | "arrowdown" => Some(PadKey::Move(Direction::Backward)),
        "a" | "arrowleft" => Some(PadKey::Move(Direction::Left)),
        "d" | "arrowright" => Some(PadKey::Move(Direction::Right)),
        " " | "space" => Some(PadKey::Stop),
        "c" => Some(PadKey::CameraToggle),
        "v" => Some(PadKey::ServoToggle),
        _ => None,
    }
}

pub struct ButtonPad {
    control: Arc<dyn RobotControl>,
    monitor: StatusMonitor,
    moving: Option<Direction>,
}

impl ButtonPad {
    pub fn new(control: Arc<dyn RobotControl>, monitor: StatusMonitor) -> Self {
        Self {
            control,
            monitor,
            moving: None,
        }
    }

    /// Direction the robot was last confirmed to be moving in
    pub fn moving(&self) -> Option<Direction> {
        self.moving
    }

    /// Start moving; repeated presses of the held direction are ignored
    pub async fn press(&mut self, direction: Direction) {
        if self.moving == Some(direction) {
            return;
        }

        let result = self.control.send_move(&MoveRequest::discrete(direction)).await;
        if self.track(result, "starting movement").is_some() {
            self.moving = Some(direction);
        }
    }

    /// Stop if moving; a no-op otherwise
    pub async fn stop(&mut self) {
        if self.moving.is_none() {
            return;
        }

        let result = self.control.send_stop().await;
        if self.track(result, "stopping movement").is_some() {
            self.moving = None;
        }
    }

    /// Forget the moving direction without contacting the robot; used when
    /// another controller has already stopped it
    pub fn reset(&mut self) {
        self.moving = None;
    }

    pub async fn handle_key_down(&mut self, key: &str) {
        match key_binding(key) {
            Some(PadKey::Move(direction)) => self.press(direction).await,
            Some(PadKey::Stop) => self.stop().await,
            Some(PadKey::CameraToggle) => {
                let result = self.control.toggle_camera().await;
                self.track(result, "toggling camera");
            }
            Some(PadKey::ServoToggle) => {
                let result = self.control.toggle_servo().await;
                self.track(result, "toggling servo");
            }
            None => tracing::trace!("Unbound key: {:?}", key),
        }
    }

    pub async fn handle_key_up(&mut self, key: &str) {
        if let Some(PadKey::Move(_)) = key_binding(key) {
            self.stop().await;
        }
    }

    fn track(&self, result: RemoteResult<RobotState>, action: &str) -> Option<RobotState> {
        match result {
            Ok(state) => {
                self.monitor.record_success(state.clone());
                Some(state)
            }
            Err(e) => {
                tracing::warn!("Error {}: {}", action, e);
                self.monitor.record_failure(&e);
                None
            }
        }
    }
}
