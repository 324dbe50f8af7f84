//! Teleoperation console
//!
//! Owns the joystick, the button pad, the status monitor and the robot
//! client, and routes host input to whichever control mode is active.

use crate::config::ConsoleConfig;
use crate::control::{ButtonPad, JoystickController, JoystickReading};
use crate::remote::{MovementSender, RemoteResult, RobotControl, RobotState};
use crate::status::{spawn_status_poller, StatusMonitor, StatusSnapshot};
use crate::task::RepeatingTask;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    #[default]
    Joystick,
    Buttons,
}

/// Everything a status display needs in one read
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleView {
    pub mode: ControlMode,
    pub joystick: JoystickReading,
    pub status: StatusSnapshot,
}

pub struct TeleopConsole {
    mode: ControlMode,
    joystick: JoystickController,
    pad: ButtonPad,
    control: Arc<dyn RobotControl>,
    monitor: StatusMonitor,
    poll_interval: Duration,
    poller: Option<RepeatingTask>,
}

impl TeleopConsole {
    pub fn new<C>(client: Arc<C>, config: &ConsoleConfig) -> Self
    where
        C: RobotControl + 'static,
    {
        let monitor = StatusMonitor::new();
        let sender: Arc<dyn MovementSender> = client.clone();
        let control: Arc<dyn RobotControl> = client;

        Self {
            mode: ControlMode::default(),
            joystick: JoystickController::new(config.joystick.clone(), sender, monitor.clone()),
            pad: ButtonPad::new(control.clone(), monitor.clone()),
            control,
            monitor,
            poll_interval: config.status.poll_interval(),
            poller: None,
        }
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn joystick(&mut self) -> &mut JoystickController {
        &mut self.joystick
    }

    pub fn pad(&mut self) -> &mut ButtonPad {
        &mut self.pad
    }

    pub fn monitor(&self) -> &StatusMonitor {
        &self.monitor
    }

    pub fn view(&self) -> ConsoleView {
        ConsoleView {
            mode: self.mode,
            joystick: self.joystick.reading(),
            status: self.monitor.snapshot(),
        }
    }

    /// Switch between joystick and button control, stopping any movement
    pub async fn toggle_control_mode(&mut self) -> ControlMode {
        self.stop_all().await;
        self.mode = match self.mode {
            ControlMode::Joystick => ControlMode::Buttons,
            ControlMode::Buttons => ControlMode::Joystick,
        };
        tracing::info!("Control mode: {:?}", self.mode);
        self.mode
    }

    /// The host view was hidden; nobody is watching the robot
    pub async fn on_visibility_hidden(&mut self) {
        tracing::info!("Console hidden, stopping movement");
        self.stop_all().await;
    }

    pub async fn emergency_stop(&mut self) {
        self.joystick.emergency_stop().await;
        // the joystick's stop already halted the robot
        self.pad.reset();
    }

    pub async fn handle_key_down(&mut self, key: &str) {
        self.pad.handle_key_down(key).await;
    }

    pub async fn handle_key_up(&mut self, key: &str) {
        self.pad.handle_key_up(key).await;
    }

    /// Start polling `/api/status` in the background
    pub fn start_status_updates(&mut self) {
        if self.poller.is_some() {
            return;
        }
        self.poller = Some(spawn_status_poller(
            self.control.clone(),
            self.monitor.clone(),
            self.poll_interval,
        ));
    }

    pub fn stop_status_updates(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.cancel();
        }
    }

    pub async fn refresh_status(&self) -> RemoteResult<RobotState> {
        self.track(self.control.fetch_status().await)
    }

    pub async fn set_speed(&self, speed: u8) -> RemoteResult<RobotState> {
        self.track(self.control.set_speed(speed).await)
    }

    pub async fn toggle_camera(&self) -> RemoteResult<RobotState> {
        self.track(self.control.toggle_camera().await)
    }

    pub async fn toggle_servo(&self) -> RemoteResult<RobotState> {
        self.track(self.control.toggle_servo().await)
    }

    async fn stop_all(&mut self) {
        self.joystick.end().await;
        self.pad.stop().await;
    }

    fn track(&self, result: RemoteResult<RobotState>) -> RemoteResult<RobotState> {
        match &result {
            Ok(state) => self.monitor.record_success(state.clone()),
            Err(e) => self.monitor.record_failure(e),
        }
        result
    }
}
