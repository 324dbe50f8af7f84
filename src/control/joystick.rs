//! Virtual joystick controller
//!
//! Turns pointer/touch samples into a direction and an intensity, and keeps a
//! movement command flowing to the robot while the knob is held outside the
//! dead zone.
//!
//! States: `Idle` -> dragging -> `Idle`. While dragging the controller is
//! either `Emitting` (intensity > 0, emission loop running) or `Suspended`
//! (inside the dead zone, loop stopped). Every exit from `Emitting` sends
//! exactly one stop command.

use crate::animation::KnobReturn;
use crate::config::JoystickConfig;
use crate::control::emitter::{spawn_emission_loop, CommandSlot, EmissionLoop};
use crate::control::mapper::{classify_direction, clamp_offset, compute_intensity, JoystickGeometry};
use crate::control::types::{
    DirectionResult, MovementCommand, PointerEvent, PointerOffset, PointerSample, ZoneRect,
};
use crate::remote::MovementSender;
use crate::status::StatusMonitor;
use serde::Serialize;
use std::sync::Arc;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JoystickPhase {
    Idle,
    /// Dragging outside the dead zone; commands are being emitted
    Emitting,
    /// Dragging inside the dead zone
    Suspended,
}

impl JoystickPhase {
    pub fn is_dragging(&self) -> bool {
        !matches!(self, JoystickPhase::Idle)
    }
}

/// Current joystick output, for status display
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoystickReading {
    pub phase: JoystickPhase,
    pub offset: PointerOffset,
    pub direction: Option<DirectionResult>,
    pub intensity: u8,
}

#[derive(Debug, Clone, Copy)]
struct Evaluation {
    offset: PointerOffset,
    direction: Option<DirectionResult>,
    intensity: u8,
}

impl Evaluation {
    const NEUTRAL: Evaluation = Evaluation {
        offset: PointerOffset::ZERO,
        direction: None,
        intensity: 0,
    };

    fn command(&self) -> Option<MovementCommand> {
        if self.intensity == 0 {
            return None;
        }
        self.direction.map(|d| MovementCommand {
            direction: d.direction,
            intensity: self.intensity,
            angle_degrees: d.angle_degrees,
        })
    }
}

pub struct JoystickController {
    config: JoystickConfig,
    sender: Arc<dyn MovementSender>,
    monitor: StatusMonitor,

    layout: Option<ZoneRect>,
    geometry: Option<JoystickGeometry>,

    phase: JoystickPhase,
    offset: PointerOffset,
    direction: Option<DirectionResult>,
    intensity: u8,
    last_update: Option<Instant>,
    /// Latest throttled sample and when its window closes
    pending: Option<(Evaluation, Instant)>,

    command: CommandSlot,
    emission: Option<EmissionLoop>,
    knob_return: Option<KnobReturn>,
}

impl JoystickController {
    pub fn new(config: JoystickConfig, sender: Arc<dyn MovementSender>, monitor: StatusMonitor) -> Self {
        Self {
            config,
            sender,
            monitor,
            layout: None,
            geometry: None,
            phase: JoystickPhase::Idle,
            offset: PointerOffset::ZERO,
            direction: None,
            intensity: 0,
            last_update: None,
            pending: None,
            command: CommandSlot::default(),
            emission: None,
            knob_return: None,
        }
    }

    /// Record the base's current layout. The clamp radius follows it from the
    /// next pointer sample on, including mid-drag.
    pub fn on_resize(&mut self, rect: ZoneRect) {
        let geometry = JoystickGeometry::from_rect(&rect, self.config.knob_radius);
        tracing::debug!(
            "Joystick zone resized: center=({:.1}, {:.1}) max_distance={:.1}",
            geometry.center_x,
            geometry.center_y,
            geometry.max_distance()
        );
        self.layout = Some(rect);
        self.geometry = Some(geometry);
    }

    pub async fn on_pointer_down(&mut self, sample: PointerSample) {
        self.begin(sample).await;
    }

    pub async fn on_pointer_move(&mut self, sample: PointerSample) {
        self.update(sample).await;
    }

    pub async fn on_pointer_up(&mut self) {
        self.end().await;
    }

    pub async fn dispatch(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Resize { rect } => self.on_resize(rect),
            PointerEvent::Down { x, y } => self.on_pointer_down(PointerSample::new(x, y)).await,
            PointerEvent::Move { x, y } => self.on_pointer_move(PointerSample::new(x, y)).await,
            PointerEvent::Up => self.on_pointer_up().await,
            PointerEvent::EmergencyStop => self.emergency_stop().await,
        }
    }

    /// Start a drag at `sample`.
    ///
    /// Without a usable layout the press is ignored and the controller stays
    /// idle.
    pub async fn begin(&mut self, sample: PointerSample) {
        if self.phase.is_dragging() {
            self.update(sample).await;
            return;
        }

        let Some(rect) = self.layout else {
            tracing::warn!("Joystick zone layout unknown; ignoring pointer down");
            return;
        };

        let geometry = JoystickGeometry::from_rect(&rect, self.config.knob_radius);
        if geometry.is_degenerate() {
            tracing::warn!("Joystick zone {:?} too small for knob; input inactive", rect);
            return;
        }

        self.geometry = Some(geometry);
        self.knob_return = None;
        self.phase = JoystickPhase::Suspended;
        self.last_update = Some(Instant::now());
        tracing::info!("Joystick drag started");

        let evaluation = self.evaluate(&sample);
        self.apply(evaluation).await;
    }

    /// Move the knob to `sample`.
    ///
    /// Samples closer than `min_update_interval` to the last accepted one are
    /// held back until that window closes, and only the latest held sample
    /// survives. A sample crossing the dead-zone edge is never held, so an
    /// entry into the dead zone stops the robot at once.
    pub async fn update(&mut self, sample: PointerSample) {
        if !self.phase.is_dragging() {
            return;
        }

        let now = Instant::now();
        self.settle_pending(now);
        let evaluation = self.evaluate(&sample);

        let window_end = self
            .last_update
            .map(|last| last + self.config.min_update_interval())
            .filter(|end| now < *end);
        let crosses_dead_zone = (evaluation.intensity > 0) != (self.phase == JoystickPhase::Emitting);

        if let Some(due) = window_end.filter(|_| !crosses_dead_zone) {
            tracing::trace!("Joystick sample held by throttle until {:?}", due);
            self.pending = Some((evaluation, due));
            if let Some(command) = evaluation.command() {
                self.command.lock().defer(command, due);
            }
            return;
        }

        self.pending = None;
        self.last_update = Some(now);
        self.apply(evaluation).await;
    }

    /// Release the knob: it eases back to center and movement stops
    pub async fn end(&mut self) {
        if !self.phase.is_dragging() {
            return;
        }

        let released_at = self.latest().offset;
        self.reset_to_neutral();
        self.knob_return = Some(KnobReturn::start(
            released_at,
            Instant::now(),
            self.config.return_duration(),
        ));
        tracing::info!("Joystick released");

        self.stop_movement().await;
    }

    /// Stop immediately from any state, including idle and mid-animation.
    /// Sends exactly one stop command.
    pub async fn emergency_stop(&mut self) {
        self.reset_to_neutral();
        self.knob_return = None;
        tracing::warn!("Emergency stop activated");

        self.stop_movement().await;
    }

    pub fn phase(&self) -> JoystickPhase {
        self.phase
    }

    pub fn current_direction(&self) -> Option<DirectionResult> {
        self.latest().direction
    }

    pub fn current_intensity(&self) -> u8 {
        self.latest().intensity
    }

    pub fn reading(&self) -> JoystickReading {
        let latest = self.latest();
        JoystickReading {
            phase: self.phase,
            offset: latest.offset,
            direction: latest.direction,
            intensity: latest.intensity,
        }
    }

    /// Where to draw the knob right now
    pub fn knob_position(&self) -> PointerOffset {
        if self.phase.is_dragging() {
            return self.latest().offset;
        }
        self.knob_return
            .map(|animation| animation.position_at(Instant::now()))
            .unwrap_or(PointerOffset::ZERO)
    }

    /// Applied state, or the held sample once its window has closed
    fn latest(&self) -> Evaluation {
        match self.pending {
            Some((evaluation, due)) if Instant::now() >= due => evaluation,
            _ => Evaluation {
                offset: self.offset,
                direction: self.direction,
                intensity: self.intensity,
            },
        }
    }

    /// Fold in a held sample whose window has closed. It never crosses the
    /// dead-zone edge, so the phase and the emission loop are unaffected.
    fn settle_pending(&mut self, now: Instant) {
        let Some((evaluation, due)) = self.pending else {
            return;
        };
        if now < due {
            return;
        }

        self.pending = None;
        self.offset = evaluation.offset;
        self.direction = evaluation.direction;
        self.intensity = evaluation.intensity;
        self.last_update = Some(due);
    }

    fn evaluate(&self, sample: &PointerSample) -> Evaluation {
        let Some(geometry) = self.geometry.filter(|g| !g.is_degenerate()) else {
            return Evaluation::NEUTRAL;
        };

        let max_distance = geometry.max_distance();
        let offset = clamp_offset(geometry.offset_of(sample), max_distance);
        let intensity = compute_intensity(offset.magnitude(), max_distance, self.config.dead_zone);
        let direction =
            (intensity > 0).then(|| classify_direction(offset.dx, offset.dy, self.config.sectors));

        Evaluation {
            offset,
            direction,
            intensity,
        }
    }

    async fn apply(&mut self, evaluation: Evaluation) {
        self.offset = evaluation.offset;
        self.direction = evaluation.direction;
        self.intensity = evaluation.intensity;

        match evaluation.command() {
            Some(command) => {
                self.command.lock().set(Some(command));
                if self.phase != JoystickPhase::Emitting {
                    self.phase = JoystickPhase::Emitting;
                    self.start_movement();
                }
            }
            None => {
                if self.phase == JoystickPhase::Emitting {
                    self.phase = JoystickPhase::Suspended;
                    self.stop_movement().await;
                }
            }
        }
    }

    fn reset_to_neutral(&mut self) {
        self.phase = JoystickPhase::Idle;
        self.offset = PointerOffset::ZERO;
        self.direction = None;
        self.intensity = 0;
        self.last_update = None;
        self.pending = None;
    }

    fn start_movement(&mut self) {
        if self.emission.is_some() {
            return;
        }

        self.emission = Some(spawn_emission_loop(
            self.sender.clone(),
            self.command.clone(),
            self.monitor.clone(),
            self.config.emission_period(),
        ));
    }

    /// Cancel the loop and clear the command before yielding, then send one stop
    async fn stop_movement(&mut self) {
        if let Some(task) = self.emission.take() {
            task.cancel();
        }
        self.command.lock().clear();

        match self.sender.send_stop().await {
            Ok(state) => self.monitor.record_success(state),
            Err(e) => {
                tracing::warn!("Stop command error: {}", e);
                self.monitor.record_failure(&e);
            }
        }
    }
}
