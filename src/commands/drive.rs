//! Joystick-driving commands
//!
//! These feed the console the same input a browser bridge would: a zone
//! layout, pointer samples and key events.

use crate::config::JoystickConfig;
use crate::console::TeleopConsole;
use crate::control::{deflection_for, Direction, JoystickGeometry, TimedPointerEvent, ZoneRect};
use anyhow::Context;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Base layout used when no host supplies one: 200px square at the origin
pub const DEFAULT_ZONE: ZoneRect = ZoneRect {
    left: 0.0,
    top: 0.0,
    width: 200.0,
    height: 200.0,
};

/// Hold the knob toward `direction` at `intensity` for `duration`, then release
pub async fn hold_direction(
    console: &mut TeleopConsole,
    config: &JoystickConfig,
    direction: Direction,
    intensity: u8,
    duration: Duration,
) -> anyhow::Result<usize> {
    let geometry = JoystickGeometry::from_rect(&DEFAULT_ZONE, config.knob_radius);
    if geometry.is_degenerate() {
        anyhow::bail!(
            "knob radius {} leaves no room to move in the default zone",
            config.knob_radius
        );
    }

    let offset = deflection_for(direction, intensity, geometry.max_distance(), config.dead_zone);
    let sample = geometry.sample_at(&offset);

    tracing::info!(
        "Holding {} at {}% for {:?}",
        direction,
        intensity,
        duration
    );

    let joystick = console.joystick();
    joystick.on_resize(DEFAULT_ZONE);
    joystick.on_pointer_down(sample).await;
    let reading = joystick.reading();
    tokio::time::sleep(duration).await;
    joystick.on_pointer_up().await;

    tracing::info!(
        "Released after {:?} ({:?} at {}%)",
        duration,
        reading.direction.map(|d| d.direction),
        reading.intensity
    );
    Ok(usize::from(reading.intensity))
}

/// Load a recorded pointer trace
pub fn load_trace(path: &Path) -> anyhow::Result<Vec<TimedPointerEvent>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read trace file {}", path.display()))?;
    let mut events: Vec<TimedPointerEvent> =
        serde_json::from_str(&content).context("Failed to parse pointer trace")?;
    events.sort_by_key(|e| e.at_ms);
    Ok(events)
}

/// Replay a pointer trace with its original timing.
///
/// A trace that ends mid-drag is released so the robot is never left moving.
pub async fn replay_trace(console: &mut TeleopConsole, events: &[TimedPointerEvent]) -> usize {
    tracing::info!("Replaying {} pointer events", events.len());

    let start = tokio::time::Instant::now();
    for timed in events {
        tokio::time::sleep_until(start + Duration::from_millis(timed.at_ms)).await;
        console.joystick().dispatch(timed.event).await;
    }

    if console.joystick().phase().is_dragging() {
        tracing::warn!("Trace ended mid-drag, releasing joystick");
        console.joystick().on_pointer_up().await;
    }
    events.len()
}

/// One parsed line of the `keys` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyLine {
    Press(String),
    Release(String),
    EmergencyStop,
    ToggleMode,
    Status,
    Quit,
}

pub fn parse_key_line(line: &str) -> Option<KeyLine> {
    let line = line.trim();
    if let Some(key) = line.strip_prefix('+') {
        return (!key.is_empty()).then(|| KeyLine::Press(key.to_string()));
    }
    if let Some(key) = line.strip_prefix('-') {
        return (!key.is_empty()).then(|| KeyLine::Release(key.to_string()));
    }
    match line {
        "estop" => Some(KeyLine::EmergencyStop),
        "mode" => Some(KeyLine::ToggleMode),
        "status" => Some(KeyLine::Status),
        "quit" | "exit" => Some(KeyLine::Quit),
        _ => None,
    }
}

/// Drive the button pad from stdin until EOF or `quit`
pub async fn run_keys(console: &mut TeleopConsole) -> anyhow::Result<()> {
    console.start_status_updates();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_key_line(&line) {
            Some(KeyLine::Press(key)) => console.handle_key_down(&key).await,
            Some(KeyLine::Release(key)) => console.handle_key_up(&key).await,
            Some(KeyLine::EmergencyStop) => console.emergency_stop().await,
            Some(KeyLine::ToggleMode) => {
                let mode = console.toggle_control_mode().await;
                println!("mode: {:?}", mode);
            }
            Some(KeyLine::Status) => {
                println!("{}", serde_json::to_string_pretty(&console.view())?);
            }
            Some(KeyLine::Quit) => break,
            None => {
                if !line.trim().is_empty() {
                    tracing::warn!("Unrecognized input: {:?}", line);
                }
            }
        }
    }

    // leaving the session counts as hiding the console
    console.on_visibility_hidden().await;
    console.stop_status_updates();
    Ok(())
}
