//! One-shot robot commands

use crate::console::TeleopConsole;
use crate::remote::RobotState;
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Fetch and print the robot status
pub async fn status(console: &TeleopConsole) -> anyhow::Result<RobotState> {
    let state = console.refresh_status().await?;
    print_json(&console.view())?;
    Ok(state)
}

/// Stop the robot regardless of what the controllers think it is doing
pub async fn stop(console: &mut TeleopConsole) -> anyhow::Result<()> {
    console.emergency_stop().await;
    print_json(&console.view().status)
}

pub async fn speed(console: &TeleopConsole, speed: u8) -> anyhow::Result<RobotState> {
    let state = console.set_speed(speed).await?;
    tracing::info!("Motor speed set to {}%", state.motor_speed);
    print_json(&state)?;
    Ok(state)
}

pub async fn camera(console: &TeleopConsole) -> anyhow::Result<RobotState> {
    let state = console.toggle_camera().await?;
    tracing::info!("Camera {}", if state.camera_enabled { "ON" } else { "OFF" });
    print_json(&state)?;
    Ok(state)
}

pub async fn servo(console: &TeleopConsole) -> anyhow::Result<RobotState> {
    let state = console.toggle_servo().await?;
    tracing::info!("Servo at {} deg", state.servo_angle);
    print_json(&state)?;
    Ok(state)
}
