//! Command-Line Interface

use crate::control::Direction;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Nautilus Console - drive the Nautilus robot from a terminal
#[derive(Parser, Debug)]
#[command(name = "nautilus-console")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the robot server URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Use a simulated robot instead of the server
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the robot status
    Status,

    /// Stop the robot
    Stop,

    /// Set motor speed (0-100)
    Speed {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        speed: u8,
    },

    /// Toggle the camera
    Camera,

    /// Toggle the servo between 0 and 180 degrees
    Servo,

    /// Hold the joystick in one direction, then release
    Move {
        /// forward, forward-right, right, backward-right, backward, backward-left, left, forward-left
        direction: Direction,

        /// Deflection beyond the dead zone, in percent
        #[arg(short, long, default_value = "100", value_parser = clap::value_parser!(u8).range(1..=100))]
        intensity: u8,

        /// How long to hold, in milliseconds
        #[arg(short, long, default_value = "1000")]
        duration_ms: u64,
    },

    /// Feed a recorded pointer trace (JSON) through the joystick
    Replay {
        /// Trace file: a JSON array of {"atMs": .., "event": {..}}
        input: PathBuf,
    },

    /// Read key events from stdin: `+w` press, `-w` release, `estop`, `mode`, `status`, `quit`
    Keys,

    /// Print the effective configuration as TOML
    Config,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
