//! Nautilus Console - teleoperation front end for the Nautilus robot.
//!
//! Turns joystick drags and key presses into movement commands for the
//! robot's HTTP control server, and tracks the state the server reports back.

pub mod animation;
pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod control;
pub mod remote;
pub mod status;
pub mod task;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging. `RUST_LOG` overrides the default filter.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "nautilus_console_lib=debug,nautilus_console=debug"
    } else {
        "nautilus_console_lib=info,nautilus_console=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
