//! Nautilus Console - drive the Nautilus robot from a terminal

use anyhow::Context;
use nautilus_console_lib::cli::{Cli, Commands};
use nautilus_console_lib::commands::{drive, robot};
use nautilus_console_lib::config::ConsoleConfig;
use nautilus_console_lib::console::TeleopConsole;
use nautilus_console_lib::remote::{HttpRobotClient, MemoryRobot};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    nautilus_console_lib::init_tracing(cli.verbose);

    let mut config = ConsoleConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(base_url) = &cli.base_url {
        config.server.base_url = base_url.clone();
        config.validate()?;
    }

    if let Commands::Config = cli.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let mut console = if cli.dry_run {
        tracing::info!("Dry run: using a simulated robot");
        TeleopConsole::new(Arc::new(MemoryRobot::new()), &config)
    } else {
        let client = HttpRobotClient::new(&config.server)?;
        tracing::info!("Connecting to {}", client.base_url());
        TeleopConsole::new(Arc::new(client), &config)
    };

    match cli.command {
        Commands::Status => {
            robot::status(&console).await?;
        }
        Commands::Stop => {
            robot::stop(&mut console).await?;
        }
        Commands::Speed { speed } => {
            robot::speed(&console, speed).await?;
        }
        Commands::Camera => {
            robot::camera(&console).await?;
        }
        Commands::Servo => {
            robot::servo(&console).await?;
        }
        Commands::Move {
            direction,
            intensity,
            duration_ms,
        } => {
            drive::hold_direction(
                &mut console,
                &config.joystick,
                direction,
                intensity,
                Duration::from_millis(duration_ms),
            )
            .await?;
        }
        Commands::Replay { input } => {
            let events = drive::load_trace(&input)?;
            drive::replay_trace(&mut console, &events).await;
        }
        Commands::Keys => {
            drive::run_keys(&mut console).await?;
        }
        Commands::Config => {}
    }

    Ok(())
}
