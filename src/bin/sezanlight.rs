//! Sezanlight binary entry point
//!
//! Dispatches subcommands against the configured controller.

use clap::Parser;
use color_eyre::eyre::Result;
use sezanlight::cli::{Args, ColorCommand, Command, ConfigCommand};
use sezanlight::{commands, config::Config};

/// Initialize logging
///
/// `RUST_LOG` takes precedence; otherwise only this crate logs, at the
/// configured level. Logs go to stderr so command output stays clean.
fn init_logging(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("sezanlight={log_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(ref controller) = args.controller {
        config.override_controller(controller)?;
    }
    init_logging(&config.settings.log_level);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre for panic handling
    color_eyre::install()?;

    let args = Args::parse();
    let config = load_config(&args)?;

    run(args.command, &config).await
}

/// Dispatch a subcommand. Building the client does not contact the controller.
async fn run(command: Option<Command>, config: &Config) -> Result<()> {
    let client = commands::connect(config)?;

    match command {
        // No subcommand - show status
        None => commands::status(&client, false).await,

        Some(Command::Status { json }) => commands::status(&client, json).await,

        Some(Command::Color(ColorCommand::Get { json })) => commands::color_get(&client, json).await,

        Some(Command::Color(ColorCommand::Set { r, g, b })) => {
            commands::color_set(&client, &r, &g, &b).await
        }

        Some(Command::Config(ConfigCommand::Get { json })) => {
            commands::config_get(&client, json).await
        }

        Some(Command::Config(ConfigCommand::Set { values })) => {
            commands::config_set(&client, &values).await
        }

        Some(Command::Restart) => commands::restart(&client).await,

        Some(Command::Interactive) => commands::interactive(&client).await,

        // Local command (no controller needed)
        Some(Command::Validate) => {
            config.print_summary();
            Ok(())
        }
    }
}
