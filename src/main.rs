// ABOUTME: Entry point for the arangodeploy CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use arangodeploy::config::{self, Config};
use arangodeploy::error::{Error, Result};
use arangodeploy::output::{Output, OutputMode};
use arangodeploy::types::DeploymentMode;
use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(OutputMode::from_flags(cli.quiet, cli.json));
    if let Err(e) = run(cli, &output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let cwd = env::current_dir()?;
    match cli.command {
        Commands::Init { name, mode, force } => {
            let mode = DeploymentMode::from(mode);
            if !mode.is_recognized() {
                return Err(Error::InvalidConfig(format!(
                    "unknown deployment mode '{}'",
                    mode
                )));
            }
            let name = match name {
                Some(name) => name,
                None => cwd
                    .file_name()
                    .map(|n| n.to_string_lossy().to_lowercase())
                    .unwrap_or_default(),
            };
            config::init_config(&cwd, &name, mode, force)?;
            output.success(&format!(
                "Created {} for deployment {}",
                config::CONFIG_FILENAME,
                name
            ));
            Ok(())
        }
        Commands::Status => {
            let config = Config::discover(&cwd)?;
            commands::status(&config, output).await
        }
        Commands::Check => {
            let config = Config::discover(&cwd)?;
            commands::check(&config, output).await
        }
        Commands::Verify { timeout } => {
            let config = Config::discover(&cwd)?;
            commands::verify(&config, timeout.map(Duration::from_secs), output).await
        }
    }
}
