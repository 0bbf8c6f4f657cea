//! mupship CLI - build a Meteor app and ship it to Docker hosts
//!
//! Usage: mupship [--config PATH] [--settings PATH] <COMMAND>
//!
//! Commands:
//!   setup      Prepare the hosts
//!   push       Build the bundle and upload it
//!   envconfig  Upload the startup script and environment
//!   start      Start the app and verify it
//!   stop       Stop the app
//!   deploy     push, envconfig and start
//!   logs       Show container logs

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use mupship::application::{CommandContext, MeteorCommands};
use mupship::config::{assets_dir, base_path_of, Config, SettingsSource};
use mupship::domain::ports::DeployEventSink;
use mupship::infrastructure::{ConsoleEventSink, JsonEventSink, MeteorBuilder, SshEngine};
use mupship::ShipError;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    mupship::logging::init(cli.verbose);

    if let Err(err) = run(cli) {
        let code = err
            .downcast_ref::<ShipError>()
            .map(ShipError::exit_code)
            .unwrap_or(1);
        eprintln!("error: {:#}", err);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)
        .with_context(|| format!("cannot load {}", cli.config.display()))?;
    let base_path = base_path_of(&cli.config);

    let follow = matches!(cli.command, Commands::Logs { follow: true, .. });
    let ctx = CommandContext::new(config, base_path.clone(), assets_dir())
        .with_settings(SettingsSource::select(cli.settings.clone(), &base_path))
        .with_verbose(cli.verbose > 0 || follow)
        .with_cached_build(cli.command.cached_build())
        .with_logs(cli.command.logs_options());

    let events: Arc<dyn DeployEventSink> = if cli.json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(ConsoleEventSink::stdout())
    };
    let commands = MeteorCommands::new(SshEngine::new(), MeteorBuilder).with_events(events);

    match cli.command.stage() {
        Some(stage) => {
            commands.run_command(stage, &ctx)?;
        }
        None => {
            let report = commands.deploy(&ctx)?;
            tracing::info!("deploy finished: {} stage(s)", report.completed.len());
        }
    }
    Ok(())
}
