// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! carelog - offline-first care event logging from the command line.
//!
//! This crate wires the `carelog-sync` components to a WebSocket event store
//! and a JSONL outbox on disk, and exposes them as the `carelog` CLI.
//!
//! # Main Components
//!
//! - [`Cli`] / [`Command`] - argument parsing
//! - [`Config`] - user configuration (`config.toml`)
//! - [`run`] - executes a parsed command
//! - [`Error`] - error type with user-facing hints

mod cli;
mod commands;
mod display;
mod logging;
mod notifier;

pub mod config;
pub mod env;
pub mod error;

pub use cli::{Cli, Command, EventFieldArgs, OutputFormat, QueryArgs};
pub use config::Config;
pub use error::{Error, Result};

use commands::Services;

/// Execute a parsed command line.
///
/// Loads the config, installs logging and runs the command on a fresh tokio
/// runtime.
pub fn run(cli: Cli) -> Result<()> {
    let config_path = config::config_path(cli.config.as_deref())?;
    let config = Config::load(&config_path)?;
    logging::setup_logging(cli.verbose, config.log_file.as_deref());

    if let Command::Config = cli.command {
        return commands::config::run(&config_path, &config);
    }

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Config(format!("failed to start runtime: {}", e)))?;
    rt.block_on(async {
        let services = Services::open(&config)?;
        let result = run_command(&services, &config, cli.command).await;
        services.shutdown().await;
        result
    })
}

async fn run_command(services: &Services, config: &Config, command: Command) -> Result<()> {
    match command {
        Command::Record {
            event_type,
            patient,
            created_by,
            fields,
            output,
        } => commands::record::run(services, event_type, patient, created_by, fields, output).await,
        Command::Sync { output } => commands::sync::run(services, output).await,
        Command::Status { output } => commands::status::run(services, output).await,
        Command::Pending { output } => commands::pending::run(services, output).await,
        Command::Update { id, fields, output } => {
            commands::update::update(services, id, fields, output).await
        }
        Command::Delete { id } => commands::update::delete(services, id).await,
        Command::List { query, output } => commands::list::run(services, query, output).await,
        Command::Watch => commands::watch::run(services, &config.sync).await,
        Command::Config => Ok(()),
    }
}
