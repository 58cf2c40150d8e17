pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod handicap;
pub mod report;
pub mod services;

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use log::info;

use crate::cli::{Cli, Command, RunArgs};
use crate::config::AppConfig;
use crate::config::settings::{ImportSettings, PathSettings};
use crate::services::{IngestionLoop, Pipeline};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn build_config(args: &RunArgs) -> Result<AppConfig> {
    database::schema::validate_registry()?;

    let paths = PathSettings {
        export_file: args.export_file.clone(),
        rules_file: args.rules_path.clone(),
        database_file: args.database.clone(),
        output_file: args.output_path.clone(),
        fonts_dir: args.fonts.clone(),
    };
    let import = ImportSettings {
        delimiter: args.delimiter.clone(),
        poll_interval: Duration::from_secs(args.frequency),
    };

    let config = AppConfig::new(paths, import, args.rating, args.layout, args.timestamp)?;
    Ok(config)
}

pub fn handle_watch(args: &RunArgs) -> Result<()> {
    let config = build_config(args)?;
    let shutdown = install_interrupt_handler()?;

    let mut watcher = IngestionLoop::new(&config);
    watcher.run(&shutdown)?;
    Ok(())
}

pub fn handle_once(args: &RunArgs) -> Result<()> {
    let config = build_config(args)?;
    let report = Pipeline::new(&config).run_cycle()?;

    match report.output {
        Some(path) => info!("Report written to {}", path.display()),
        None => info!("Nothing to render"),
    }
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}

fn install_interrupt_handler() -> Result<Arc<AtomicBool>> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();

    ctrlc::set_handler(move || {
        info!("Received Ctrl+C, stopping after the current cycle...");
        flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl+C handler")?;

    Ok(shutdown)
}
