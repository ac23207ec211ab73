// File: main.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use simple_logger::SimpleLogger;

use scanposture::cli::{is_default_mode, Cli, Commands, SummaryArgs};
use scanposture::commands;
use scanposture::posture::PostureAssembler;
use scanposture::store::RecordSource;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    SimpleLogger::new()
        .with_level(cli.log_level())
        .init()
        .context("Failed to initialize logger")?;

    let config = cli.to_config();
    if !config.color() {
        colored::control::set_override(false);
    }
    debug!(
        "Store {} (input file: {:?}, timeout {}s)",
        config.store_url(),
        config.input_file(),
        config.timeout()
    );

    let store = RecordSource::from_config(&config).context("Failed to set up scan record store")?;
    let assembler = PostureAssembler::new(&config);

    if is_default_mode(&cli) {
        return commands::handle_summary_command(&SummaryArgs::default(), &store, &assembler).await;
    }

    match &cli.command {
        Some(Commands::Summary(args)) => {
            commands::handle_summary_command(args, &store, &assembler).await
        }
        Some(Commands::History(args)) => {
            commands::handle_history_command(args, &store, &assembler).await
        }
        Some(Commands::Network(args)) => {
            commands::handle_network_command(args, &store, &assembler).await
        }
        None => Ok(()),
    }
}
