// File: cli.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{ConfigParameter, DEFAULT_STORE_URL};
use crate::report::ReportFormat;

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(
        long = "store-url",
        env = "SCANPOSTURE_STORE_URL",
        default_value = DEFAULT_STORE_URL,
        global = true,
        help = "Base URL of the scan result store"
    )]
    pub store_url: String,

    #[arg(
        long = "token",
        env = "SCANPOSTURE_TOKEN",
        hide_env_values = true,
        global = true,
        help = "Bearer token used to authenticate against the store"
    )]
    pub token: Option<String>,

    #[arg(
        short = 'i',
        long = "input-file",
        global = true,
        help = "Read scan records from a saved JSON file instead of the store"
    )]
    pub input_file: Option<PathBuf>,

    #[arg(
        short = 't',
        long = "timeout",
        default_value_t = 10,
        global = true,
        help = "HTTP request timeout in seconds"
    )]
    pub timeout: u64,

    #[arg(long = "log-level", default_value = "warn", global = true)]
    pub log_level: String,

    #[arg(long = "no-color", help = "Disable colored output", global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Summary(SummaryArgs),
    History(HistoryArgs),
    Network(NetworkArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    #[arg(short = 'f', long = "format", default_value = "table")]
    pub format: String,

    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    #[arg(short = 'l', long = "limit", default_value_t = 20)]
    pub limit: usize,

    #[arg(long = "format", default_value = "table")]
    pub format: String,
}

#[derive(Args, Debug, Clone)]
pub struct NetworkArgs {
    #[arg(long = "format", default_value = "table")]
    pub format: String,
}

impl Default for SummaryArgs {
    fn default() -> Self {
        Self {
            format: "table".to_string(),
            output: None,
        }
    }
}

impl SummaryArgs {
    pub fn parse_format(&self) -> Option<ReportFormat> {
        self.format.parse().ok()
    }
}

impl Cli {
    pub fn to_config(&self) -> ConfigParameter {
        let mut config = ConfigParameter::new();
        config.set_store_url(&self.store_url);
        config.set_token(self.token.clone());
        config.set_input_file(self.input_file.clone());
        config.set_timeout(self.timeout);
        config.set_color(!self.no_color);
        config
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level
            .parse()
            .unwrap_or(log::LevelFilter::Warn)
    }
}

pub fn is_default_mode(cli: &Cli) -> bool {
    cli.command.is_none()
}
