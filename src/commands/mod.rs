// File: mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::Result;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

use crate::cli::{HistoryArgs, NetworkArgs, SummaryArgs};
use crate::posture::{PostureAssembler, ScoreRating};
use crate::store::RecordSource;

pub mod history;
pub mod network;
pub mod summary;

pub async fn handle_summary_command(
    args: &SummaryArgs,
    store: &RecordSource,
    assembler: &PostureAssembler,
) -> Result<()> {
    summary::execute(args, store, assembler).await
}

pub async fn handle_history_command(
    args: &HistoryArgs,
    store: &RecordSource,
    assembler: &PostureAssembler,
) -> Result<()> {
    history::execute(args, store, assembler).await
}

pub async fn handle_network_command(
    args: &NetworkArgs,
    store: &RecordSource,
    assembler: &PostureAssembler,
) -> Result<()> {
    network::execute(args, store, assembler).await
}

/// Runs `task` behind a spinner that is cleared once it resolves.
async fn with_spinner<F, T>(message: &str, task: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = task.await;
    spinner.finish_and_clear();
    result
}

fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

fn print_banner(banner: &Option<String>) {
    if let Some(message) = banner {
        print_error(message);
    }
}

fn colored_score(score: u8, rating: ScoreRating) -> ColoredString {
    let text = format!("{}/100", score);
    match rating {
        ScoreRating::Good => text.green().bold(),
        ScoreRating::Attention => text.yellow().bold(),
    }
}
