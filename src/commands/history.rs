// File: history.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::{bail, Result};
use chrono::Utc;
use colored::*;

use super::{print_banner, print_info, with_spinner};
use crate::cli::HistoryArgs;
use crate::metrics::HistoryRow;
use crate::posture::{load_posture, PostureAssembler};
use crate::store::RecordSource;

pub async fn execute(
    args: &HistoryArgs,
    store: &RecordSource,
    assembler: &PostureAssembler,
) -> Result<()> {
    let as_json = match args.format.to_lowercase().as_str() {
        "table" => false,
        "json" => true,
        _ => bail!("Unsupported format: {}", args.format),
    };

    let report = with_spinner(
        "Fetching scan history...",
        load_posture(store, assembler, Utc::now()),
    )
    .await;
    print_banner(&report.banner);

    let rows: Vec<&HistoryRow> = report.view.history.iter().take(args.limit).collect();
    if rows.is_empty() {
        print_info("No scan history found");
        return Ok(());
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        display_history_table(&rows, report.view.history.len());
    }

    Ok(())
}

fn display_history_table(rows: &[&HistoryRow], total: usize) {
    println!("\n{}", "Scan History".bold().underline());
    println!(
        "{:<8} {:<20} {:<16} {:>8} {:>16}",
        "ID".bold(),
        "Date".bold(),
        "Type".bold(),
        "Findings".bold(),
        "Duration".bold()
    );
    println!("{}", "─".repeat(72).dimmed());

    for row in rows {
        let findings = if row.findings > 0 {
            row.findings.to_string().red().bold()
        } else {
            row.findings.to_string().green()
        };
        println!(
            "{:<8} {:<20} {:<16} {:>8} {:>16}",
            row.id.cyan(),
            row.date,
            row.type_label,
            findings,
            row.duration
        );
    }

    if total > rows.len() {
        println!(
            "\n{}",
            format!("Showing {} of {} scans", rows.len(), total).dimmed()
        );
    }
}
