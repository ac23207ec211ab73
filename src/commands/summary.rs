// File: summary.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use colored::*;

use super::{
    colored_score, print_banner, print_info, print_success, print_warning, with_spinner,
};
use crate::cli::SummaryArgs;
use crate::posture::{load_posture, PostureAssembler, SecurityPostureSummary};
use crate::report::{ReportFormat, ReportGenerator};
use crate::store::RecordSource;

pub async fn execute(
    args: &SummaryArgs,
    store: &RecordSource,
    assembler: &PostureAssembler,
) -> Result<()> {
    let format = args
        .parse_format()
        .ok_or_else(|| anyhow!("Unsupported format: {}", args.format))?;

    let report = with_spinner(
        "Fetching scan results...",
        load_posture(store, assembler, Utc::now()),
    )
    .await;
    print_banner(&report.banner);

    match format {
        ReportFormat::Text => display_summary_table(&report.view),
        other => println!("{}", ReportGenerator::render(&report.view, other)?),
    }

    if let Some(ref output_path) = args.output {
        ReportGenerator::generate_report(&report.view, output_path, format)
            .with_context(|| format!("Failed to write report to {}", output_path.display()))?;
        print_success(&format!("Summary saved to: {}", output_path.display()));
    }

    Ok(())
}

fn display_summary_table(summary: &SecurityPostureSummary) {
    println!("\n{}", "Security Posture".bold().underline());
    println!(
        "  {:<16} {}",
        "Security Score:",
        colored_score(summary.score, summary.rating)
    );

    let threats = summary.active_threats.to_string();
    if summary.active_threats > 0 {
        println!("  {:<16} {}", "Active Threats:", threats.red().bold());
    } else {
        println!("  {:<16} {}", "Active Threats:", threats.green());
    }
    println!(
        "  {:<16} {} ({})",
        "Last Scan:", summary.last_scan_age, summary.last_scan_caption
    );

    if let Some(notice) = &summary.threat_notice {
        print_warning(notice);
    }
    if summary.unparseable > 0 {
        print_info(&format!(
            "{} of {} scan records could not be read",
            summary.unparseable, summary.total_scans
        ));
    }

    if summary.history.is_empty() {
        return;
    }

    println!("\n{}", "Recent Scans".bold().underline());
    println!(
        "  {:<8} {:<20} {:<16} {:>8} {:>16}",
        "ID".bold(),
        "Date".bold(),
        "Type".bold(),
        "Findings".bold(),
        "Duration".bold()
    );
    for row in summary.history.iter().take(5) {
        let findings = if row.findings > 0 {
            row.findings.to_string().red()
        } else {
            row.findings.to_string().normal()
        };
        println!(
            "  {:<8} {:<20} {:<16} {:>8} {:>16}",
            row.id, row.date, row.type_label, findings, row.duration
        );
    }
}
