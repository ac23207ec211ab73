// File: network.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::{bail, Result};
use chrono::Utc;
use colored::*;

use super::{colored_score, print_banner, print_info, with_spinner};
use crate::cli::NetworkArgs;
use crate::posture::{load_network_view, NetworkPostureView, PortRisk, PostureAssembler};
use crate::store::RecordSource;

pub async fn execute(
    args: &NetworkArgs,
    store: &RecordSource,
    assembler: &PostureAssembler,
) -> Result<()> {
    let as_json = match args.format.to_lowercase().as_str() {
        "table" => false,
        "json" => true,
        _ => bail!("Unsupported format: {}", args.format),
    };

    let report = with_spinner(
        "Fetching network scan results...",
        load_network_view(store, assembler, Utc::now()),
    )
    .await;
    print_banner(&report.banner);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report.view)?);
    } else {
        display_network_view(&report.view);
    }

    Ok(())
}

fn display_network_view(view: &NetworkPostureView) {
    println!("\n{}", "Network Security".bold().underline());
    println!(
        "  {:<16} {}",
        "Network Score:",
        colored_score(view.score, view.rating)
    );
    println!("  {:<16} {}", "Last Scan:", view.last_scan_age);

    if let Some(info) = &view.system_info {
        println!("\n{}", "System".bold());
        println!("  {:<12} {}", "Hostname:", info.hostname);
        println!(
            "  {:<12} {} {} {}",
            "OS:", info.os_name, info.os_edition, info.os_version
        );
        println!("  {:<12} {}", "Processor:", info.processor);
        println!("  {:<12} {:.1} GB", "RAM:", info.ram_gb);
        if !info.antivirus.is_empty() {
            println!("  {:<12} {}", "Antivirus:", info.antivirus.join(", "));
        }
    }

    if view.open_ports.is_empty() {
        print_info("No open ports reported");
    } else {
        println!("\n{}", "Open Ports".bold());
        for port in &view.open_ports {
            let risk = match port.risk {
                PortRisk::HighRisk => port.risk.label().red().bold(),
                PortRisk::Unknown => port.risk.label().yellow(),
                PortRisk::Standard => port.risk.label().blue(),
            };
            println!("  {:<6} {:<16} {}", port.port, port.service, risk);
        }
    }

    if !view.firewall.is_empty() {
        println!("\n{}", "Firewall".bold());
        for profile in &view.firewall {
            let status = if profile.is_unknown() {
                profile.status.yellow()
            } else {
                profile.status.green()
            };
            println!("  {:<16} {}", profile.name, status);
        }
    }

    if !view.software.is_empty() {
        println!(
            "\n{} ({} vulnerable)",
            "Installed Software".bold(),
            view.vulnerable_software
        );
        for software in view.software.iter().take(5) {
            let state = if software.vulnerable {
                "Vulnerable".red()
            } else {
                "Secure".green()
            };
            println!("  {:<32} {:<12} {}", software.name, software.version, state);
        }
        if view.software.len() > 5 {
            println!(
                "  {}",
                format!("+{} more applications", view.software.len() - 5).dimmed()
            );
        }
    }
}
