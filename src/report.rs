// File: report.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use crate::posture::SecurityPostureSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "table" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(format!("Unsupported format: {}", other)),
        }
    }
}

pub struct ReportGenerator;

impl ReportGenerator {
    pub fn render(summary: &SecurityPostureSummary, format: ReportFormat) -> io::Result<String> {
        match format {
            ReportFormat::Text => Ok(Self::render_text(summary)),
            ReportFormat::Json => Self::render_json(summary),
            ReportFormat::Csv => Ok(Self::render_csv(summary)),
        }
    }

    pub fn generate_report(
        summary: &SecurityPostureSummary,
        output_path: &Path,
        format: ReportFormat,
    ) -> io::Result<()> {
        let content = Self::render(summary, format)?;
        let mut file = File::create(output_path)?;
        writeln!(file, "{}", content.trim_end())?;
        Ok(())
    }

    pub fn render_text(summary: &SecurityPostureSummary) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Security Score: {}/100", summary.score);
        let _ = writeln!(out, "Active Threats: {}", summary.active_threats);
        if let Some(notice) = &summary.threat_notice {
            let _ = writeln!(out, "  {}", notice);
        }
        let _ = writeln!(
            out,
            "Last Scan: {} ({})",
            summary.last_scan_age, summary.last_scan_caption
        );
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<10} {:<20} {:<16} {:>8} {:>16}",
            "ID", "Date", "Type", "Findings", "Duration"
        );
        for row in &summary.history {
            let _ = writeln!(
                out,
                "{:<10} {:<20} {:<16} {:>8} {:>16}",
                row.id, row.date, row.type_label, row.findings, row.duration
            );
        }
        out
    }

    pub fn render_json(summary: &SecurityPostureSummary) -> io::Result<String> {
        serde_json::to_string_pretty(summary).map_err(io::Error::other)
    }

    pub fn render_csv(summary: &SecurityPostureSummary) -> String {
        let mut csv = String::from("ID,Date,Type,Findings,Duration\n");
        for row in &summary.history {
            let _ = writeln!(
                csv,
                "{},{},{},{},{}",
                escape_csv(&row.id),
                escape_csv(&row.date),
                escape_csv(&row.type_label),
                row.findings,
                escape_csv(&row.duration)
            );
        }
        csv
    }
}

fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
