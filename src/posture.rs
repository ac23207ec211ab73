// File: posture.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use chrono::{DateTime, Utc};
use log::{error, info};
use serde::Serialize;

use crate::config::ConfigParameter;
use crate::metrics::{
    self, compute_score, count_threats, format_history, last_scan_age, HistoryRow, DEFAULT_SCORE,
};
use crate::normalizer::{
    normalize_all, FirewallProfile, InstalledSoftware, NormalizedRecord, OpenPort,
    ScoreContribution, SystemInfo,
};
use crate::record::{ScanRecord, ScanType};
use crate::store::{RecordFeed, ScanRecordStore};

/// Network score shown before any network scan has been recorded.
pub const DEFAULT_NETWORK_SCORE: u8 = 82;

/// Scores above this count as healthy.
pub const GOOD_SCORE_THRESHOLD: u8 = 70;

/// Services flagged in the port listing. Narrower than the scoring set.
pub const FLAGGED_SERVICES: &[&str] = &["SMB", "RPC"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreRating {
    Good,
    Attention,
}

impl ScoreRating {
    pub fn for_score(score: u8) -> Self {
        if score > GOOD_SCORE_THRESHOLD {
            ScoreRating::Good
        } else {
            ScoreRating::Attention
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityPostureSummary {
    pub score: u8,
    pub rating: ScoreRating,
    pub active_threats: u64,
    pub threat_notice: Option<String>,
    pub last_scan_age: String,
    pub last_scan_caption: String,
    pub history: Vec<HistoryRow>,
    pub total_scans: usize,
    pub unparseable: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PortRisk {
    #[serde(rename = "High Risk")]
    HighRisk,
    Unknown,
    Standard,
}

impl PortRisk {
    pub fn classify(port: &OpenPort) -> Self {
        if port.is_unknown() {
            PortRisk::Unknown
        } else if FLAGGED_SERVICES.contains(&port.service_name()) {
            PortRisk::HighRisk
        } else {
            PortRisk::Standard
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PortRisk::HighRisk => "High Risk",
            PortRisk::Unknown => "Unknown",
            PortRisk::Standard => "Standard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortView {
    pub port: u16,
    pub service: String,
    pub risk: PortRisk,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkPostureView {
    pub score: u8,
    pub rating: ScoreRating,
    pub last_scan_age: String,
    pub system_info: Option<SystemInfo>,
    pub open_ports: Vec<PortView>,
    pub firewall: Vec<FirewallProfile>,
    pub software: Vec<InstalledSoftware>,
    pub vulnerable_software: usize,
}

/// A summary plus the banner to show when the store could not be read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostureReport<T> {
    pub view: T,
    pub banner: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct PostureAssembler {
    default_score: u8,
    network_default_score: u8,
}

impl Default for PostureAssembler {
    fn default() -> Self {
        Self {
            default_score: DEFAULT_SCORE,
            network_default_score: DEFAULT_NETWORK_SCORE,
        }
    }
}

impl PostureAssembler {
    pub fn new(config: &ConfigParameter) -> Self {
        Self {
            default_score: config.default_score(),
            network_default_score: config.network_default_score(),
        }
    }

    pub fn assemble(&self, records: &[ScanRecord], now: DateTime<Utc>) -> SecurityPostureSummary {
        let normalized = normalize_all(records);
        self.summarize(&normalized, now)
    }

    pub fn summarize(
        &self,
        normalized: &[NormalizedRecord<'_>],
        now: DateTime<Utc>,
    ) -> SecurityPostureSummary {
        let score = compute_score(normalized, self.default_score);
        let active_threats = count_threats(normalized);

        let last_scan_caption = match metrics::latest(normalized) {
            Some(latest) => format!("{} scan completed", latest.record.kind().display_name()),
            None => "No recent scans".to_string(),
        };

        SecurityPostureSummary {
            score,
            rating: ScoreRating::for_score(score),
            active_threats,
            threat_notice: threat_notice(active_threats),
            last_scan_age: last_scan_age(normalized, now),
            last_scan_caption,
            history: format_history(normalized),
            total_scans: normalized.len(),
            unparseable: normalized.iter().filter(|r| r.outcome.is_err()).count(),
        }
    }

    pub fn network_view(&self, records: &[ScanRecord], now: DateTime<Utc>) -> NetworkPostureView {
        let normalized = normalize_all(records);
        let network: Vec<NormalizedRecord<'_>> = normalized
            .into_iter()
            .filter(|r| r.record.kind() == ScanType::Network)
            .collect();

        let last_scan_age = last_scan_age(&network, now);
        let latest = metrics::latest(&network);
        let outcome = latest.and_then(|r| r.outcome.as_ref().ok()).and_then(|o| o.as_network());

        let Some(outcome) = outcome else {
            let score = self.network_default_score;
            return NetworkPostureView {
                score,
                rating: ScoreRating::for_score(score),
                last_scan_age,
                system_info: None,
                open_ports: Vec::new(),
                firewall: Vec::new(),
                software: Vec::new(),
                vulnerable_software: 0,
            };
        };

        let score = outcome.score().unwrap_or(self.network_default_score);
        NetworkPostureView {
            score,
            rating: ScoreRating::for_score(score),
            last_scan_age,
            system_info: outcome.system_info.clone(),
            open_ports: outcome
                .open_ports
                .iter()
                .map(|p| PortView {
                    port: p.port,
                    service: p.service_name().to_string(),
                    risk: PortRisk::classify(p),
                })
                .collect(),
            firewall: outcome.firewall.clone(),
            software: outcome.software.clone(),
            vulnerable_software: outcome.vulnerable_software_count(),
        }
    }
}

fn threat_notice(active_threats: u64) -> Option<String> {
    match active_threats {
        0 => None,
        1 => Some("1 critical issue needs your attention".to_string()),
        n => Some(format!("{} critical issues need your attention", n)),
    }
}

async fn fetch_or_banner<S: ScanRecordStore>(
    store: &S,
    feed: RecordFeed,
) -> (Vec<ScanRecord>, Option<String>) {
    match store.fetch(feed).await {
        Ok(records) => (records, None),
        Err(e) => {
            error!("Could not fetch scan records: {}", e);
            (Vec::new(), Some(e.banner()))
        }
    }
}

pub async fn load_posture<S: ScanRecordStore>(
    store: &S,
    assembler: &PostureAssembler,
    now: DateTime<Utc>,
) -> PostureReport<SecurityPostureSummary> {
    let (records, banner) = fetch_or_banner(store, RecordFeed::Host).await;
    let view = assembler.assemble(&records, now);
    info!(
        "Posture score {} from {} records, {} active threats",
        view.score, view.total_scans, view.active_threats
    );
    PostureReport { view, banner }
}

pub async fn load_network_view<S: ScanRecordStore>(
    store: &S,
    assembler: &PostureAssembler,
    now: DateTime<Utc>,
) -> PostureReport<NetworkPostureView> {
    let (records, banner) = fetch_or_banner(store, RecordFeed::Network).await;
    PostureReport {
        view: assembler.network_view(&records, now),
        banner,
    }
}
