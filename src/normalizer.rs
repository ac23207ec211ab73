// File: normalizer.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

use crate::record::{RawResult, ScanRecord, ScanType};

/// Services whose exposure costs the most score points.
pub const HIGH_RISK_SERVICES: &[&str] = &["SMB", "RPC", "MySQL"];

pub const RISKY_PORT_PENALTY: f64 = 5.0;
pub const UNKNOWN_PORT_PENALTY: f64 = 3.0;
pub const FIREWALL_UNKNOWN_PENALTY: f64 = 10.0;
pub const VULNERABLE_SOFTWARE_PENALTY: f64 = 8.0;

const FIREWALL_PROFILES: &[(&str, &str)] = &[
    ("Domain Profile", "Domain"),
    ("Private Profile", "Private"),
    ("Public Profile", "Public"),
];

const NETWORK_KEYS: &[&str] = &[
    "system_info",
    "firewall_status",
    "open_ports",
    "installed_software",
];

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeError {
    Decode(String),
    ShapeMismatch {
        scan_type: String,
        expected_key: String,
    },
    UnsupportedType(String),
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "Malformed scan result: {}", e),
            Self::ShapeMismatch {
                scan_type,
                expected_key,
            } => write!(
                f,
                "Scan result for type '{}' lacks the '{}' section",
                scan_type, expected_key
            ),
            Self::UnsupportedType(tag) => write!(f, "Unsupported scan type: {}", tag),
        }
    }
}

impl std::error::Error for NormalizeError {}

impl From<serde_json::Error> for NormalizeError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

/// Anything that can be turned into a 0-100 score on its own.
pub trait ScoreContribution {
    /// `None` when the inputs cannot produce a finite score.
    fn score(&self) -> Option<u8>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedScanOutcome {
    pub infected_count: u64,
    pub scanned_files: u64,
    pub skipped_files: u64,
    pub duration_seconds: Option<f64>,
}

impl NormalizedScanOutcome {
    pub fn relevant_files(&self) -> u64 {
        self.scanned_files.saturating_sub(self.skipped_files)
    }

    pub fn infection_rate(&self) -> Option<f64> {
        let relevant = self.relevant_files();
        if relevant == 0 {
            return None;
        }
        Some(self.infected_count as f64 / relevant as f64 * 100.0)
    }
}

impl ScoreContribution for NormalizedScanOutcome {
    fn score(&self) -> Option<u8> {
        let score = match self.infection_rate() {
            Some(rate) => 100.0 - rate,
            None => 100.0,
        };
        clamp_score(score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenPort {
    pub port: u16,
    pub service: Option<String>,
}

impl OpenPort {
    pub fn is_high_risk(&self) -> bool {
        self.service
            .as_deref()
            .map(|s| HIGH_RISK_SERVICES.contains(&s))
            .unwrap_or(false)
    }

    pub fn is_unknown(&self) -> bool {
        match self.service.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(s) => s.eq_ignore_ascii_case("unknown"),
        }
    }

    pub fn service_name(&self) -> &str {
        match self.service.as_deref() {
            Some(s) if !s.trim().is_empty() => s,
            _ => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FirewallProfile {
    pub name: String,
    pub status: String,
}

impl FirewallProfile {
    pub fn is_unknown(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("unknown")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstalledSoftware {
    pub name: String,
    pub version: String,
    pub vulnerable: bool,
    pub vulnerability_info: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemInfo {
    pub hostname: String,
    pub os_name: String,
    pub os_version: String,
    pub os_edition: String,
    pub platform: String,
    pub processor: String,
    pub ram_gb: f64,
    pub antivirus: Vec<String>,
    pub username: String,
    pub scan_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkPostureOutcome {
    pub open_ports: Vec<OpenPort>,
    pub firewall: Vec<FirewallProfile>,
    pub software: Vec<InstalledSoftware>,
    pub system_info: Option<SystemInfo>,
}

impl NetworkPostureOutcome {
    pub fn open_port_count(&self) -> usize {
        self.open_ports.len()
    }

    pub fn risky_port_count(&self) -> usize {
        self.open_ports.iter().filter(|p| p.is_high_risk()).count()
    }

    pub fn unknown_port_count(&self) -> usize {
        self.open_ports.iter().filter(|p| p.is_unknown()).count()
    }

    pub fn vulnerable_software_count(&self) -> usize {
        self.software.iter().filter(|s| s.vulnerable).count()
    }

    pub fn firewall_unknown_profile_count(&self) -> usize {
        self.firewall.iter().filter(|p| p.is_unknown()).count()
    }
}

impl ScoreContribution for NetworkPostureOutcome {
    fn score(&self) -> Option<u8> {
        let mut score = 100.0;
        score -= self.risky_port_count() as f64 * RISKY_PORT_PENALTY;
        score -= self.unknown_port_count() as f64 * UNKNOWN_PORT_PENALTY;
        if self.firewall_unknown_profile_count() > 0 {
            score -= FIREWALL_UNKNOWN_PENALTY;
        }
        score -= self.vulnerable_software_count() as f64 * VULNERABLE_SOFTWARE_PENALTY;
        clamp_score(score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScanOutcome {
    Host(NormalizedScanOutcome),
    Network(NetworkPostureOutcome),
}

impl ScanOutcome {
    pub fn infected_count(&self) -> u64 {
        match self {
            ScanOutcome::Host(outcome) => outcome.infected_count,
            ScanOutcome::Network(_) => 0,
        }
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        match self {
            ScanOutcome::Host(outcome) => outcome.duration_seconds,
            ScanOutcome::Network(_) => None,
        }
    }

    pub fn as_network(&self) -> Option<&NetworkPostureOutcome> {
        match self {
            ScanOutcome::Network(outcome) => Some(outcome),
            ScanOutcome::Host(_) => None,
        }
    }
}

impl ScoreContribution for ScanOutcome {
    fn score(&self) -> Option<u8> {
        match self {
            ScanOutcome::Host(outcome) => outcome.score(),
            ScanOutcome::Network(outcome) => outcome.score(),
        }
    }
}

/// A record paired with the result of normalizing it.
#[derive(Debug, Clone)]
pub struct NormalizedRecord<'a> {
    pub record: &'a ScanRecord,
    pub outcome: Result<ScanOutcome, NormalizeError>,
}

impl<'a> NormalizedRecord<'a> {
    pub fn new(record: &'a ScanRecord) -> Self {
        Self {
            record,
            outcome: normalize(record),
        }
    }

    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        self.record.uploaded_at
    }

    /// Failed records stand in as an all-zero host outcome.
    pub fn outcome_or_zero(&self) -> Cow<'_, ScanOutcome> {
        match &self.outcome {
            Ok(outcome) => Cow::Borrowed(outcome),
            Err(_) => Cow::Owned(ScanOutcome::Host(NormalizedScanOutcome::default())),
        }
    }

    pub fn is_decode_failure(&self) -> bool {
        matches!(self.outcome, Err(NormalizeError::Decode(_)))
    }
}

type NormalizeFn = fn(&Value) -> Result<ScanOutcome, NormalizeError>;

static NORMALIZERS: &[(&str, NormalizeFn)] = &[
    ("directory", normalize_directory),
    ("quick", normalize_quick),
    ("full", normalize_full),
    ("network", normalize_network),
];

fn normalizer_for(scan_type: &ScanType) -> Option<NormalizeFn> {
    NORMALIZERS
        .iter()
        .find(|(tag, _)| *tag == scan_type.as_str())
        .map(|(_, f)| *f)
}

pub fn supported_scan_types() -> Vec<ScanType> {
    NORMALIZERS
        .iter()
        .map(|(tag, _)| ScanType::from(*tag))
        .collect()
}

/// Decodes the raw result into a JSON object. Anything else, including a
/// missing or `null` result, is a decode failure.
pub fn decode_payload(raw: &RawResult) -> Result<Cow<'_, Value>, NormalizeError> {
    let payload = match raw {
        RawResult::Encoded(text) => Cow::Owned(serde_json::from_str(text)?),
        RawResult::Structured(value) => Cow::Borrowed(value),
    };
    if payload.is_object() {
        Ok(payload)
    } else {
        Err(NormalizeError::Decode(format!(
            "expected a JSON object, found {}",
            json_kind(&payload)
        )))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn normalize(record: &ScanRecord) -> Result<ScanOutcome, NormalizeError> {
    let scan_type = record.kind();
    let payload = decode_payload(&record.scan_result)?;
    let normalizer = normalizer_for(&scan_type)
        .ok_or_else(|| NormalizeError::UnsupportedType(scan_type.to_string()))?;
    normalizer(&payload)
}

/// Normalizes every record once, logging the ones that fail.
pub fn normalize_all(records: &[ScanRecord]) -> Vec<NormalizedRecord<'_>> {
    records
        .iter()
        .map(|record| {
            let normalized = NormalizedRecord::new(record);
            match &normalized.outcome {
                Ok(_) => debug!("Normalized {} record {}", record.kind(), record.id),
                Err(e) => warn!("Scan record {} contributes nothing: {}", record.id, e),
            }
            normalized
        })
        .collect()
}

fn normalize_directory(payload: &Value) -> Result<ScanOutcome, NormalizeError> {
    host_outcome(payload, &ScanType::Directory)
}

fn normalize_quick(payload: &Value) -> Result<ScanOutcome, NormalizeError> {
    host_outcome(payload, &ScanType::Quick)
}

fn normalize_full(payload: &Value) -> Result<ScanOutcome, NormalizeError> {
    match host_outcome(payload, &ScanType::Full) {
        Err(NormalizeError::ShapeMismatch { .. }) if payload.get("drive_scans").is_some() => {
            drive_scans_outcome(payload)
        }
        other => other,
    }
}

fn host_outcome(payload: &Value, scan_type: &ScanType) -> Result<ScanOutcome, NormalizeError> {
    let key = scan_type.result_key();
    let section = payload
        .get(&key)
        .and_then(Value::as_object)
        .ok_or_else(|| NormalizeError::ShapeMismatch {
            scan_type: scan_type.to_string(),
            expected_key: key.clone(),
        })?;
    Ok(ScanOutcome::Host(host_section(section)))
}

fn host_section(section: &Map<String, Value>) -> NormalizedScanOutcome {
    let infected_count = match section.get("infected_files") {
        Some(Value::Array(files)) => files.len() as u64,
        Some(other) => lenient_u64(other),
        None => 0,
    };
    let stats = section.get("stats");
    let stat = |name: &str| stats.and_then(|s| s.get(name));

    NormalizedScanOutcome {
        infected_count,
        scanned_files: stat("scanned_files").map(lenient_u64).unwrap_or(0),
        skipped_files: stat("skipped_files").map(lenient_u64).unwrap_or(0),
        duration_seconds: stat("scan_duration_seconds").and_then(lenient_duration),
    }
}

/// Full system scans may report one section per drive instead of a
/// single `full_scan` block.
fn drive_scans_outcome(payload: &Value) -> Result<ScanOutcome, NormalizeError> {
    let drives = payload
        .get("drive_scans")
        .and_then(Value::as_object)
        .ok_or_else(|| NormalizeError::ShapeMismatch {
            scan_type: ScanType::Full.to_string(),
            expected_key: "drive_scans".to_string(),
        })?;

    let mut total = NormalizedScanOutcome::default();
    for (drive, scan) in drives {
        let Some(section) = scan.as_object() else {
            continue;
        };
        if section.contains_key("error") {
            debug!("Drive {} reported an error, skipping", drive);
            continue;
        }
        let outcome = host_section(section);
        total.infected_count = total.infected_count.saturating_add(outcome.infected_count);
        total.scanned_files = total.scanned_files.saturating_add(outcome.scanned_files);
        total.skipped_files = total.skipped_files.saturating_add(outcome.skipped_files);
        if let Some(seconds) = outcome.duration_seconds {
            total.duration_seconds = Some(total.duration_seconds.unwrap_or(0.0) + seconds);
        }
    }
    Ok(ScanOutcome::Host(total))
}

fn normalize_network(payload: &Value) -> Result<ScanOutcome, NormalizeError> {
    let section = payload.get("network_scan").unwrap_or(payload);
    let object = section
        .as_object()
        .filter(|o| NETWORK_KEYS.iter().any(|k| o.contains_key(*k)))
        .ok_or_else(|| NormalizeError::ShapeMismatch {
            scan_type: ScanType::Network.to_string(),
            expected_key: "open_ports".to_string(),
        })?;

    let open_ports = object
        .get("open_ports")
        .and_then(Value::as_array)
        .map(|ports| ports.iter().filter_map(parse_port).collect())
        .unwrap_or_default();

    let firewall = object
        .get("firewall_status")
        .and_then(Value::as_object)
        .map(parse_firewall)
        .unwrap_or_default();

    let software = object
        .get("installed_software")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_software).collect())
        .unwrap_or_default();

    let system_info = object
        .get("system_info")
        .and_then(|v| serde_json::from_value::<SystemInfo>(v.clone()).ok());

    Ok(ScanOutcome::Network(NetworkPostureOutcome {
        open_ports,
        firewall,
        software,
        system_info,
    }))
}

fn parse_port(value: &Value) -> Option<OpenPort> {
    let port = value.get("port").map(lenient_u64)?;
    let port = u16::try_from(port).ok()?;
    let service = value
        .get("service")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some(OpenPort { port, service })
}

fn parse_firewall(status: &Map<String, Value>) -> Vec<FirewallProfile> {
    FIREWALL_PROFILES
        .iter()
        .filter_map(|(name, short)| {
            let value = status.get(*name).or_else(|| status.get(*short))?;
            let state = value.as_str()?;
            Some(FirewallProfile {
                name: name.to_string(),
                status: state.to_string(),
            })
        })
        .collect()
}

fn parse_software(value: &Value) -> Option<InstalledSoftware> {
    let item = value.as_object()?;
    let text = |key: &str| {
        item.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    Some(InstalledSoftware {
        name: text("name"),
        version: text("version"),
        vulnerable: item
            .get("vulnerable")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        vulnerability_info: item
            .get("vulnerability_info")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn lenient_u64(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

fn lenient_duration(value: &Value) -> Option<f64> {
    let seconds = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (seconds.is_finite() && seconds >= 0.0).then_some(seconds)
}

fn clamp_score(score: f64) -> Option<u8> {
    if !score.is_finite() {
        return None;
    }
    Some(score.clamp(0.0, 100.0).round() as u8)
}
