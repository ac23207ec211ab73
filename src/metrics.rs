// File: metrics.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

use crate::normalizer::{
    NormalizeError, NormalizedRecord, NormalizedScanOutcome, ScoreContribution,
};

/// Score shown before any scan has been recorded.
pub const DEFAULT_SCORE: u8 = 76;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub type_label: String,
    pub findings: u64,
    pub duration: String,
}

/// Orders records newest first. The sort is stable and records without a
/// timestamp go last, so an already ordered feed keeps its order.
pub fn sort_by_recency<'r, 'a>(records: &'r [NormalizedRecord<'a>]) -> Vec<&'r NormalizedRecord<'a>> {
    let mut ordered: Vec<_> = records.iter().collect();
    ordered.sort_by(|a, b| b.uploaded_at().cmp(&a.uploaded_at()));
    ordered
}

pub fn latest<'r, 'a>(records: &'r [NormalizedRecord<'a>]) -> Option<&'r NormalizedRecord<'a>> {
    sort_by_recency(records).into_iter().next()
}

pub fn compute_score(records: &[NormalizedRecord<'_>], default_score: u8) -> u8 {
    let Some(latest) = latest(records) else {
        return default_score;
    };

    let score = match &latest.outcome {
        Ok(outcome) => outcome.score(),
        Err(NormalizeError::Decode(_)) => None,
        Err(_) => NormalizedScanOutcome::default().score(),
    };

    score.unwrap_or_else(|| {
        debug!(
            "Latest record {} yields no score, using default {}",
            latest.record.id, default_score
        );
        default_score
    })
}

pub fn count_threats(records: &[NormalizedRecord<'_>]) -> u64 {
    records
        .iter()
        .map(|r| r.outcome.as_ref().map(|o| o.infected_count()).unwrap_or(0))
        .fold(0u64, |acc, n| acc.saturating_add(n))
}

pub fn format_elapsed(elapsed_ms: i64) -> String {
    if elapsed_ms >= DAY_MS {
        format!("{}d ago", elapsed_ms / DAY_MS)
    } else if elapsed_ms >= HOUR_MS {
        format!("{}h ago", elapsed_ms / HOUR_MS)
    } else if elapsed_ms >= MINUTE_MS {
        format!("{}m ago", elapsed_ms / MINUTE_MS)
    } else {
        "Just now".to_string()
    }
}

pub fn format_age(most_recent: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match most_recent {
        Some(timestamp) => format_elapsed((now - timestamp).num_milliseconds()),
        None => "No scans".to_string(),
    }
}

pub fn last_scan_age(records: &[NormalizedRecord<'_>], now: DateTime<Utc>) -> String {
    match latest(records) {
        None => format_age(None, now),
        Some(record) => match record.uploaded_at() {
            Some(timestamp) => format_age(Some(timestamp), now),
            None => "Unknown".to_string(),
        },
    }
}

pub fn format_date(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(ts) => ts.format("%B %d, %Y").to_string(),
        None => "Unknown date".to_string(),
    }
}

pub fn format_duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) => format!("{:.2} seconds", s),
        None => "N/A".to_string(),
    }
}

pub fn format_history(records: &[NormalizedRecord<'_>]) -> Vec<HistoryRow> {
    records
        .iter()
        .map(|normalized| {
            let outcome = normalized.outcome_or_zero();
            HistoryRow {
                id: normalized.record.id.clone(),
                date: format_date(normalized.uploaded_at()),
                type_label: normalized.record.kind().label(),
                findings: outcome.infected_count(),
                duration: format_duration(outcome.duration_seconds()),
            }
        })
        .collect()
}
