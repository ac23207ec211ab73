// File: record.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use chrono::{DateTime, NaiveDateTime, Utc};
use log::warn;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScanType {
    Directory,
    Quick,
    Full,
    Network,
    Other(String),
}

impl ScanType {
    pub fn as_str(&self) -> &str {
        match self {
            ScanType::Directory => "directory",
            ScanType::Quick => "quick",
            ScanType::Full => "full",
            ScanType::Network => "network",
            ScanType::Other(tag) => tag.as_str(),
        }
    }

    /// The tag with its first letter capitalized.
    pub fn display_name(&self) -> String {
        let mut chars = self.as_str().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }

    /// Display label used by the history view, e.g. `Directory Scan`.
    pub fn label(&self) -> String {
        format!("{} Scan", self.display_name()).trim_start().to_string()
    }

    /// Key under which scanners nest the per-type payload.
    pub fn result_key(&self) -> String {
        format!("{}_scan", self.as_str())
    }
}

impl From<String> for ScanType {
    fn from(tag: String) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "directory" => ScanType::Directory,
            "quick" => ScanType::Quick,
            "full" => ScanType::Full,
            "network" => ScanType::Network,
            _ => ScanType::Other(tag),
        }
    }
}

impl From<&str> for ScanType {
    fn from(tag: &str) -> Self {
        ScanType::from(tag.to_string())
    }
}

impl From<ScanType> for String {
    fn from(scan_type: ScanType) -> Self {
        scan_type.as_str().to_string()
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scanner output as served by the store: either a JSON document encoded
/// into a string, or an already structured value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawResult {
    Encoded(String),
    Structured(Value),
}

impl Default for RawResult {
    fn default() -> Self {
        RawResult::Structured(Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub scan_type: Option<ScanType>,
    #[serde(default, alias = "network_scan_result")]
    pub scan_result: RawResult,
    #[serde(
        default,
        alias = "upload_at",
        deserialize_with = "deserialize_timestamp"
    )]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl ScanRecord {
    pub fn new(
        id: impl Into<String>,
        scan_type: ScanType,
        scan_result: RawResult,
        uploaded_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: id.into(),
            scan_type: Some(scan_type),
            scan_result,
            uploaded_at,
        }
    }

    /// Records from the network feed carry no `scan_type` tag.
    pub fn kind(&self) -> ScanType {
        self.scan_type.clone().unwrap_or(ScanType::Network)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Envelope returned by the scan result endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StoreResponse {
    pub fn failure_message(&self) -> Option<String> {
        self.message.clone().or_else(|| self.error.clone())
    }

    /// Decodes each entry on its own; entries that are not records at all
    /// are dropped with a warning instead of failing the whole list.
    pub fn records(&self) -> Vec<ScanRecord> {
        decode_records(&self.results)
    }
}

pub fn decode_records(values: &[Value]) -> Vec<ScanRecord> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match ScanRecord::from_value(value.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Dropping malformed scan record at index {}: {}", index, e);
                None
            }
        })
        .collect()
}

pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }

    None
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!("unsupported record id: {}", other))),
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    };

    if parsed.is_none() && !value.is_null() {
        warn!("Unparseable scan timestamp: {}", value);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("directory", ScanType::Directory)]
    #[case("Quick", ScanType::Quick)]
    #[case("full", ScanType::Full)]
    #[case("network", ScanType::Network)]
    #[case("custom", ScanType::Other("custom".to_string()))]
    fn test_scan_type_from_tag(#[case] tag: &str, #[case] expected: ScanType) {
        assert_eq!(ScanType::from(tag), expected);
    }

    #[test]
    fn test_scan_type_labels() {
        assert_eq!(ScanType::Directory.label(), "Directory Scan");
        assert_eq!(ScanType::Network.label(), "Network Scan");
        assert_eq!(ScanType::Other("custom".into()).label(), "Custom Scan");
        assert_eq!(ScanType::Full.result_key(), "full_scan");
    }

    #[rstest]
    #[case("2025-10-14T10:00:00Z")]
    #[case("2025-10-14T12:00:00+02:00")]
    #[case("Tue, 14 Oct 2025 10:00:00 GMT")]
    #[case("2025-10-14T10:00:00")]
    #[case("2025-10-14 10:00:00.000000")]
    fn test_parse_timestamp_formats(#[case] input: &str) {
        let expected = Utc.with_ymd_and_hms(2025, 10, 14, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp(input), Some(expected));
    }

    #[test]
    fn test_parse_timestamp_invalid() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_record_with_encoded_result() {
        let record: ScanRecord = serde_json::from_value(json!({
            "id": 7,
            "scan_type": "directory",
            "scan_result": "{\"directory_scan\": {}}",
            "uploaded_at": "2025-10-14T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(record.id, "7");
        assert_eq!(record.kind(), ScanType::Directory);
        assert!(matches!(record.scan_result, RawResult::Encoded(_)));
        assert!(record.uploaded_at.is_some());
    }

    #[test]
    fn test_network_feed_aliases() {
        let record: ScanRecord = serde_json::from_value(json!({
            "id": "n1",
            "network_scan_result": {"open_ports": []},
            "upload_at": "Tue, 14 Oct 2025 10:00:00 GMT"
        }))
        .unwrap();

        assert_eq!(record.kind(), ScanType::Network);
        assert!(matches!(record.scan_result, RawResult::Structured(_)));
        assert!(record.uploaded_at.is_some());
    }

    #[test]
    fn test_bad_timestamp_does_not_fail_record() {
        let record: ScanRecord = serde_json::from_value(json!({
            "id": 1,
            "scan_type": "quick",
            "scan_result": {},
            "uploaded_at": "not a date"
        }))
        .unwrap();
        assert_eq!(record.uploaded_at, None);
    }

    #[test]
    fn test_store_response_drops_malformed_records() {
        let response: StoreResponse = serde_json::from_value(json!({
            "success": true,
            "results": [
                {"id": 1, "scan_type": "quick", "scan_result": "{}"},
                {"id": {"nested": true}},
                {"id": 2, "scan_type": "full", "scan_result": "{}"}
            ]
        }))
        .unwrap();

        let records = response.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, "2");
    }

    #[test]
    fn test_store_response_failure_message() {
        let response: StoreResponse =
            serde_json::from_value(json!({"success": false, "error": "Token expired"})).unwrap();
        assert_eq!(response.failure_message(), Some("Token expired".to_string()));
    }
}
