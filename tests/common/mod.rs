// File: common/mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use wiremock::ResponseTemplate;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 14, 12, 0, 0).unwrap()
}

pub fn create_json_response(status: u16, data: Value) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .set_body_string(data.to_string())
        .append_header("content-type", "application/json")
}

pub fn directory_scan_record(id: u64, infected: usize, uploaded_at: &str) -> Value {
    let files: Vec<Value> = (0..infected)
        .map(|i| json!({"path": format!("C:\\Users\\demo\\f{}.exe", i), "threat": "Trojan.Generic"}))
        .collect();
    let result = json!({
        "system_info": {"hostname": "workstation"},
        "directory_scan": {
            "infected_files": files,
            "stats": {
                "scanned_files": 100,
                "skipped_files": 20,
                "scan_duration_seconds": 12.5
            }
        }
    });
    json!({
        "id": id,
        "scan_type": "directory",
        "scan_result": result.to_string(),
        "uploaded_at": uploaded_at
    })
}

pub fn network_scan_record(id: u64, upload_at: &str) -> Value {
    let result = json!({
        "system_info": {
            "hostname": "workstation",
            "os_name": "Windows",
            "os_version": "10.0.19045",
            "os_edition": "Pro",
            "platform": "Windows-10",
            "processor": "Intel64",
            "ram_gb": 15.8,
            "antivirus": ["Windows Defender"],
            "username": "demo",
            "scan_time": "2025-10-14 09:00:00"
        },
        "defender_status": {},
        "firewall_status": {
            "Domain Profile": "Enabled",
            "Private Profile": "Enabled",
            "Public Profile": "Unknown"
        },
        "open_ports": [
            {"port": 445, "service": "SMB"},
            {"port": 443, "service": "HTTPS"}
        ],
        "installed_software": [
            {"name": "Notepad++", "version": "8.6", "vulnerable": false, "vulnerability_info": null}
        ]
    });
    json!({
        "id": id,
        "network_scan_result": result.to_string(),
        "upload_at": upload_at
    })
}

pub fn success_envelope(results: Vec<Value>) -> Value {
    json!({"success": true, "results": results})
}
