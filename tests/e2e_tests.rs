// File: e2e_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

mod common;

use common::{
    create_json_response, directory_scan_record, fixed_now, network_scan_record,
    success_envelope,
};
use scanposture::config::ConfigParameter;
use scanposture::posture::{
    load_network_view, load_posture, PortRisk, PostureAssembler, ScoreRating,
};
use scanposture::report::{ReportFormat, ReportGenerator};
use scanposture::store::{FileRecordStore, HttpRecordStore, RecordSource};
use serde_json::{json, Value};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer};

#[tokio::test]
#[serial]
async fn test_dashboard_workflow_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scan/result"))
        .respond_with(create_json_response(
            200,
            success_envelope(vec![
                directory_scan_record(3, 2, "2025-10-14T09:00:00Z"),
                json!({
                    "id": 2,
                    "scan_type": "quick",
                    "scan_result": "{broken",
                    "uploaded_at": "2025-10-13T09:00:00Z"
                }),
                directory_scan_record(1, 1, "2025-10-01T09:00:00Z"),
            ]),
        ))
        .mount(&mock_server)
        .await;

    let mut config = ConfigParameter::new();
    config.set_store_url(&mock_server.uri());
    config.set_token(Some("token".to_string()));

    let store = RecordSource::from_config(&config).unwrap();
    let assembler = PostureAssembler::new(&config);
    let report = load_posture(&store, &assembler, fixed_now()).await;

    assert_eq!(report.banner, None);
    let summary = report.view;
    assert_eq!(summary.score, 98);
    assert_eq!(summary.rating, ScoreRating::Good);
    assert_eq!(summary.active_threats, 3);
    assert_eq!(
        summary.threat_notice.as_deref(),
        Some("3 critical issues need your attention")
    );
    assert_eq!(summary.last_scan_age, "3h ago");
    assert_eq!(summary.last_scan_caption, "Directory scan completed");
    assert_eq!(summary.unparseable, 1);
    assert_eq!(summary.history.len(), 3);
    assert_eq!(summary.history[0].date, "October 14, 2025");
    assert_eq!(summary.history[0].duration, "12.50 seconds");
    assert_eq!(summary.history[1].type_label, "Quick Scan");
    assert_eq!(summary.history[1].duration, "N/A");
}

#[tokio::test]
#[serial]
async fn test_store_failure_falls_back_to_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scan/result"))
        .respond_with(create_json_response(
            401,
            json!({"success": false, "message": "Missing Authorization Header"}),
        ))
        .mount(&mock_server)
        .await;

    let store = HttpRecordStore::new(&mock_server.uri(), None, 5).unwrap();
    let report = load_posture(&store, &PostureAssembler::default(), fixed_now()).await;

    assert_eq!(
        report.banner.as_deref(),
        Some("Missing Authorization Header")
    );
    assert_eq!(report.view.score, 76);
    assert_eq!(report.view.active_threats, 0);
    assert_eq!(report.view.last_scan_age, "No scans");
    assert_eq!(report.view.last_scan_caption, "No recent scans");
    assert!(report.view.history.is_empty());
}

#[tokio::test]
#[serial]
async fn test_network_view_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scan/network-result"))
        .respond_with(create_json_response(
            200,
            success_envelope(vec![
                network_scan_record(5, "2025-10-14T11:30:00Z"),
                json!({"id": 4, "network_scan_result": "{}", "upload_at": "2025-10-10T11:30:00Z"}),
            ]),
        ))
        .mount(&mock_server)
        .await;

    let store = HttpRecordStore::new(&mock_server.uri(), None, 5).unwrap();
    let report = load_network_view(&store, &PostureAssembler::default(), fixed_now()).await;
    let view = report.view;

    assert_eq!(view.score, 85);
    assert_eq!(view.last_scan_age, "30m ago");
    assert_eq!(view.open_ports.len(), 2);
    assert_eq!(view.open_ports[0].risk, PortRisk::HighRisk);
    assert_eq!(view.open_ports[1].risk, PortRisk::Standard);
    assert_eq!(view.firewall.len(), 3);
    assert_eq!(view.vulnerable_software, 0);
    assert_eq!(view.system_info.unwrap().hostname, "workstation");
}

#[tokio::test]
#[serial]
async fn test_network_view_without_data_uses_network_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scan/network-result"))
        .respond_with(create_json_response(200, success_envelope(vec![])))
        .mount(&mock_server)
        .await;

    let store = HttpRecordStore::new(&mock_server.uri(), None, 5).unwrap();
    let report = load_network_view(&store, &PostureAssembler::default(), fixed_now()).await;

    assert_eq!(report.view.score, 82);
    assert_eq!(report.view.last_scan_age, "No scans");
    assert!(report.view.open_ports.is_empty());
}

#[tokio::test]
async fn test_file_store_summary_and_report() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("results.json");
    let records = vec![
        network_scan_record(8, "2025-10-14T11:59:30Z"),
        directory_scan_record(7, 0, "2025-10-12T12:00:00Z"),
    ];
    fs::write(&input, Value::Array(records).to_string()).unwrap();

    let store = RecordSource::File(FileRecordStore::new(&input));
    let report = load_posture(&store, &PostureAssembler::default(), fixed_now()).await;
    let summary = report.view;

    assert_eq!(summary.score, 85);
    assert_eq!(summary.last_scan_age, "Just now");
    assert_eq!(summary.last_scan_caption, "Network scan completed");
    assert_eq!(summary.active_threats, 0);
    assert_eq!(summary.threat_notice, None);

    let output = temp_dir.path().join("posture.csv");
    ReportGenerator::generate_report(&summary, &output, ReportFormat::Csv).unwrap();
    let csv = fs::read_to_string(&output).unwrap();
    assert!(csv.starts_with("ID,Date,Type,Findings,Duration"));
    assert!(csv.contains("Network Scan"));
    assert!(csv.contains("\"October 12, 2025\""));
}

#[tokio::test]
async fn test_missing_input_file_shows_generic_banner() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileRecordStore::new(temp_dir.path().join("nope.json"));
    let report = load_posture(&store, &PostureAssembler::default(), fixed_now()).await;

    assert_eq!(
        report.banner.as_deref(),
        Some("An error occurred while fetching scan results")
    );
    assert_eq!(report.view.score, 76);
}
