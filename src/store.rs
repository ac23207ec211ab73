// File: store.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use log::{debug, info};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::ConfigParameter;
use crate::record::{decode_records, ScanRecord, StoreResponse};

#[derive(Debug)]
pub enum StoreError {
    Transport(reqwest::Error),
    Status(u16),
    Rejected(Option<String>),
    Decode(serde_json::Error),
    Io(std::io::Error),
}

impl StoreError {
    /// Message for the error banner shown alongside the fallback view.
    pub fn banner(&self) -> String {
        match self {
            Self::Rejected(Some(message)) => message.clone(),
            Self::Rejected(None) => "Failed to fetch scan results".to_string(),
            _ => "An error occurred while fetching scan results".to_string(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Status(code) => write!(f, "Store answered with HTTP status {}", code),
            Self::Rejected(Some(message)) => write!(f, "Store rejected request: {}", message),
            Self::Rejected(None) => write!(f, "Store rejected request"),
            Self::Decode(e) => write!(f, "Invalid store response: {}", e),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Status(_) | Self::Rejected(_) => None,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFeed {
    Host,
    Network,
}

impl RecordFeed {
    pub fn path(&self) -> &'static str {
        match self {
            RecordFeed::Host => "/scan/result",
            RecordFeed::Network => "/scan/network-result",
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait ScanRecordStore {
    async fn fetch(&self, feed: RecordFeed) -> StoreResult<Vec<ScanRecord>>;
}

fn records_from_response(response: StoreResponse) -> StoreResult<Vec<ScanRecord>> {
    if !response.success {
        return Err(StoreError::Rejected(response.failure_message()));
    }
    Ok(response.records())
}

#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    base_url: String,
    token: Option<String>,
    timeout: u64,
    client: reqwest::Client,
}

impl HttpRecordStore {
    pub fn new(base_url: &str, token: Option<String>, timeout: u64) -> StoreResult<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            timeout,
            client,
        })
    }

    pub fn from_config(config: &ConfigParameter) -> StoreResult<Self> {
        Self::new(
            config.store_url(),
            config.token().map(str::to_string),
            config.timeout(),
        )
    }

    pub fn endpoint(&self, feed: RecordFeed) -> String {
        format!("{}{}", self.base_url, feed.path())
    }
}

impl ScanRecordStore for HttpRecordStore {
    async fn fetch(&self, feed: RecordFeed) -> StoreResult<Vec<ScanRecord>> {
        let url = self.endpoint(feed);
        debug!("Fetching scan records from {}", url);

        let mut request = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(Duration::from_secs(self.timeout));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: StoreResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => return Err(StoreError::Status(status.as_u16())),
            Err(e) => return Err(e.into()),
        };

        let records = records_from_response(parsed)?;
        info!("Retrieved {} scan records from {}", records.len(), url);
        Ok(records)
    }
}

/// Reads a saved store response, or a bare array of records, from disk.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    path: PathBuf,
}

impl FileRecordStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScanRecordStore for FileRecordStore {
    async fn fetch(&self, _feed: RecordFeed) -> StoreResult<Vec<ScanRecord>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let value: Value = serde_json::from_str(&content)?;

        let records = match value {
            Value::Array(items) => decode_records(&items),
            other => records_from_response(serde_json::from_value(other)?)?,
        };
        info!(
            "Loaded {} scan records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

/// Store selected at startup from the configuration.
#[derive(Debug, Clone)]
pub enum RecordSource {
    Http(HttpRecordStore),
    File(FileRecordStore),
}

impl RecordSource {
    pub fn from_config(config: &ConfigParameter) -> StoreResult<Self> {
        match config.input_file() {
            Some(path) => Ok(RecordSource::File(FileRecordStore::new(path))),
            None => Ok(RecordSource::Http(HttpRecordStore::from_config(config)?)),
        }
    }
}

impl ScanRecordStore for RecordSource {
    async fn fetch(&self, feed: RecordFeed) -> StoreResult<Vec<ScanRecord>> {
        match self {
            RecordSource::Http(store) => store.fetch(feed).await,
            RecordSource::File(store) => store.fetch(feed).await,
        }
    }
}
