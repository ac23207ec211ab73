// File: config.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::path::PathBuf;

use crate::metrics::DEFAULT_SCORE;
use crate::posture::DEFAULT_NETWORK_SCORE;

pub const DEFAULT_STORE_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone)]
pub struct ConfigParameter {
    store_url: String,
    token: Option<String>,
    input_file: Option<PathBuf>,
    timeout: u64,
    default_score: u8,
    network_default_score: u8,
    color: bool,
}

impl Default for ConfigParameter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigParameter {
    pub fn new() -> Self {
        Self {
            store_url: DEFAULT_STORE_URL.to_string(),
            token: None,
            input_file: None,
            timeout: 10,
            default_score: DEFAULT_SCORE,
            network_default_score: DEFAULT_NETWORK_SCORE,
            color: true,
        }
    }

    pub fn set_store_url(&mut self, store_url: &str) {
        self.store_url = store_url.trim_end_matches('/').to_string();
    }

    pub fn store_url(&self) -> &str {
        &self.store_url
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.trim().is_empty());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_input_file(&mut self, input_file: Option<PathBuf>) {
        self.input_file = input_file;
    }

    pub fn input_file(&self) -> Option<&PathBuf> {
        self.input_file.as_ref()
    }

    pub fn set_timeout(&mut self, timeout: u64) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn set_default_score(&mut self, default_score: u8) {
        self.default_score = default_score.min(100);
    }

    pub fn default_score(&self) -> u8 {
        self.default_score
    }

    pub fn set_network_default_score(&mut self, network_default_score: u8) {
        self.network_default_score = network_default_score.min(100);
    }

    pub fn network_default_score(&self) -> u8 {
        self.network_default_score
    }

    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    pub fn color(&self) -> bool {
        self.color
    }
}
