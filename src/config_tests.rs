// File: config_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

#[cfg(test)]
mod tests {
    use crate::config::{ConfigParameter, DEFAULT_STORE_URL};
    use rstest::*;
    use std::path::PathBuf;

    #[test]
    fn test_config_parameter_default() {
        let config = ConfigParameter::default();

        assert_eq!(config.store_url(), DEFAULT_STORE_URL);
        assert_eq!(config.token(), None);
        assert_eq!(config.input_file(), None);
        assert_eq!(config.timeout(), 10);
        assert_eq!(config.default_score(), 76);
        assert_eq!(config.network_default_score(), 82);
        assert_eq!(config.color(), true);
    }

    #[test]
    fn test_set_store_url_strips_trailing_slash() {
        let mut config = ConfigParameter::new();

        config.set_store_url("https://dashboard.example.com/");
        assert_eq!(config.store_url(), "https://dashboard.example.com");
    }

    #[test]
    fn test_set_token() {
        let mut config = ConfigParameter::new();

        config.set_token(Some("abc123".to_string()));
        assert_eq!(config.token(), Some("abc123"));

        config.set_token(Some("   ".to_string()));
        assert_eq!(config.token(), None);

        config.set_token(None);
        assert_eq!(config.token(), None);
    }

    #[test]
    fn test_set_input_file() {
        let mut config = ConfigParameter::new();

        config.set_input_file(Some(PathBuf::from("results.json")));
        assert_eq!(config.input_file(), Some(&PathBuf::from("results.json")));
    }

    #[rstest]
    #[case(0)]
    #[case(5)]
    #[case(30)]
    #[case(120)]
    fn test_set_timeout(#[case] timeout_value: u64) {
        let mut config = ConfigParameter::new();

        config.set_timeout(timeout_value);
        assert_eq!(config.timeout(), timeout_value);
    }

    #[rstest]
    #[case(50, 50)]
    #[case(100, 100)]
    #[case(250, 100)]
    fn test_default_scores_are_capped(#[case] input: u8, #[case] expected: u8) {
        let mut config = ConfigParameter::new();

        config.set_default_score(input);
        config.set_network_default_score(input);
        assert_eq!(config.default_score(), expected);
        assert_eq!(config.network_default_score(), expected);
    }

    #[test]
    fn test_set_color() {
        let mut config = ConfigParameter::new();

        config.set_color(false);
        assert_eq!(config.color(), false);
    }
}
