// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for config

use std::time::Duration;

use chatnote_core::{ConfigError, ConnectionConfig, ReconnectPolicy};

#[test]
fn test_default_config_is_valid() {
    let config = ConnectionConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.reconnect.base_delay_ms, 1_000);
    assert_eq!(config.reconnect.max_delay_ms, 30_000);
    assert_eq!(config.reconnect.max_attempts, 5);
}

#[test]
fn test_from_json_fills_missing_fields() {
    let config = ConnectionConfig::from_json(
        r#"{ "transport": { "server_url": "wss://notes.example.com/ws" },
             "reconnect": { "max_attempts": 8 } }"#,
    )
    .unwrap();

    assert_eq!(config.transport.server_url, "wss://notes.example.com/ws");
    assert_eq!(config.transport.connect_timeout_ms, 10_000);
    assert_eq!(config.reconnect.max_attempts, 8);
    assert_eq!(config.reconnect.base_delay_ms, 1_000);
}

#[test]
fn test_from_json_empty_object() {
    assert_eq!(
        ConnectionConfig::from_json("{}").unwrap(),
        ConnectionConfig::default()
    );
}

#[test]
fn test_from_json_rejects_malformed_input() {
    let err = ConnectionConfig::from_json("{ not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_validate_rejects_non_websocket_url() {
    let config = ConnectionConfig::default().with_server_url("https://notes.example.com");
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_validate_rejects_bad_backoff() {
    let zero_base = ConnectionConfig::default().with_reconnect(ReconnectPolicy {
        base_delay_ms: 0,
        ..Default::default()
    });
    assert!(zero_base.validate().is_err());

    let inverted = ConnectionConfig::default().with_reconnect(ReconnectPolicy {
        base_delay_ms: 5_000,
        max_delay_ms: 1_000,
        max_attempts: 3,
    });
    let err = inverted.validate().unwrap_err();
    assert!(err.to_string().contains("max_delay_ms"));
}

#[test]
fn test_delay_grows_exponentially_and_caps() {
    let policy = ReconnectPolicy {
        base_delay_ms: 1_000,
        max_delay_ms: 10_000,
        max_attempts: 10,
    };

    assert_eq!(policy.delay_for(0), Some(Duration::from_secs(1)));
    assert_eq!(policy.delay_for(1), Some(Duration::from_secs(2)));
    assert_eq!(policy.delay_for(3), Some(Duration::from_secs(8)));
    assert_eq!(policy.delay_for(4), Some(Duration::from_secs(10)));
    assert_eq!(policy.delay_for(9), Some(Duration::from_secs(10)));
    assert_eq!(policy.delay_for(10), None);
}
