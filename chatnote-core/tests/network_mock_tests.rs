// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for network::mock and network::monitor

use std::sync::Arc;

use parking_lot::Mutex;

use chatnote_core::network::*;

fn record(transport: &MockTransport) -> (Arc<Mutex<Vec<bool>>>, chatnote_core::Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sub = {
        let seen = Arc::clone(&seen);
        transport.subscribe(Box::new(move |connected| seen.lock().push(connected)))
    };
    (seen, sub)
}

#[test]
fn test_mock_transport_connect_disconnect() {
    let transport = MockTransport::new();
    assert!(!transport.is_connected());

    transport.connect().unwrap();
    assert!(transport.is_connected());

    transport.disconnect().unwrap();
    assert!(!transport.is_connected());

    assert_eq!(transport.connect_calls(), 1);
    assert_eq!(transport.disconnect_calls(), 1);
}

#[test]
fn test_mock_transport_is_silent_without_auto_signal() {
    let transport = MockTransport::new();
    let (seen, _sub) = record(&transport);

    transport.connect().unwrap();
    transport.disconnect().unwrap();

    assert!(seen.lock().is_empty());
}

#[test]
fn test_mock_transport_auto_signal() {
    let transport = MockTransport::new();
    transport.set_auto_signal(true);
    let (seen, _sub) = record(&transport);

    transport.connect().unwrap();
    transport.disconnect().unwrap();

    assert_eq!(*seen.lock(), vec![true, false]);
}

#[test]
fn test_mock_transport_error_injection() {
    let transport = MockTransport::new();
    transport.inject_error(TransportError::ConnectionFailed("test error".into()));

    let result = transport.connect();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("test error"));
    assert!(!transport.is_connected());

    // Only the next operation fails.
    transport.connect().unwrap();
    assert!(transport.is_connected());
}

#[test]
fn test_mock_transport_drop_link_records_reason() {
    let transport = MockTransport::connected();
    let (seen, _sub) = record(&transport);

    transport.drop_link("timeout");

    assert_eq!(*seen.lock(), vec![false]);
    assert_eq!(transport.last_error().as_deref(), Some("timeout"));

    transport.connect().unwrap();
    assert_eq!(transport.last_error(), None);
}

#[test]
fn test_mock_transport_unsubscribe() {
    let transport = MockTransport::new();
    let (seen, sub) = record(&transport);
    assert_eq!(transport.subscriber_count(), 1);

    drop(sub);
    transport.set_connected(true);

    assert_eq!(transport.subscriber_count(), 0);
    assert!(seen.lock().is_empty());
}

#[test]
fn test_manual_monitor_only_signals_changes() {
    let monitor = ManualNetworkMonitor::new(NetworkStatus::Online);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let _sub = {
        let seen = Arc::clone(&seen);
        monitor.subscribe(Box::new(move |status| seen.lock().push(status)))
    };

    monitor.set_online();
    monitor.set_offline();
    monitor.set_offline();
    monitor.set_online();
    monitor.emit(NetworkStatus::Online);

    assert_eq!(
        *seen.lock(),
        vec![NetworkStatus::Offline, NetworkStatus::Online, NetworkStatus::Online]
    );
    assert_eq!(monitor.status(), NetworkStatus::Online);
}

#[test]
fn test_transport_config_defaults() {
    let config = TransportConfig::with_server_url("wss://notes.example.com/ws");
    assert_eq!(config.server_url, "wss://notes.example.com/ws");
    assert_eq!(config.connect_timeout_ms, 10_000);
    assert_eq!(config.io_timeout_ms, 30_000);
}
