// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for connection::indicator

use chatnote_core::connection::*;

fn indicator(status: ConnectionStatus, error: Option<&str>) -> StatusIndicator {
    StatusIndicator::for_snapshot(&ConnectionSnapshot {
        status,
        error: error.map(str::to_string),
    })
}

#[test]
fn test_in_flight_states_pulse() {
    for status in [
        ConnectionStatus::Initializing,
        ConnectionStatus::Connecting,
        ConnectionStatus::Reconnecting,
    ] {
        let ind = indicator(status, None);
        assert_eq!(ind.tone, IndicatorTone::Warning);
        assert!(ind.pulsing);
        assert!(!ind.reconnectable);
    }
}

#[test]
fn test_connected_is_static_success() {
    let ind = indicator(ConnectionStatus::Connected, None);
    assert_eq!(ind.tone, IndicatorTone::Success);
    assert!(!ind.pulsing);
    assert_eq!(ind.tooltip, "Connected");
}

#[test]
fn test_disconnected_offers_reconnect() {
    let ind = indicator(ConnectionStatus::Disconnected, None);
    assert_eq!(ind.tone, IndicatorTone::Warning);
    assert!(!ind.pulsing);
    assert!(ind.reconnectable);
}

#[test]
fn test_offline_is_danger_without_reconnect() {
    let ind = indicator(ConnectionStatus::Offline, Some(OFFLINE_ERROR));
    assert_eq!(ind.tone, IndicatorTone::Danger);
    assert!(!ind.reconnectable);
    assert_eq!(ind.tooltip, "Offline: No Internet Connection");
}

#[test]
fn test_tooltip_includes_error() {
    let ind = indicator(ConnectionStatus::Reconnecting, Some("timeout"));
    assert_eq!(ind.tooltip, "Reconnecting: timeout");
}
