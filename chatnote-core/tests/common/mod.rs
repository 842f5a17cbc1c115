// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Common Test Utilities
//!
//! Shared helpers for the driver tests.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use chatnote_core::{ConnectionConfig, ConnectionDriver, ConnectionSnapshot, MockTransport};

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber once. Set `RUST_LOG=chatnote_core=debug`
/// to see transitions.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Driver over a fresh mock transport.
pub fn create_driver(
    transport_connected: bool,
) -> (Arc<MockTransport>, ConnectionDriver<MockTransport>) {
    init_tracing();
    let transport = Arc::new(if transport_connected {
        MockTransport::connected()
    } else {
        MockTransport::new()
    });
    let driver = ConnectionDriver::new(Arc::clone(&transport), ConnectionConfig::default());
    (transport, driver)
}

/// Collects every snapshot a driver publishes.
pub fn record_snapshots(
    driver: &ConnectionDriver<MockTransport>,
) -> (Arc<Mutex<Vec<ConnectionSnapshot>>>, chatnote_core::Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sub = {
        let seen = Arc::clone(&seen);
        driver.subscribe(move |snapshot| seen.lock().push(snapshot.clone()))
    };
    (seen, sub)
}
