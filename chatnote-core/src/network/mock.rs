// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mock Transport
//!
//! Mock implementation of the Transport trait for testing.

use parking_lot::Mutex;

use super::error::{TransportError, TransportResult};
use super::transport::{StatusCallback, Transport};
use crate::subscription::{CallbackList, Subscription};

/// Mock transport for testing.
///
/// Signals are delivered only when the test asks for them, so every
/// intermediate driver state can be observed.
///
/// # Example
///
/// ```ignore
/// use chatnote_core::network::{MockTransport, Transport};
///
/// let transport = MockTransport::new();
/// transport.set_connected(true);   // notifies subscribers
/// transport.drop_link("timeout");  // notifies with the reason recorded
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
    callbacks: CallbackList<bool>,
}

#[derive(Debug, Default)]
struct MockState {
    connected: bool,
    connect_calls: u32,
    disconnect_calls: u32,
    /// Error to inject on next operation.
    inject_error: Option<TransportError>,
    last_error: Option<String>,
    /// Whether connect()/disconnect() signal subscribers themselves.
    auto_signal: bool,
}

impl MockTransport {
    /// Creates a new, disconnected mock transport.
    pub fn new() -> Self {
        MockTransport::default()
    }

    /// Creates a mock transport whose link is already up.
    pub fn connected() -> Self {
        let transport = MockTransport::new();
        transport.state.lock().connected = true;
        transport
    }

    /// Sets the connected flag and notifies subscribers, even if unchanged.
    pub fn set_connected(&self, connected: bool) {
        self.state.lock().connected = connected;
        self.callbacks.emit(&connected);
    }

    /// Simulates the link dropping with the given reason.
    pub fn drop_link(&self, reason: &str) {
        {
            let mut state = self.state.lock();
            state.connected = false;
            state.last_error = Some(reason.to_string());
        }
        self.callbacks.emit(&false);
    }

    /// Injects an error to be returned on the next connect/disconnect.
    pub fn inject_error(&self, error: TransportError) {
        self.state.lock().inject_error = Some(error);
    }

    /// Makes connect()/disconnect() notify subscribers like a real link.
    pub fn set_auto_signal(&self, enabled: bool) {
        self.state.lock().auto_signal = enabled;
    }

    /// Returns how many times connect() was called.
    pub fn connect_calls(&self) -> u32 {
        self.state.lock().connect_calls
    }

    /// Returns how many times disconnect() was called.
    pub fn disconnect_calls(&self) -> u32 {
        self.state.lock().disconnect_calls
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Applies the common bookkeeping of connect/disconnect and returns
    /// whether subscribers should be signalled.
    fn operate(&self, connect: bool) -> TransportResult<bool> {
        let mut state = self.state.lock();
        if connect {
            state.connect_calls += 1;
        } else {
            state.disconnect_calls += 1;
        }

        if let Some(err) = state.inject_error.take() {
            return Err(err);
        }

        state.connected = connect;
        if connect {
            state.last_error = None;
        }
        Ok(state.auto_signal)
    }
}

impl Transport for MockTransport {
    fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    fn subscribe(&self, on_change: StatusCallback) -> Subscription {
        self.callbacks.register(move |connected| on_change(*connected))
    }

    fn connect(&self) -> TransportResult<()> {
        if self.operate(true)? {
            self.callbacks.emit(&true);
        }
        Ok(())
    }

    fn disconnect(&self) -> TransportResult<()> {
        if self.operate(false)? {
            self.callbacks.emit(&false);
        }
        Ok(())
    }

    fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }
}
