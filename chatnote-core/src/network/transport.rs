// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Transport Trait
//!
//! Platform-agnostic view of the collaboration socket.

use serde::{Deserialize, Serialize};

use super::error::TransportResult;
use crate::subscription::Subscription;

/// Callback receiving the transport's connected flag.
pub type StatusCallback = Box<dyn Fn(bool) + Send + Sync>;

/// Configuration for transport connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Server URL (`ws://` or `wss://`). Empty until configured.
    pub server_url: String,
    /// Connection timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Read/write timeout in milliseconds.
    pub io_timeout_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            server_url: String::new(),
            connect_timeout_ms: 10_000,
            io_timeout_ms: 30_000,
        }
    }
}

impl TransportConfig {
    /// Creates a config for the given server URL with default timeouts.
    pub fn with_server_url(server_url: impl Into<String>) -> Self {
        TransportConfig {
            server_url: server_url.into(),
            ..Default::default()
        }
    }
}

/// Transport trait for the collaboration socket.
///
/// Methods take `&self`: the driver shares the transport with the callbacks
/// it registers, so implementations keep their own interior locking.
///
/// # Contract
///
/// - `subscribe` may be called many times; every registered callback gets
///   every change until its [`Subscription`] is released, and no callback
///   fires after release.
/// - Duplicate identical signals are allowed; the driver treats them as
///   no-ops.
pub trait Transport: Send + Sync {
    /// Returns the current connected flag.
    fn is_connected(&self) -> bool;

    /// Registers a callback for connected/disconnected changes.
    fn subscribe(&self, on_change: StatusCallback) -> Subscription;

    /// Establishes the underlying link.
    fn connect(&self) -> TransportResult<()>;

    /// Tears down the underlying link. Safe to call even if not connected.
    fn disconnect(&self) -> TransportResult<()>;

    /// Reason for the most recent link loss, if the transport knows one.
    fn last_error(&self) -> Option<String> {
        None
    }
}
