// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Host Network Signals
//!
//! Browser-style `online`/`offline` notifications from the host runtime.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::subscription::{CallbackList, Subscription};

/// Host network reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkStatus {
    /// A network path exists.
    Online,
    /// The host reports no network path at all.
    Offline,
}

/// Callback receiving host network changes.
pub type NetworkCallback = Box<dyn Fn(NetworkStatus) + Send + Sync>;

/// Source of host `online`/`offline` signals.
pub trait NetworkMonitor: Send + Sync {
    /// Registers a callback for network changes.
    fn subscribe(&self, on_change: NetworkCallback) -> Subscription;
}

/// Network monitor fed by the host.
///
/// Platform shells (webview bridge, mobile reachability API) push signals
/// in through [`ManualNetworkMonitor::set_status`]; tests do the same.
#[derive(Debug)]
pub struct ManualNetworkMonitor {
    status: Mutex<NetworkStatus>,
    callbacks: CallbackList<NetworkStatus>,
}

impl Default for ManualNetworkMonitor {
    fn default() -> Self {
        Self::new(NetworkStatus::Online)
    }
}

impl ManualNetworkMonitor {
    /// Creates a monitor with the given initial status.
    pub fn new(status: NetworkStatus) -> Self {
        ManualNetworkMonitor {
            status: Mutex::new(status),
            callbacks: CallbackList::new(),
        }
    }

    /// Returns the last known status.
    pub fn status(&self) -> NetworkStatus {
        *self.status.lock()
    }

    /// Records a new status, notifying subscribers only if it changed.
    pub fn set_status(&self, status: NetworkStatus) {
        let changed = {
            let mut current = self.status.lock();
            let changed = *current != status;
            *current = status;
            changed
        };
        if changed {
            self.callbacks.emit(&status);
        }
    }

    /// Shorthand for `set_status(NetworkStatus::Online)`.
    pub fn set_online(&self) {
        self.set_status(NetworkStatus::Online);
    }

    /// Shorthand for `set_status(NetworkStatus::Offline)`.
    pub fn set_offline(&self) {
        self.set_status(NetworkStatus::Offline);
    }

    /// Delivers a signal unconditionally, duplicates included.
    pub fn emit(&self, status: NetworkStatus) {
        *self.status.lock() = status;
        self.callbacks.emit(&status);
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.callbacks.len()
    }
}

impl NetworkMonitor for ManualNetworkMonitor {
    fn subscribe(&self, on_change: NetworkCallback) -> Subscription {
        self.callbacks.register(move |status| on_change(*status))
    }
}
