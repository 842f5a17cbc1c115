// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Connection State Machine
//!
//! A total transition function over `(status, event)`. Pairs missing from
//! the table leave the state untouched; they are not errors.
//!
//! | From | Event | To | Error |
//! |---|---|---|---|
//! | `initializing` | seed: transport connected | `connected` | cleared |
//! | `initializing` | seed: transport not connected | `connecting` | cleared |
//! | `disconnected` | `Connect` / `NetworkOnline` | `connecting` | cleared |
//! | `connecting` | `Connected` | `connected` | cleared |
//! | `connecting` | `Disconnected(e)` | `reconnecting` | `e` |
//! | `connecting` | `NetworkOffline` | `offline` | [`OFFLINE_ERROR`] |
//! | `connected` | `Disconnected(e)` | `reconnecting` | `e` |
//! | `connected` | `NetworkOffline` | `offline` | [`OFFLINE_ERROR`] |
//! | `reconnecting` | `Connected` | `connected` | cleared |
//! | `reconnecting` | `NetworkOffline` | `offline` | [`OFFLINE_ERROR`] |
//! | `reconnecting` | `Retry` | `connecting` | cleared |
//! | `offline` | `NetworkOnline` | `connecting` | cleared |

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Error recorded when the host reports no network path.
pub const OFFLINE_ERROR: &str = "No Internet Connection";

/// Liveness of the collaboration socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Startup, before the transport status has been read. Never re-entered.
    Initializing,
    /// Establishing the transport connection.
    Connecting,
    /// Transport is live.
    Connected,
    /// Link dropped after being up; retry under way.
    Reconnecting,
    /// No link and no automatic retry in progress.
    Disconnected,
    /// Host reports no network path; only `NetworkOnline` leaves this state.
    Offline,
}

impl ConnectionStatus {
    /// Every status, in declaration order.
    pub const ALL: [ConnectionStatus; 6] = [
        ConnectionStatus::Initializing,
        ConnectionStatus::Connecting,
        ConnectionStatus::Connected,
        ConnectionStatus::Reconnecting,
        ConnectionStatus::Disconnected,
        ConnectionStatus::Offline,
    ];

    /// Lowercase name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Initializing => "initializing",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Reconnecting => "reconnecting",
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Offline => "offline",
        }
    }

    /// Returns true for states that may carry an error.
    pub fn may_hold_error(&self) -> bool {
        matches!(
            self,
            ConnectionStatus::Disconnected
                | ConnectionStatus::Reconnecting
                | ConnectionStatus::Offline
        )
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Explicit request to begin connecting.
    Connect,
    /// Transport confirms the link is live.
    Connected,
    /// Transport confirms the link is down, optionally with a reason.
    Disconnected(Option<String>),
    /// Host network became reachable.
    NetworkOnline,
    /// Host network became unreachable.
    NetworkOffline,
    /// User asked for a manual reconnect.
    Retry,
}

impl ConnectionEvent {
    /// Every event kind, with `Disconnected` carrying no reason.
    pub fn all() -> [ConnectionEvent; 6] {
        [
            ConnectionEvent::Connect,
            ConnectionEvent::Connected,
            ConnectionEvent::Disconnected(None),
            ConnectionEvent::NetworkOnline,
            ConnectionEvent::NetworkOffline,
            ConnectionEvent::Retry,
        ]
    }

    /// Upper-case event name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            ConnectionEvent::Connect => "CONNECT",
            ConnectionEvent::Connected => "CONNECTED",
            ConnectionEvent::Disconnected(_) => "DISCONNECTED",
            ConnectionEvent::NetworkOnline => "NETWORK_ONLINE",
            ConnectionEvent::NetworkOffline => "NETWORK_OFFLINE",
            ConnectionEvent::Retry => "RETRY",
        }
    }
}

impl fmt::Display for ConnectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionEvent::Disconnected(Some(reason)) => write!(f, "DISCONNECTED({})", reason),
            other => f.write_str(other.name()),
        }
    }
}

/// What a transition does to the recorded error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorEffect {
    /// Remove any recorded error.
    Clear,
    /// Record this (non-empty) error.
    Set(String),
}

/// Result of a defined `(status, event)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Status after the transition.
    pub to: ConnectionStatus,
    /// Error side effect applied together with the status change.
    pub effect: ErrorEffect,
}

impl Transition {
    fn enter(status: ConnectionStatus) -> Self {
        Transition {
            to: status,
            effect: ErrorEffect::Clear,
        }
    }

    fn with_error(mut self, error: Option<&str>) -> Self {
        self.effect = match error {
            Some(error) if !error.is_empty() => ErrorEffect::Set(error.to_string()),
            _ => ErrorEffect::Clear,
        };
        self
    }

    /// The startup transition out of `initializing`.
    pub fn seed(transport_connected: bool) -> Self {
        if transport_connected {
            Transition::enter(ConnectionStatus::Connected)
        } else {
            Transition::enter(ConnectionStatus::Connecting)
        }
    }
}

/// The transition table. `None` means the event is a no-op in `from`.
pub fn transition(from: ConnectionStatus, event: &ConnectionEvent) -> Option<Transition> {
    use ConnectionEvent as E;
    use ConnectionStatus as S;

    let next = match (from, event) {
        (S::Disconnected, E::Connect | E::NetworkOnline) => Transition::enter(S::Connecting),
        (S::Connecting | S::Reconnecting, E::Connected) => Transition::enter(S::Connected),
        (S::Connecting | S::Connected, E::Disconnected(reason)) => {
            Transition::enter(S::Reconnecting).with_error(reason.as_deref())
        }
        (S::Connecting | S::Connected | S::Reconnecting, E::NetworkOffline) => {
            Transition::enter(S::Offline).with_error(Some(OFFLINE_ERROR))
        }
        (S::Reconnecting, E::Retry) => Transition::enter(S::Connecting),
        (S::Offline, E::NetworkOnline) => Transition::enter(S::Connecting),
        _ => return None,
    };
    Some(next)
}

/// Status plus the last failure reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSnapshot {
    /// Current status.
    pub status: ConnectionStatus,
    /// Last failure reason; only ever set in `disconnected`, `reconnecting`
    /// or `offline`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConnectionSnapshot {
    /// The startup snapshot.
    pub fn initializing() -> Self {
        ConnectionSnapshot {
            status: ConnectionStatus::Initializing,
            error: None,
        }
    }

    /// Returns true if the transport is live.
    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    fn apply(&mut self, transition: Transition) {
        self.status = transition.to;
        self.error = match transition.effect {
            ErrorEffect::Clear => None,
            ErrorEffect::Set(error) => Some(error),
        };
    }
}

impl Default for ConnectionSnapshot {
    fn default() -> Self {
        Self::initializing()
    }
}

/// Owns a single [`ConnectionSnapshot`] and moves it only through the table.
#[derive(Debug, Clone, Default)]
pub struct ConnectionMachine {
    snapshot: ConnectionSnapshot,
}

impl ConnectionMachine {
    /// Creates a machine in `initializing`.
    pub fn new() -> Self {
        ConnectionMachine::default()
    }

    /// Creates a machine resuming from an existing snapshot.
    ///
    /// An error attached to a status that cannot hold one is dropped.
    pub fn from_snapshot(mut snapshot: ConnectionSnapshot) -> Self {
        if !snapshot.status.may_hold_error() || snapshot.error.as_deref() == Some("") {
            snapshot.error = None;
        }
        ConnectionMachine { snapshot }
    }

    /// Leaves `initializing` according to the transport's current flag.
    ///
    /// Returns false (and does nothing) once the machine has left
    /// `initializing`.
    pub fn seed(&mut self, transport_connected: bool) -> bool {
        if self.snapshot.status != ConnectionStatus::Initializing {
            trace!(status = %self.snapshot.status, "seed ignored after startup");
            return false;
        }
        let next = Transition::seed(transport_connected);
        debug!(from = "initializing", to = %next.to, transport_connected, "connection seeded");
        self.snapshot.apply(next);
        true
    }

    /// Applies an event. Returns true if the snapshot changed.
    pub fn dispatch(&mut self, event: &ConnectionEvent) -> bool {
        let from = self.snapshot.status;
        let Some(next) = transition(from, event) else {
            trace!(status = %from, event = %event, "event ignored");
            return false;
        };

        let before = self.snapshot.clone();
        self.snapshot.apply(next);
        debug!(from = %from, event = %event, to = %self.snapshot.status, "connection transition");
        self.snapshot != before
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> &ConnectionSnapshot {
        &self.snapshot
    }

    /// Returns the current status.
    pub fn status(&self) -> ConnectionStatus {
        self.snapshot.status
    }

    /// Returns the recorded error, if any.
    pub fn error(&self) -> Option<&str> {
        self.snapshot.error.as_deref()
    }
}
