// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Chatnote Core Library
//!
//! Tracks the liveness of the Chatnote client's collaboration socket.
//! A pure, total state machine decides every transition; the driver feeds it
//! transport and host-network signals and republishes the result to the UI.

pub mod config;
pub mod connection;
pub mod network;
pub mod subscription;

pub use config::{ConfigError, ConnectionConfig, ReconnectPolicy};
pub use connection::{
    transition, ConnectionDriver, ConnectionEvent, ConnectionMachine, ConnectionSnapshot,
    ConnectionStatus, ErrorEffect, IndicatorTone, StatusIndicator, Transition, OFFLINE_ERROR,
};
pub use network::{
    ManualNetworkMonitor, MockTransport, NetworkCallback, NetworkMonitor, NetworkStatus,
    StatusCallback, Transport, TransportConfig, TransportError, TransportResult,
};
#[cfg(feature = "websocket")]
pub use network::WebSocketTransport;
pub use subscription::{CallbackList, Subscription};
