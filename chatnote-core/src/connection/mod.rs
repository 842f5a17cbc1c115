// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Connection Layer
//!
//! # Overview
//!
//! - [`state`] - the pure state machine: statuses, events, transition table
//! - [`driver`] - wires a [`Transport`](crate::network::Transport) and a
//!   [`NetworkMonitor`](crate::network::NetworkMonitor) into the machine and
//!   publishes snapshots to subscribers
//! - [`indicator`] - status widget presentation hints
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use chatnote_core::connection::{ConnectionDriver, StatusIndicator};
//! use chatnote_core::network::{ManualNetworkMonitor, MockTransport};
//! use chatnote_core::ConnectionConfig;
//!
//! let transport = Arc::new(MockTransport::connected());
//! let network = ManualNetworkMonitor::default();
//! let driver = ConnectionDriver::new(transport, ConnectionConfig::default());
//! driver.watch_network(&network);
//!
//! let _sub = driver.subscribe(|snapshot| {
//!     let indicator = StatusIndicator::for_snapshot(snapshot);
//!     println!("{}", indicator.tooltip);
//! });
//! ```

pub mod driver;
pub mod indicator;
pub mod state;

pub use driver::ConnectionDriver;
pub use indicator::{IndicatorTone, StatusIndicator};
pub use state::{
    transition, ConnectionEvent, ConnectionMachine, ConnectionSnapshot, ConnectionStatus,
    ErrorEffect, Transition, OFFLINE_ERROR,
};
