// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network + Transport Layer
//!
//! Collaborators observed by the connection driver.
//!
//! # Architecture
//!
//! - **Transport trait**: liveness of the collaboration socket plus the
//!   `connect`/`disconnect` primitives used for manual reconnects
//! - **Network monitor**: host `online`/`offline` signals
//! - **Mock transport**: scriptable transport for tests and demos
//! - **WebSocket transport**: tungstenite client for production use
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use chatnote_core::network::{MockTransport, Transport};
//!
//! let transport = Arc::new(MockTransport::new());
//! let sub = transport.subscribe(Box::new(|connected| println!("link up: {connected}")));
//! transport.set_connected(true);
//! ```

mod error;
mod mock;
mod monitor;
mod transport;
#[cfg(feature = "websocket")]
mod websocket;

// Error types
pub use error::{TransportError, TransportResult};

// Transport abstraction
pub use transport::{StatusCallback, Transport, TransportConfig};

// Host network signals
pub use monitor::{ManualNetworkMonitor, NetworkCallback, NetworkMonitor, NetworkStatus};

// Mock transport for testing
pub use mock::MockTransport;

// WebSocket transport for production
#[cfg(feature = "websocket")]
pub use websocket::WebSocketTransport;
