// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! WebSocket Transport
//!
//! Real transport implementation using tungstenite for the collaboration
//! socket. `wss://` URLs are wrapped in rustls by tungstenite itself.

use std::io::ErrorKind;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, warn};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

use super::error::{TransportError, TransportResult};
use super::transport::{StatusCallback, Transport, TransportConfig};
use crate::subscription::{CallbackList, Subscription};

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

/// WebSocket transport for the collaboration server.
///
/// Liveness is observed while frames are read or written: a close frame or
/// an I/O error drops the socket and notifies subscribers with `false`.
/// Hosts are expected to call [`WebSocketTransport::receive`] from their
/// read loop.
///
/// # Example
///
/// ```ignore
/// use chatnote_core::network::{Transport, TransportConfig, WebSocketTransport};
///
/// let transport = WebSocketTransport::new(TransportConfig::with_server_url("wss://notes.example.com/ws"));
/// transport.connect()?;
/// while let Some(frame) = transport.receive()? { /* ... */ }
/// ```
pub struct WebSocketTransport {
    config: TransportConfig,
    socket: Mutex<Option<Socket>>,
    last_error: Mutex<Option<String>>,
    callbacks: CallbackList<bool>,
}

impl WebSocketTransport {
    /// Creates a new, disconnected WebSocket transport.
    pub fn new(config: TransportConfig) -> Self {
        WebSocketTransport {
            config,
            socket: Mutex::new(None),
            last_error: Mutex::new(None),
            callbacks: CallbackList::new(),
        }
    }

    /// Returns the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Parses a WebSocket URL into host and port.
    fn parse_url(url: &str) -> TransportResult<(String, u16)> {
        let is_tls = url.starts_with("wss://");
        let url_without_scheme = url
            .strip_prefix("wss://")
            .or_else(|| url.strip_prefix("ws://"))
            .ok_or_else(|| {
                TransportError::InvalidUrl(format!("{} (expected ws:// or wss://)", url))
            })?;

        // Split host:port/path
        let host_port = url_without_scheme
            .split('/')
            .next()
            .unwrap_or(url_without_scheme);

        let (host, port) = if let Some(colon_pos) = host_port.rfind(':') {
            let host = &host_port[..colon_pos];
            let port_str = &host_port[colon_pos + 1..];
            let port: u16 = port_str
                .parse()
                .map_err(|_| TransportError::InvalidUrl(format!("invalid port: {}", port_str)))?;
            (host.to_string(), port)
        } else {
            let default_port = if is_tls { 443 } else { 80 };
            (host_port.to_string(), default_port)
        };

        if host.is_empty() {
            return Err(TransportError::InvalidUrl(format!("missing host: {}", url)));
        }

        Ok((host, port))
    }

    fn open(&self) -> TransportResult<Socket> {
        let (host, port) = Self::parse_url(&self.config.server_url)?;

        let addr = (host.as_str(), port)
            .to_socket_addrs()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?
            .next()
            .ok_or_else(|| {
                TransportError::ConnectionFailed(format!("no address for {}", host))
            })?;

        let connect_timeout = Duration::from_millis(self.config.connect_timeout_ms);
        let tcp_stream = TcpStream::connect_timeout(&addr, connect_timeout).map_err(|e| {
            if e.kind() == ErrorKind::TimedOut {
                TransportError::Timeout
            } else {
                TransportError::ConnectionFailed(e.to_string())
            }
        })?;

        let io_timeout = Some(Duration::from_millis(self.config.io_timeout_ms));
        tcp_stream
            .set_read_timeout(io_timeout)
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        tcp_stream
            .set_write_timeout(io_timeout)
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        let (socket, _response) =
            tungstenite::client_tls(self.config.server_url.as_str(), tcp_stream).map_err(|e| {
                TransportError::ConnectionFailed(format!("WebSocket handshake failed: {}", e))
            })?;

        Ok(socket)
    }

    /// Records the loss of the link and notifies subscribers.
    fn mark_dropped(&self, reason: String) {
        warn!(reason = %reason, "websocket link dropped");
        *self.last_error.lock() = Some(reason);
        self.callbacks.emit(&false);
    }

    /// Sends a binary frame.
    pub fn send(&self, payload: Vec<u8>) -> TransportResult<()> {
        let result = {
            let mut guard = self.socket.lock();
            let socket = guard.as_mut().ok_or(TransportError::NotConnected)?;
            match socket.send(Message::Binary(payload)) {
                Ok(()) => Ok(()),
                Err(e) => {
                    guard.take();
                    Err(e.to_string())
                }
            }
        };

        result.map_err(|reason| {
            self.mark_dropped(reason.clone());
            TransportError::SendFailed(reason)
        })
    }

    /// Reads the next data frame.
    ///
    /// Returns `Ok(None)` when no frame arrived before the I/O timeout or a
    /// control frame was consumed.
    pub fn receive(&self) -> TransportResult<Option<Vec<u8>>> {
        let dropped = {
            let mut guard = self.socket.lock();
            let socket = guard.as_mut().ok_or(TransportError::NotConnected)?;
            match socket.read() {
                Ok(Message::Binary(data)) => return Ok(Some(data)),
                Ok(Message::Text(text)) => return Ok(Some(text.into_bytes())),
                Ok(Message::Close(_)) => {
                    guard.take();
                    (TransportError::ConnectionClosed, "closed by server".to_string())
                }
                // Ping/pong are answered by tungstenite on the next read/write.
                Ok(_) => return Ok(None),
                Err(tungstenite::Error::Io(ref e))
                    if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut =>
                {
                    return Ok(None);
                }
                Err(e) => {
                    guard.take();
                    (TransportError::ReceiveFailed(e.to_string()), e.to_string())
                }
            }
        };

        let (error, reason) = dropped;
        self.mark_dropped(reason);
        Err(error)
    }
}

impl Transport for WebSocketTransport {
    fn is_connected(&self) -> bool {
        self.socket.lock().is_some()
    }

    fn subscribe(&self, on_change: StatusCallback) -> Subscription {
        self.callbacks.register(move |connected| on_change(*connected))
    }

    fn connect(&self) -> TransportResult<()> {
        if self.is_connected() {
            return Ok(());
        }

        let socket = self.open().inspect_err(|e| {
            *self.last_error.lock() = Some(e.to_string());
        })?;

        *self.socket.lock() = Some(socket);
        *self.last_error.lock() = None;
        debug!(url = %self.config.server_url, "websocket connected");
        self.callbacks.emit(&true);
        Ok(())
    }

    fn disconnect(&self) -> TransportResult<()> {
        let socket = self.socket.lock().take();
        if let Some(mut socket) = socket {
            let _ = socket.close(None); // Ignore errors on close
            let _ = socket.flush();
            debug!(url = %self.config.server_url, "websocket disconnected");
            self.callbacks.emit(&false);
        }
        Ok(())
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }
}

// INLINE_TEST_REQUIRED: Tests private URL parsing
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_defaults_port_by_scheme() {
        assert_eq!(
            WebSocketTransport::parse_url("ws://localhost/socket").unwrap(),
            ("localhost".to_string(), 80)
        );
        assert_eq!(
            WebSocketTransport::parse_url("wss://notes.example.com/ws").unwrap(),
            ("notes.example.com".to_string(), 443)
        );
    }

    #[test]
    fn test_parse_url_explicit_port() {
        assert_eq!(
            WebSocketTransport::parse_url("ws://127.0.0.1:8080/ws").unwrap(),
            ("127.0.0.1".to_string(), 8080)
        );
    }

    #[test]
    fn test_parse_url_rejects_other_schemes() {
        let err = WebSocketTransport::parse_url("https://example.com").unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }

    #[test]
    fn test_parse_url_rejects_bad_port_and_missing_host() {
        assert!(WebSocketTransport::parse_url("ws://host:notaport").is_err());
        assert!(WebSocketTransport::parse_url("ws://:80/").is_err());
    }

    #[test]
    fn test_connect_failure_records_error_without_signal() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let transport = WebSocketTransport::new(TransportConfig {
            server_url: "ws://127.0.0.1:9/ws".into(),
            connect_timeout_ms: 500,
            io_timeout_ms: 500,
        });
        let signals = std::sync::Arc::new(Mutex::new(Vec::new()));
        let _sub = {
            let signals = std::sync::Arc::clone(&signals);
            transport.subscribe(Box::new(move |c| signals.lock().push(c)))
        };

        assert!(transport.connect().is_err());
        assert!(!transport.is_connected());
        assert!(transport.last_error().is_some());
        assert!(signals.lock().is_empty());
    }

    #[test]
    fn test_disconnect_when_not_connected_is_silent() {
        let transport = WebSocketTransport::new(TransportConfig::default());
        let _sub = transport.subscribe(Box::new(|_| panic!("no signal expected")));
        transport.disconnect().unwrap();
        assert!(matches!(
            transport.receive(),
            Err(TransportError::NotConnected)
        ));
    }
}
