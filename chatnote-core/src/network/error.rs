// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Transport Error Types

use thiserror::Error;

/// Transport error types.
///
/// Never surfaced to the UI directly: the driver downgrades these into a
/// `Disconnected` event whose error text is the `Display` output below.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Connection timeout")]
    Timeout,

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Message send failed: {0}")]
    SendFailed(String),

    #[error("Message receive failed: {0}")]
    ReceiveFailed(String),

    #[error("Transport not connected")]
    NotConnected,
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let errors = vec![
            (
                TransportError::ConnectionFailed("refused".into()),
                "Connection failed: refused",
            ),
            (TransportError::ConnectionClosed, "Connection closed"),
            (TransportError::Timeout, "Connection timeout"),
            (
                TransportError::InvalidUrl("ftp://x".into()),
                "Invalid server URL: ftp://x",
            ),
            (TransportError::NotConnected, "Transport not connected"),
        ];

        for (error, expected) in errors {
            assert_eq!(error.to_string(), expected);
        }
    }
}
