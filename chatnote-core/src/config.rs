// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Connection Configuration
//!
//! Configuration types for the connection driver and its transport.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::network::TransportConfig;

/// Configuration error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for a connection driver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Transport settings.
    pub transport: TransportConfig,

    /// Reconnect backoff settings.
    pub reconnect: ReconnectPolicy,
}

impl ConnectionConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ConnectionConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the server URL.
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.transport.server_url = url.into();
        self
    }

    /// Sets the reconnect policy.
    pub fn with_reconnect(mut self, reconnect: ReconnectPolicy) -> Self {
        self.reconnect = reconnect;
        self
    }

    /// Checks the configuration for values the driver cannot work with.
    ///
    /// An empty server URL is accepted: the transport may be configured later.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.transport.server_url;
        if !url.is_empty() && !url.starts_with("ws://") && !url.starts_with("wss://") {
            return Err(ConfigError::Invalid(format!(
                "server_url must start with ws:// or wss://, got {}",
                url
            )));
        }
        if self.transport.connect_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "connect_timeout_ms must be greater than zero".into(),
            ));
        }
        self.reconnect.validate()
    }
}

/// Exponential backoff for automatic reconnects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectPolicy {
    /// Delay before the first retry (milliseconds).
    pub base_delay_ms: u64,

    /// Upper bound for any single delay (milliseconds).
    pub max_delay_ms: u64,

    /// Retries allowed before the host stops scheduling them.
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        ReconnectPolicy {
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
            max_attempts: 5,
        }
    }
}

impl ReconnectPolicy {
    /// Returns the delay before retry number `attempt` (0-based), or `None`
    /// once `max_attempts` retries have been made.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        let delay_ms = self
            .base_delay_ms
            .saturating_mul(1 << attempt.min(6))
            .min(self.max_delay_ms);
        Some(Duration::from_millis(delay_ms))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.base_delay_ms == 0 {
            return Err(ConfigError::Invalid(
                "reconnect.base_delay_ms must be greater than zero".into(),
            ));
        }
        if self.max_delay_ms < self.base_delay_ms {
            return Err(ConfigError::Invalid(
                "reconnect.max_delay_ms must not be below base_delay_ms".into(),
            ));
        }
        Ok(())
    }
}
