// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Status Indicator Mapping
//!
//! What a status widget shows for a snapshot. Rendering is left to the UI.

use serde::Serialize;

use super::state::{ConnectionSnapshot, ConnectionStatus};

/// Icon color family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorTone {
    /// Not connected yet, or the link is being restored.
    Warning,
    /// Link up.
    Success,
    /// Host has no network.
    Danger,
}

/// Presentation hints for a connection status widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusIndicator {
    /// Icon color.
    pub tone: IndicatorTone,
    /// Animate the icon while a connection attempt is in flight.
    pub pulsing: bool,
    /// Offer a clickable reconnect affordance.
    pub reconnectable: bool,
    /// Status label, followed by the recorded error when there is one.
    pub tooltip: String,
}

impl StatusIndicator {
    /// Maps a snapshot to what the status widget should show.
    ///
    /// Only `disconnected` offers the reconnect affordance; `offline` is
    /// left by a network signal alone.
    pub fn for_snapshot(snapshot: &ConnectionSnapshot) -> Self {
        let (tone, pulsing, reconnectable, label) = match snapshot.status {
            ConnectionStatus::Initializing => (IndicatorTone::Warning, true, false, "Starting"),
            ConnectionStatus::Connecting => (IndicatorTone::Warning, true, false, "Connecting"),
            ConnectionStatus::Reconnecting => {
                (IndicatorTone::Warning, true, false, "Reconnecting")
            }
            ConnectionStatus::Connected => (IndicatorTone::Success, false, false, "Connected"),
            ConnectionStatus::Disconnected => {
                (IndicatorTone::Warning, false, true, "Disconnected, click to reconnect")
            }
            // Only a network signal clears this, so no reconnect button.
            ConnectionStatus::Offline => (IndicatorTone::Danger, false, false, "Offline"),
        };

        let tooltip = match &snapshot.error {
            Some(error) => format!("{}: {}", label, error),
            None => label.to_string(),
        };

        StatusIndicator {
            tone,
            pulsing,
            reconnectable,
            tooltip,
        }
    }
}

impl From<&ConnectionSnapshot> for StatusIndicator {
    fn from(snapshot: &ConnectionSnapshot) -> Self {
        StatusIndicator::for_snapshot(snapshot)
    }
}
