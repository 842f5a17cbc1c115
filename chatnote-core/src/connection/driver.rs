// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Connection Driver
//!
//! Bridges the pure [`ConnectionMachine`] to a transport, a host network
//! monitor and any number of snapshot subscribers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{Mutex, ReentrantMutex};
use tracing::{debug, info, warn};

use super::state::{ConnectionEvent, ConnectionMachine, ConnectionSnapshot, ConnectionStatus};
use crate::config::ConnectionConfig;
use crate::network::{NetworkMonitor, NetworkStatus, Transport};
use crate::subscription::{CallbackList, Subscription};

impl From<NetworkStatus> for ConnectionEvent {
    fn from(status: NetworkStatus) -> Self {
        match status {
            NetworkStatus::Online => ConnectionEvent::NetworkOnline,
            NetworkStatus::Offline => ConnectionEvent::NetworkOffline,
        }
    }
}

/// A snapshot numbered in the order it was produced.
#[derive(Clone)]
struct Published {
    seq: u64,
    snapshot: ConnectionSnapshot,
}

struct DriverState {
    machine: ConnectionMachine,
    /// Bumped on every transport restart; older transport signals are stale.
    generation: u64,
    /// Retries since the link was last up.
    attempts: u32,
    /// Number of snapshots produced so far.
    seq: u64,
    /// A reconnect is tearing down or bringing up the link.
    restarting: bool,
    stopped: bool,
}

impl DriverState {
    /// Dispatches `event` and updates the retry bookkeeping. Returns the new
    /// snapshot when the state changed.
    fn advance(&mut self, event: &ConnectionEvent) -> Option<Published> {
        if !self.machine.dispatch(event) {
            return None;
        }

        match self.machine.status() {
            ConnectionStatus::Connected => self.attempts = 0,
            ConnectionStatus::Connecting if matches!(event, ConnectionEvent::Retry) => {
                self.attempts = self.attempts.saturating_add(1);
            }
            _ => {}
        }
        self.seq += 1;
        Some(Published {
            seq: self.seq,
            snapshot: self.machine.snapshot().clone(),
        })
    }
}

struct Shared {
    state: Mutex<DriverState>,
    /// Held from a state change until every listener has seen it, so
    /// changes reach listeners in the order they were made. Reentrant so a
    /// listener may drive the machine again from the same thread.
    publish: ReentrantMutex<()>,
    listeners: CallbackList<Published>,
}

impl Shared {
    /// Feeds one event to the machine and notifies listeners on change.
    /// Returns the new status if the state changed.
    ///
    /// `generation` is set for transport signals only.
    fn apply(&self, event: ConnectionEvent, generation: Option<u64>) -> Option<ConnectionStatus> {
        let _publish = self.publish.lock();
        let published = {
            let mut state = self.state.lock();
            if state.stopped {
                debug!(event = %event, "driver stopped, event dropped");
                return None;
            }
            if let Some(generation) = generation {
                if generation != state.generation {
                    warn!(
                        event = %event,
                        generation,
                        current = state.generation,
                        "stale transport signal discarded"
                    );
                    return None;
                }
            }
            state.advance(&event)?
        };

        // State lock released so listeners may read the driver.
        self.listeners.emit(&published);
        Some(published.snapshot.status)
    }

    /// Applies a manual retry and decides, in the same critical section,
    /// whether the transport must be restarted. Returns the generation the
    /// restarted link will use.
    fn begin_retry(&self) -> Option<u64> {
        let _publish = self.publish.lock();
        let mut changes = Vec::new();
        let generation = {
            let mut state = self.state.lock();
            let status = state.machine.status();
            if state.stopped || state.restarting || status == ConnectionStatus::Offline {
                debug!(status = %status, restarting = state.restarting, "reconnect ignored");
                return None;
            }

            info!(status = %status, "manual reconnect requested");
            changes.extend(state.advance(&ConnectionEvent::Retry));
            if state.machine.status() == ConnectionStatus::Disconnected {
                changes.extend(state.advance(&ConnectionEvent::Connect));
            }

            if state.machine.status() == ConnectionStatus::Connecting {
                state.generation += 1;
                state.restarting = true;
                Some(state.generation)
            } else {
                None
            }
        };

        for published in &changes {
            self.listeners.emit(published);
        }
        generation
    }

    fn finish_retry(&self) {
        self.state.lock().restarting = false;
    }
}

/// Moves a `connecting` machine on: a link that is already up is reported
/// as connected, otherwise the transport is asked to connect.
fn bring_up<T: Transport + ?Sized>(shared: &Shared, transport: &T) {
    if transport.is_connected() {
        debug!("transport already up");
        shared.apply(ConnectionEvent::Connected, None);
        return;
    }
    if let Err(err) = transport.connect() {
        warn!(error = %err, "transport connect failed");
        shared.apply(ConnectionEvent::Disconnected(Some(err.to_string())), None);
    }
}

/// Connection driver.
///
/// Construction reads the transport's connected flag once and leaves
/// `initializing` immediately, so a link that is already up is reported as
/// `connected` from the first [`state`](Self::state) call.
///
/// Every entry point (transport callback, network callback, `connect`,
/// `reconnect`) serializes on one lock, so callbacks may arrive on any
/// thread.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use chatnote_core::{ConnectionConfig, ConnectionDriver, MockTransport};
///
/// let transport = Arc::new(MockTransport::new());
/// let driver = ConnectionDriver::new(Arc::clone(&transport), ConnectionConfig::default());
/// assert_eq!(driver.status().as_str(), "connecting");
///
/// transport.set_connected(true);
/// assert!(driver.state().is_connected());
/// ```
pub struct ConnectionDriver<T: Transport + 'static> {
    transport: Arc<T>,
    config: ConnectionConfig,
    shared: Arc<Shared>,
    transport_sub: Mutex<Option<Subscription>>,
    network_sub: Mutex<Option<Subscription>>,
}

impl<T: Transport + 'static> ConnectionDriver<T> {
    /// Creates a driver and starts listening to the transport.
    pub fn new(transport: Arc<T>, config: ConnectionConfig) -> Self {
        let mut machine = ConnectionMachine::new();
        machine.seed(transport.is_connected());

        let driver = ConnectionDriver {
            transport,
            config,
            shared: Arc::new(Shared {
                state: Mutex::new(DriverState {
                    machine,
                    generation: 0,
                    attempts: 0,
                    seq: 0,
                    restarting: false,
                    stopped: false,
                }),
                publish: ReentrantMutex::new(()),
                listeners: CallbackList::new(),
            }),
            transport_sub: Mutex::new(None),
            network_sub: Mutex::new(None),
        };

        driver.attach_transport(0);
        driver.reconcile(0);
        info!(status = %driver.status(), "connection driver started");
        driver
    }

    /// Returns the current snapshot.
    pub fn state(&self) -> ConnectionSnapshot {
        self.shared.state.lock().machine.snapshot().clone()
    }

    /// Returns the current status.
    pub fn status(&self) -> ConnectionStatus {
        self.shared.state.lock().machine.status()
    }

    /// Returns the recorded error, if any.
    pub fn error(&self) -> Option<String> {
        self.shared.state.lock().machine.error().map(str::to_string)
    }

    /// Registers a callback invoked with every new snapshot.
    ///
    /// Events that leave the state unchanged do not notify. A snapshot
    /// older than one the callback has already seen is never delivered.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ConnectionSnapshot) + Send + Sync + 'static,
    {
        let last_seen = AtomicU64::new(0);
        self.shared.listeners.register(move |published: &Published| {
            if last_seen.fetch_max(published.seq, Ordering::SeqCst) >= published.seq {
                return;
            }
            callback(&published.snapshot);
        })
    }

    /// Starts following a host network monitor, replacing any previous one.
    ///
    /// Coming back online leaves the machine `connecting`; the transport is
    /// then checked again, since a link that survived the outage reports no
    /// change of its own.
    pub fn watch_network<M: NetworkMonitor + ?Sized>(&self, monitor: &M) {
        if self.is_stopped() {
            return;
        }
        let shared = Arc::downgrade(&self.shared);
        let transport: Weak<T> = Arc::downgrade(&self.transport);
        let subscription = monitor.subscribe(Box::new(move |status: NetworkStatus| {
            let Some(shared) = shared.upgrade() else {
                return;
            };
            if shared.apply(status.into(), None) != Some(ConnectionStatus::Connecting) {
                return;
            }
            if let Some(transport) = transport.upgrade() {
                bring_up(&shared, transport.as_ref());
            }
        }));
        let previous = self.network_sub.lock().replace(subscription);
        drop(previous);
    }

    /// Explicit request to begin connecting.
    ///
    /// Emits `Connect`; while the machine is `connecting` the transport is
    /// asked to connect as well.
    pub fn connect(&self) {
        if self.is_stopped() {
            return;
        }
        self.shared.apply(ConnectionEvent::Connect, None);
        if self.status() == ConnectionStatus::Connecting {
            bring_up(&self.shared, self.transport.as_ref());
        }
    }

    /// Manual reconnect.
    ///
    /// Emits `Retry` (and `Connect` from `disconnected`). When that leaves the
    /// machine `connecting`, the transport link is torn down and brought up
    /// again; signals from the old link are discarded. Ignored while
    /// `offline`, which only a network signal can clear, and while
    /// `connected`, and while another reconnect is still restarting the
    /// link.
    pub fn reconnect(&self) {
        let Some(generation) = self.shared.begin_retry() else {
            return;
        };
        self.restart_transport(generation);
        self.shared.finish_retry();
    }

    /// Retries made since the link was last up.
    pub fn reconnect_attempts(&self) -> u32 {
        self.shared.state.lock().attempts
    }

    /// Delay before the host should call [`reconnect`](Self::reconnect)
    /// again. `None` unless `reconnecting` with retries left.
    pub fn next_retry_delay(&self) -> Option<Duration> {
        let state = self.shared.state.lock();
        if state.machine.status() != ConnectionStatus::Reconnecting {
            return None;
        }
        self.config.reconnect.delay_for(state.attempts)
    }

    /// Detaches from the transport and network monitor. Later signals and
    /// calls have no effect.
    pub fn stop(&self) {
        {
            let mut state = self.shared.state.lock();
            if state.stopped {
                return;
            }
            state.stopped = true;
        }

        let transport_sub = self.transport_sub.lock().take();
        let network_sub = self.network_sub.lock().take();
        drop(transport_sub);
        drop(network_sub);
        info!(status = %self.status(), "connection driver stopped");
    }

    /// Returns true once [`stop`](Self::stop) has run.
    pub fn is_stopped(&self) -> bool {
        self.shared.state.lock().stopped
    }

    /// Returns the driven transport.
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Returns the driver configuration.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    fn attach_transport(&self, generation: u64) {
        let shared = Arc::downgrade(&self.shared);
        let transport: Weak<T> = Arc::downgrade(&self.transport);
        let subscription = self.transport.subscribe(Box::new(move |connected: bool| {
            let Some(shared) = shared.upgrade() else {
                return;
            };
            let event = if connected {
                ConnectionEvent::Connected
            } else {
                ConnectionEvent::Disconnected(transport.upgrade().and_then(|t| t.last_error()))
            };
            shared.apply(event, Some(generation));
        }));

        let previous = self.transport_sub.lock().replace(subscription);
        drop(previous);

        // stop() may have raced with a restart.
        if self.is_stopped() {
            let subscription = self.transport_sub.lock().take();
            drop(subscription);
        }
    }

    /// Re-reads the transport flag after subscribing, covering a change
    /// between the startup read and the subscription.
    fn reconcile(&self, generation: u64) {
        let connected = self.transport.is_connected();
        let event = match (self.status(), connected) {
            (ConnectionStatus::Connecting, true) => ConnectionEvent::Connected,
            (ConnectionStatus::Connected, false) => {
                ConnectionEvent::Disconnected(self.transport.last_error())
            }
            _ => return,
        };
        debug!(event = %event, "transport changed during startup");
        self.shared.apply(event, Some(generation));
    }

    fn restart_transport(&self, generation: u64) {
        let stale = self.transport_sub.lock().take();
        drop(stale);

        if let Err(err) = self.transport.disconnect() {
            warn!(error = %err, "transport teardown failed");
            self.attach_transport(generation);
            self.shared
                .apply(ConnectionEvent::Disconnected(Some(err.to_string())), None);
            return;
        }

        self.attach_transport(generation);
        bring_up(&self.shared, self.transport.as_ref());
    }
}

impl<T: Transport + 'static> Drop for ConnectionDriver<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<T: Transport + 'static> fmt::Debug for ConnectionDriver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("ConnectionDriver")
            .field("snapshot", state.machine.snapshot())
            .field("generation", &state.generation)
            .field("attempts", &state.attempts)
            .field("restarting", &state.restarting)
            .field("stopped", &state.stopped)
            .finish()
    }
}

// INLINE_TEST_REQUIRED: Tests private generation counter
#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::MockTransport;

    #[test]
    fn test_restart_bumps_generation() {
        let transport = Arc::new(MockTransport::connected());
        let driver = ConnectionDriver::new(Arc::clone(&transport), ConnectionConfig::default());

        transport.drop_link("timeout");
        driver.reconnect();
        assert_eq!(driver.shared.state.lock().generation, 1);
        assert_eq!(transport.subscriber_count(), 1);

        // Ignored while connected: no teardown, no new generation.
        transport.set_connected(true);
        driver.reconnect();
        assert_eq!(driver.shared.state.lock().generation, 1);
        assert_eq!(transport.disconnect_calls(), 1);
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let transport = Arc::new(MockTransport::new());
        let driver = ConnectionDriver::new(transport, ConnectionConfig::default());
        driver.shared.state.lock().generation = 3;

        assert_eq!(driver.shared.apply(ConnectionEvent::Connected, Some(2)), None);
        assert_eq!(driver.status(), ConnectionStatus::Connecting);
        assert_eq!(
            driver.shared.apply(ConnectionEvent::Connected, Some(3)),
            Some(ConnectionStatus::Connected)
        );
        assert_eq!(driver.status(), ConnectionStatus::Connected);
    }
}
