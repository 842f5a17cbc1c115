// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Subscriptions
//!
//! Callback registration shared by the driver, the transports and the
//! network monitor. Registering returns a [`Subscription`] handle; dropping
//! or calling [`Subscription::unsubscribe`] removes the callback.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

type Callback<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// Handle returned by every `subscribe` call.
///
/// The callback stays registered for as long as the handle is alive.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Creates a subscription that runs `cancel` exactly once when released.
    pub fn new<F>(cancel: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Subscription {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to release.
    pub fn noop() -> Self {
        Subscription { cancel: None }
    }

    /// Removes the callback now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Keeps the callback registered for the lifetime of its source.
    pub fn detach(mut self) {
        self.cancel = None;
    }

    /// Returns true until the subscription has been released or detached.
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

struct Slots<A> {
    next_id: u64,
    entries: Vec<(u64, Callback<A>)>,
}

/// Ordered list of callbacks receiving `&A`.
///
/// Callbacks run outside the internal lock, so a callback may register,
/// unsubscribe or emit again without deadlocking.
pub struct CallbackList<A> {
    slots: Arc<Mutex<Slots<A>>>,
}

impl<A: 'static> CallbackList<A> {
    /// Creates an empty list.
    pub fn new() -> Self {
        CallbackList {
            slots: Arc::new(Mutex::new(Slots {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Registers a callback.
    pub fn register<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        let id = {
            let mut slots = self.slots.lock();
            let id = slots.next_id;
            slots.next_id += 1;
            slots.entries.push((id, Arc::new(callback)));
            id
        };

        let slots: Weak<Mutex<Slots<A>>> = Arc::downgrade(&self.slots);
        Subscription::new(move || {
            if let Some(slots) = slots.upgrade() {
                slots.lock().entries.retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Calls every registered callback in registration order.
    pub fn emit(&self, value: &A) {
        let callbacks: Vec<Callback<A>> = self
            .slots
            .lock()
            .entries
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(value);
        }
    }

    /// Returns the number of registered callbacks.
    pub fn len(&self) -> usize {
        self.slots.lock().entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all callbacks. Outstanding handles become no-ops.
    pub fn clear(&self) {
        self.slots.lock().entries.clear();
    }
}

impl<A: 'static> Default for CallbackList<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for CallbackList<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackList")
            .field("len", &self.slots.lock().entries.len())
            .finish()
    }
}
