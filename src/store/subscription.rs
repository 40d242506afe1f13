//! Synchronous listener registry behind the store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

use tracing::trace;

/// A change listener. Receives the full post-mutation sequence.
pub type Listener<E> = Arc<dyn Fn(&[E]) + Send + Sync>;

struct Registered<E> {
    token: u64,
    listener: Listener<E>,
}

/// Shared listener registry. Clone-friendly via Arc; clones see the same
/// registrations.
pub(crate) struct Subscribers<E> {
    registered: Arc<RwLock<Vec<Registered<E>>>>,
    next_token: Arc<AtomicU64>,
}

impl<E> Clone for Subscribers<E> {
    fn clone(&self) -> Self {
        Self {
            registered: Arc::clone(&self.registered),
            next_token: Arc::clone(&self.next_token),
        }
    }
}

impl<E> Subscribers<E> {
    pub(crate) fn new() -> Self {
        Self {
            registered: Arc::new(RwLock::new(Vec::new())),
            next_token: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register a listener. Listeners are invoked in registration order.
    pub(crate) fn subscribe<F>(&self, listener: F) -> Subscription<E>
    where
        F: Fn(&[E]) + Send + Sync + 'static,
    {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let mut registered = recover(self.registered.write());
        registered.push(Registered {
            token,
            listener: Arc::new(listener),
        });
        trace!(token, listeners = registered.len(), "listener registered");

        Subscription {
            token,
            registry: Arc::downgrade(&self.registered),
        }
    }

    /// Invoke every registered listener with `state`, in registration order.
    ///
    /// The listener arcs are cloned out before invocation so a listener may
    /// read the store, or subscribe and unsubscribe, re-entrantly.
    pub(crate) fn notify(&self, state: &[E]) {
        let listeners: Vec<Listener<E>> = {
            let registered = recover(self.registered.read());
            registered
                .iter()
                .map(|r| Arc::clone(&r.listener))
                .collect()
        };

        for listener in &listeners {
            listener(state);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        recover(self.registered.read()).len()
    }
}

/// Handle returned by `subscribe`.
///
/// Unsubscription is explicit: dropping the handle leaves the listener
/// registered for the life of the store, which is the common case for
/// session-long UI subscriptions.
pub struct Subscription<E> {
    token: u64,
    registry: Weak<RwLock<Vec<Registered<E>>>>,
}

impl<E> Subscription<E> {
    /// Remove the listener. After this returns, the listener is never
    /// invoked again.
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registered = recover(registry.write());
            registered.retain(|r| r.token != self.token);
            trace!(token = self.token, listeners = registered.len(), "listener removed");
        }
    }
}

/// The registry never holds partially-written state across a panic point,
/// so a poisoned lock is still consistent and safe to keep using.
fn recover<G>(result: Result<G, std::sync::PoisonError<G>>) -> G {
    result.unwrap_or_else(|poisoned| poisoned.into_inner())
}
