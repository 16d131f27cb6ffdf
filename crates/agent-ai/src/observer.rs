//! Subscriber registry with handle-based unsubscription.
//!
//! Dispatch reaches every current subscriber in subscription order. A
//! subscriber that fails is logged and skipped; the remaining subscribers
//! still receive the notification.

use std::fmt::Display;

use tracing::warn;

/// Handle returned by [`ObserverSet::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

pub struct ObserverSet<L: ?Sized> {
    next_id: u64,
    observers: Vec<(Subscription, Box<L>)>,
}

impl<L: ?Sized> ObserverSet<L> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<L>) -> Subscription {
        let handle = Subscription(self.next_id);
        self.next_id += 1;
        self.observers.push((handle, observer));
        handle
    }

    /// Detaches the observer behind `handle`. Returns `false` if it was
    /// already gone.
    pub fn unsubscribe(&mut self, handle: Subscription) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(id, _)| *id != handle);
        self.observers.len() != before
    }

    pub fn clear(&mut self) {
        self.observers.clear();
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Invokes `notify` on every observer. Returns the number of observers
    /// that reported an error.
    pub fn notify<E, F>(&mut self, mut notify: F) -> usize
    where
        E: Display,
        F: FnMut(&mut L) -> Result<(), E>,
    {
        let mut failures = 0;
        for (handle, observer) in &mut self.observers {
            if let Err(e) = notify(observer.as_mut()) {
                failures += 1;
                warn!("observer {:?} failed: {}", handle, e);
            }
        }
        failures
    }
}

impl<L: ?Sized> Default for ObserverSet<L> {
    fn default() -> Self {
        Self::new()
    }
}
