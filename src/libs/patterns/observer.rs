use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::trace;

/// Identifies one registration in an [`ObserverList`]. Ids are never reused within a list, so a
/// stale id can never unregister somebody else's observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub trait Registry<O: ?Sized> {
    fn register(&self, observer: Arc<O>) -> SubscriptionId;
    fn unregister(&self, id: SubscriptionId) -> bool;
    fn snapshot(&self) -> Vec<Arc<O>>;
}

/// An ordered list of observers. Notification always walks a snapshot taken when it starts, and
/// no lock is held while an observer runs, so observers may register or unregister from inside
/// their own callback.
pub struct ObserverList<O: ?Sized> {
    next_id: AtomicU64,
    observers: RwLock<Vec<(SubscriptionId, Arc<O>)>>,
}

impl<O: ?Sized> ObserverList<O> {
    pub fn new() -> ObserverList<O> {
        ObserverList {
            next_id: AtomicU64::new(0),
            observers: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Calls `notify` once per observer, in registration order.
    pub fn notify_each<F: FnMut(&O)>(&self, mut notify: F) {
        let observers = self.snapshot();
        trace!("notifying {} observer(s)", observers.len());
        for observer in observers.iter() {
            notify(observer);
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<(SubscriptionId, Arc<O>)>> {
        self.observers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<(SubscriptionId, Arc<O>)>> {
        self.observers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<O: ?Sized> Default for ObserverList<O> {
    fn default() -> Self {
        ObserverList::new()
    }
}

impl<O: ?Sized> Registry<O> for ObserverList<O> {
    fn register(&self, observer: Arc<O>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.write().push((id, observer));
        trace!("registered observer {}", id);
        id
    }

    fn unregister(&self, id: SubscriptionId) -> bool {
        let mut observers = self.write();
        match observers.iter().position(|(registered, _)| *registered == id) {
            Some(index) => {
                observers.remove(index);
                trace!("unregistered observer {}", id);
                true
            }
            None => false,
        }
    }

    fn snapshot(&self) -> Vec<Arc<O>> {
        self.read().iter().map(|(_, observer)| observer.clone()).collect()
    }
}

#[cfg(test)]
#[path = "./observer_spec.rs"]
mod observer_spec;
