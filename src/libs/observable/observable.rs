use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

use crate::libs::patterns::observer::{ObserverList, Registry, SubscriptionId};

/// Receives the new value of an [`Observable`] whenever it changes.
pub trait ValueObserver<T>: Send + Sync {
    fn on_change(&self, value: &T);
}

impl<T, F> ValueObserver<T> for F where F: Fn(&T) + Send + Sync {
    fn on_change(&self, value: &T) {
        self(value)
    }
}

/// Holds a single value and notifies its observers when the value changes.
///
/// Setting a value equal to the current one is a no-op: no observer is called.
pub struct Observable<T> {
    value: RwLock<T>,
    observers: ObserverList<dyn ValueObserver<T>>,
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
            observers: ObserverList::new(),
        }
    }

    /// Subscribes and immediately replays the current value to the new observer.
    pub fn subscribe<O: ValueObserver<T> + 'static>(&self, observer: O) -> SubscriptionId {
        self.subscribe_with(observer, true)
    }

    pub fn subscribe_with<O: ValueObserver<T> + 'static>(&self, observer: O, notify_on_subscribe: bool) -> SubscriptionId {
        let observer: Arc<dyn ValueObserver<T>> = Arc::new(observer);
        let id = self.observers.register(observer.clone());
        if notify_on_subscribe {
            let current = self.get();
            observer.on_change(&current);
        }
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.observers.unregister(id);
    }

    /// Stores `new_value` and notifies every observer, in subscription order, if it differs from
    /// the current value. Returns whether the value changed.
    pub fn set(&self, new_value: T) -> bool {
        {
            let mut value = self.value.write().unwrap_or_else(PoisonError::into_inner);
            if *value == new_value {
                return false;
            }
            *value = new_value.clone();
        }
        debug!("value changed; notifying {} observer(s)", self.observers.len());
        self.observers.notify_each(|observer| observer.on_change(&new_value));
        true
    }

    pub fn get(&self) -> T {
        self.value.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl<T: Clone + Default + PartialEq + Send + Sync + 'static> Default for Observable<T> {
    fn default() -> Self {
        Observable::new(T::default())
    }
}

#[cfg(test)]
#[path = "./observable_spec.rs"]
mod observable_spec;
