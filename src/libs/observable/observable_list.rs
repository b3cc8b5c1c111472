use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use log::debug;

use crate::libs::patterns::observer::{ObserverList, Registry, SubscriptionId};

/// Receives each element appended to an [`ObservableList`], with the index it was stored at.
pub trait ListObserver<T>: Send + Sync {
    fn on_push(&self, index: usize, item: &T);
}

impl<T, F> ListObserver<T> for F where F: Fn(usize, &T) + Send + Sync {
    fn on_push(&self, index: usize, item: &T) {
        self(index, item)
    }
}

/// An append-only list that notifies its observers of every push.
pub struct ObservableList<T> {
    value: RwLock<Vec<T>>,
    observers: ObserverList<dyn ListObserver<T>>,
}

impl<T: Clone + Send + Sync + 'static> ObservableList<T> {
    pub fn new() -> Self {
        Self {
            value: RwLock::new(Vec::new()),
            observers: ObserverList::new(),
        }
    }

    /// Subscribes and immediately replays every existing element, in index order.
    pub fn subscribe<O: ListObserver<T> + 'static>(&self, observer: O) -> SubscriptionId {
        self.subscribe_with(observer, true)
    }

    pub fn subscribe_with<O: ListObserver<T> + 'static>(&self, observer: O, notify_on_subscribe: bool) -> SubscriptionId {
        let observer: Arc<dyn ListObserver<T>> = Arc::new(observer);
        let id = self.observers.register(observer.clone());
        if notify_on_subscribe {
            for (index, item) in self.values().iter().enumerate() {
                observer.on_push(index, item);
            }
        }
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.observers.unregister(id);
    }

    /// Appends `new_value` and notifies every observer with its index. Returns that index.
    pub fn push(&self, new_value: T) -> usize {
        let index = {
            let mut value = self.value.write().unwrap_or_else(PoisonError::into_inner);
            value.push(new_value.clone());
            value.len() - 1
        };
        debug!("pushed item {}; notifying {} observer(s)", index, self.observers.len());
        self.observers.notify_each(|observer| observer.on_push(index, &new_value));
        index
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.read().get(index).cloned()
    }

    pub fn values(&self) -> Vec<T> {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.value.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone + Send + Sync + 'static> Default for ObservableList<T> {
    fn default() -> Self {
        ObservableList::new()
    }
}

#[cfg(test)]
#[path = "./observable_list_spec.rs"]
mod observable_list_spec;
