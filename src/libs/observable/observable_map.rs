use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use indexmap::IndexMap;
use log::debug;

use crate::libs::patterns::observer::{ObserverList, Registry, SubscriptionId};

/// Receives every insertion or update made with [`ObservableMap::add`].
pub trait MapObserver<K, T>: Send + Sync {
    fn on_add(&self, key: &K, item: &T);
}

/// Receives every entry deleted with [`ObservableMap::remove`].
pub trait MapRemoveObserver<K, T>: Send + Sync {
    fn on_remove(&self, key: &K, item: &T);
}

impl<K, T, F> MapObserver<K, T> for F where F: Fn(&K, &T) + Send + Sync {
    fn on_add(&self, key: &K, item: &T) {
        self(key, item)
    }
}

impl<K, T, F> MapRemoveObserver<K, T> for F where F: Fn(&K, &T) + Send + Sync {
    fn on_remove(&self, key: &K, item: &T) {
        self(key, item)
    }
}

// One registration: both channels come and go together.
struct MapSubscriber<K, T> {
    on_add: Box<dyn MapObserver<K, T>>,
    on_remove: Option<Box<dyn MapRemoveObserver<K, T>>>,
}

/// A key/value map, iterated in insertion order, that notifies its observers of every add and
/// every remove.
///
/// `add` doubles as update and always notifies, even when the stored value is unchanged.
pub struct ObservableMap<K, T> {
    value: RwLock<IndexMap<K, T>>,
    subscribers: ObserverList<MapSubscriber<K, T>>,
}

impl<K, T> ObservableMap<K, T>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            value: RwLock::new(IndexMap::new()),
            subscribers: ObserverList::new(),
        }
    }

    /// Subscribes to additions only, replaying every current entry.
    pub fn subscribe<O: MapObserver<K, T> + 'static>(&self, observer: O) -> SubscriptionId {
        self.register(Box::new(observer), None, true)
    }

    /// Subscribes to additions and removals, replaying every current entry to `observer`.
    pub fn subscribe_with_removal<O, R>(&self, observer: O, on_remove: R) -> SubscriptionId
    where
        O: MapObserver<K, T> + 'static,
        R: MapRemoveObserver<K, T> + 'static,
    {
        self.register(Box::new(observer), Some(Box::new(on_remove)), true)
    }

    /// Subscribes with an optional remove callback, replaying current entries only if asked.
    pub fn subscribe_with<O>(&self, observer: O, on_remove: Option<Box<dyn MapRemoveObserver<K, T>>>,
                             notify_on_subscribe: bool) -> SubscriptionId
    where
        O: MapObserver<K, T> + 'static,
    {
        self.register(Box::new(observer), on_remove, notify_on_subscribe)
    }

    /// Removes both the add and the remove callback of a registration.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.unregister(id);
    }

    /// Inserts or overwrites the entry at `key`, then notifies every add observer.
    pub fn add(&self, key: K, new_value: T) {
        {
            let mut value = self.value.write().unwrap_or_else(PoisonError::into_inner);
            value.insert(key.clone(), new_value.clone());
        }
        debug!("added entry; notifying {} subscriber(s)", self.subscribers.len());
        self.subscribers.notify_each(|subscriber| subscriber.on_add.on_add(&key, &new_value));
    }

    /// Deletes the entry at `key` and notifies every remove observer with the value that was
    /// removed. Absent keys are ignored.
    pub fn remove(&self, key: &K) -> Option<T> {
        let removed = {
            let mut value = self.value.write().unwrap_or_else(PoisonError::into_inner);
            value.shift_remove(key)
        };
        if let Some(item) = removed.as_ref() {
            debug!("removed entry; notifying {} subscriber(s)", self.subscribers.len());
            self.subscribers.notify_each(|subscriber| {
                if let Some(on_remove) = subscriber.on_remove.as_ref() {
                    on_remove.on_remove(key, item);
                }
            });
        }
        removed
    }

    pub fn get(&self, key: &K) -> Option<T> {
        self.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn keys(&self) -> Vec<K> {
        self.read().keys().cloned().collect()
    }

    pub fn entries(&self) -> Vec<(K, T)> {
        self.read().iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn register(&self, on_add: Box<dyn MapObserver<K, T>>, on_remove: Option<Box<dyn MapRemoveObserver<K, T>>>,
                notify_on_subscribe: bool) -> SubscriptionId {
        let subscriber = Arc::new(MapSubscriber { on_add, on_remove });
        let id = self.subscribers.register(subscriber.clone());
        if notify_on_subscribe {
            for (key, item) in self.entries().iter() {
                subscriber.on_add.on_add(key, item);
            }
        }
        id
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexMap<K, T>> {
        self.value.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, T> Default for ObservableMap<K, T>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        ObservableMap::new()
    }
}

#[cfg(test)]
#[path = "./observable_map_spec.rs"]
mod observable_map_spec;
