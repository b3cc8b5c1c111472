use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::libs::event::event::EventRecord;
use crate::libs::observable::observable::ValueObserver;
use crate::libs::observable::observable_list::ListObserver;
use crate::libs::observable::observable_map::{MapObserver, MapRemoveObserver};

// Thanks to Shepmaster, https://github.com/rust-lang/rfcs/issues/2798
pub fn panic_after<T, F>(d: Duration, f: F) -> T
    where
        T: Send + 'static,
        F: FnOnce() -> T,
        F: Send + 'static,
{
    let (done_tx, done_rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let val = f();
        done_tx.send(()).expect("Unable to send completion signal");
        val
    });

    match done_rx.recv_timeout(d) {
        Ok(_) => handle.join().expect("Thread panicked"),
        Err(_) => panic!("Thread took too long"),
    }
}

/// An observer that records every notification it receives. Clones share the same recording, so
/// one clone can be subscribed while the test keeps another to inspect.
#[derive(Clone)]
pub struct Recorder<E> {
    observations: Arc<Mutex<Vec<E>>>,
}

impl<E: Clone> Recorder<E> {
    pub fn new() -> Recorder<E> {
        Recorder {
            observations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn observations(&self) -> Vec<E> {
        self.observations.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.observations.lock().unwrap().len()
    }

    pub fn record(&self, observation: E) {
        self.observations.lock().unwrap().push(observation);
    }
}

impl<T: Clone + Send> ValueObserver<T> for Recorder<T> {
    fn on_change(&self, value: &T) {
        self.record(value.clone());
    }
}

impl<T: Clone + Send> ListObserver<T> for Recorder<(usize, T)> {
    fn on_push(&self, index: usize, item: &T) {
        self.record((index, item.clone()));
    }
}

impl<K: Clone + Send, T: Clone + Send> MapObserver<K, T> for Recorder<(K, T)> {
    fn on_add(&self, key: &K, item: &T) {
        self.record((key.clone(), item.clone()));
    }
}

impl<K: Clone + Send, T: Clone + Send> MapRemoveObserver<K, T> for Recorder<(K, T)> {
    fn on_remove(&self, key: &K, item: &T) {
        self.record((key.clone(), item.clone()));
    }
}

/// A record that passes validation, happening on the Minneapolis campus on a single evening.
pub fn event_record(title: &str) -> EventRecord {
    EventRecord {
        title: title.to_string(),
        host: "Chess Club".to_string(),
        address: "Coffman Memorial Union".to_string(),
        description: format!("All about {}", title),
        start: "10/05/2018 7:00 PM".to_string(),
        end: "10/05/2018 9:00 PM".to_string(),
        lat: Some(44.972917),
        lng: Some(-93.235164),
    }
}
