use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use crate::libs::event::event::{Event, EventRecord};
use crate::libs::observable::observable::Observable;
use crate::libs::observable::observable_map::ObservableMap;
use crate::libs::repository::repository::Repository;

/// Sits between the views and the Repository. Problems with a submission are not returned to
/// the caller: they are published on `add_event_error`, and successes on `success`, as
/// "Title: body" messages for whichever views are listening.
pub struct ViewModel {
    repository: Mutex<Repository>,
    events: Arc<ObservableMap<String, Event>>,
    add_event_error: Arc<Observable<String>>,
    success: Arc<Observable<String>>,
}

impl ViewModel {
    pub fn new(repository: Repository) -> ViewModel {
        let events = repository.events();
        info!("ViewModel initialised");
        ViewModel {
            repository: Mutex::new(repository),
            events,
            add_event_error: Arc::new(Observable::new(String::new())),
            success: Arc::new(Observable::new(String::new())),
        }
    }

    /// The Repository's events, passed straight through.
    pub fn events(&self) -> Arc<ObservableMap<String, Event>> {
        self.events.clone()
    }

    pub fn add_event_error(&self) -> Arc<Observable<String>> {
        self.add_event_error.clone()
    }

    pub fn success(&self) -> Arc<Observable<String>> {
        self.success.clone()
    }

    /// Checks and submits a new event. Returns whether the data source accepted it.
    pub fn add_event(&self, record: &EventRecord) -> bool {
        if let Err(e) = record.validate() {
            debug!("Rejecting event '{}': {}", record.title, e);
            publish(&self.add_event_error, e);
            return false;
        }
        let result = self.repository().add_event(record);
        match result {
            Ok(key) => {
                info!("Added event '{}' as {}", record.title, key);
                publish(&self.success, format!("Success: Added event '{}'", record.title.trim()));
                true
            }
            Err(e) => {
                warn!("Could not add event '{}': {}", record.title, e);
                publish(&self.add_event_error, format!("Could not add event!: {}", e));
                false
            }
        }
    }

    pub fn remove_event(&self, key: &str) -> bool {
        let title = self.events.get(&key.to_string()).map(|event| event.title.clone());
        let result = self.repository().remove_event(key);
        match result {
            Ok(()) => {
                let title = title.unwrap_or_else(|| key.to_string());
                info!("Removed event '{}'", title);
                publish(&self.success, format!("Success: Removed event '{}'", title));
                true
            }
            Err(e) => {
                warn!("Could not remove event {}: {}", key, e);
                publish(&self.add_event_error, format!("Could not remove event!: {}", e));
                false
            }
        }
    }

    /// Pulls any pending changes from the data source into `events`. The repository is not
    /// locked while observers run, so they may call back into the ViewModel.
    pub fn refresh(&self) -> usize {
        let pending = self.repository().take_changes();
        pending.apply()
    }

    /// Resets both messages to empty.
    pub fn clear_messages(&self) {
        self.add_event_error.set(String::new());
        self.success.set(String::new());
    }

    fn repository(&self) -> MutexGuard<'_, Repository> {
        self.repository.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// A message equal to the one already held is cleared first, so that it is published again.
fn publish(message: &Observable<String>, text: String) {
    if message.get() == text {
        message.set(String::new());
    }
    message.set(text);
}

#[cfg(test)]
#[path = "./view_model_spec.rs"]
mod view_model_spec;
