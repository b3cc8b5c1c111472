use std::sync::Arc;

use log::{debug, info, warn};

use crate::libs::event::event::{Event, EventRecord};
use crate::libs::observable::observable_map::ObservableMap;
use crate::libs::repository::data_source::{DataSource, DataSourceChange};

/// The Repository is the only part of the system that talks to the data source. It keeps the
/// validated events in an ObservableMap, which everyone else observes but only it mutates.
pub struct Repository {
    data_source: Box<dyn DataSource>,
    events: Arc<ObservableMap<String, Event>>,
}

impl Repository {
    pub fn new(data_source: Box<dyn DataSource>) -> Repository {
        info!("Repository initialised");
        Repository {
            data_source,
            events: Arc::new(ObservableMap::new()),
        }
    }

    pub fn events(&self) -> Arc<ObservableMap<String, Event>> {
        self.events.clone()
    }

    /// Stores the event. It appears in `events` at the next `sync`.
    pub fn add_event(&mut self, record: &EventRecord) -> Result<String, String> {
        let key = self.data_source.push_event(record)?;
        debug!("Data source accepted '{}' as {}", record.title, key);
        Ok(key)
    }

    /// Deletes the event. It leaves `events` at the next `sync`.
    pub fn remove_event(&mut self, key: &str) -> Result<(), String> {
        self.data_source.remove_event(key)
    }

    /// Drains the pending data source changes, to be applied to `events` later. Lets a caller
    /// that shares the Repository behind a lock release it before any observer runs.
    pub fn take_changes(&mut self) -> PendingChanges {
        PendingChanges {
            events: self.events.clone(),
            changes: self.data_source.poll_changes(),
        }
    }

    /// Applies every pending data source change to `events`, returning how many were applied.
    pub fn sync(&mut self) -> usize {
        self.take_changes().apply()
    }
}

/// Changes drained from the data source by [`Repository::take_changes`], not yet applied.
#[must_use]
pub struct PendingChanges {
    events: Arc<ObservableMap<String, Event>>,
    changes: Vec<DataSourceChange>,
}

impl PendingChanges {
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Applies the changes to the Repository's events, notifying their observers. Returns how
    /// many reached the map.
    pub fn apply(self) -> usize {
        apply_changes(&self.events, self.changes)
    }
}

// Added records that fail validation are logged and skipped; removals of unknown keys are
// ignored.
fn apply_changes(events: &ObservableMap<String, Event>, changes: Vec<DataSourceChange>) -> usize {
    let mut applied = 0;
    for change in changes {
        match change {
            DataSourceChange::ChildAdded { key, record } => {
                match Event::from_record(&key, &record) {
                    Ok(event) => {
                        debug!("Event {} added: {}", key, event.title);
                        events.add(key, event);
                        applied += 1;
                    }
                    Err(e) => {
                        warn!("Skipping event {}: {}", key, e);
                    }
                }
            }
            DataSourceChange::ChildRemoved { key } => {
                match events.remove(&key) {
                    Some(_) => {
                        debug!("Event {} removed", key);
                        applied += 1;
                    }
                    None => {
                        debug!("Ignoring removal of unknown event {}", key);
                    }
                }
            }
        }
    }
    applied
}

#[cfg(test)]
#[path = "./repository_spec.rs"]
mod repository_spec;
