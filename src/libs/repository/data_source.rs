use std::collections::VecDeque;

use indexmap::IndexMap;
use log::debug;
#[cfg(test)]
use mockall::automock;

use crate::libs::event::event::EventRecord;

/// A change reported by a data source, in the order it happened.
#[derive(Clone, Debug, PartialEq)]
pub enum DataSourceChange {
    ChildAdded { key: String, record: EventRecord },
    ChildRemoved { key: String },
}

// This trait is an abstraction over the event store, so that it can be mocked. Writes are not
// applied to any observable directly: they come back as changes from poll_changes, the way a
// realtime database reports its own writes.
#[cfg_attr(test, automock)]
pub trait DataSource: Send {
    /// Stores a new event, returning the key the store assigned to it.
    fn push_event(&mut self, record: &EventRecord) -> Result<String, String>;
    fn remove_event(&mut self, key: &str) -> Result<(), String>;
    /// Drains the changes that have happened since the last call.
    fn poll_changes(&mut self) -> Vec<DataSourceChange>;
}

pub(crate) fn key_for(sequence: usize) -> String {
    format!("event-{:06}", sequence)
}

/// A DataSource that lives only as long as the process.
pub struct InMemoryDataSource {
    events: IndexMap<String, EventRecord>,
    pending: VecDeque<DataSourceChange>,
    last_sequence: usize,
}

impl InMemoryDataSource {
    pub fn new() -> InMemoryDataSource {
        InMemoryDataSource {
            events: IndexMap::new(),
            pending: VecDeque::new(),
            last_sequence: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for InMemoryDataSource {
    fn default() -> Self {
        InMemoryDataSource::new()
    }
}

impl DataSource for InMemoryDataSource {
    fn push_event(&mut self, record: &EventRecord) -> Result<String, String> {
        self.last_sequence += 1;
        let key = key_for(self.last_sequence);
        debug!("Storing event {} as {}", record.title, key);
        self.events.insert(key.clone(), record.clone());
        self.pending.push_back(DataSourceChange::ChildAdded { key: key.clone(), record: record.clone() });
        Ok(key)
    }

    fn remove_event(&mut self, key: &str) -> Result<(), String> {
        match self.events.shift_remove(key) {
            Some(_) => {
                debug!("Removed event {}", key);
                self.pending.push_back(DataSourceChange::ChildRemoved { key: key.to_string() });
                Ok(())
            }
            None => Err(format!("No event with key '{}'", key)),
        }
    }

    fn poll_changes(&mut self) -> Vec<DataSourceChange> {
        self.pending.drain(..).collect()
    }
}
