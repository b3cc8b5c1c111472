use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info};
use serde_derive::{Deserialize, Serialize};

use crate::libs::event::event::EventRecord;
use crate::libs::repository::data_source::{key_for, DataSource, DataSourceChange};

// One line of the events file. The key column comes first so the file reads naturally.
#[derive(Serialize, Deserialize, Debug)]
struct EventRow {
    key: String,
    title: String,
    host: String,
    address: String,
    description: String,
    start: String,
    end: String,
    lat: Option<f64>,
    lng: Option<f64>,
}

impl EventRow {
    fn new(key: &str, record: &EventRecord) -> EventRow {
        EventRow {
            key: key.to_string(),
            title: record.title.clone(),
            host: record.host.clone(),
            address: record.address.clone(),
            description: record.description.clone(),
            start: record.start.clone(),
            end: record.end.clone(),
            lat: record.lat,
            lng: record.lng,
        }
    }

    fn into_parts(self) -> (String, EventRecord) {
        (self.key, EventRecord {
            title: self.title,
            host: self.host,
            address: self.address,
            description: self.description,
            start: self.start,
            end: self.end,
            lat: self.lat,
            lng: self.lng,
        })
    }
}

/// A DataSource backed by a CSV file. Every stored event is reported as added when the file is
/// opened; every write rewrites the whole file.
///
/// The last key handed out is kept beside the events file (`events.csv` has `events.seq`), so a
/// removed event's key is never given to a new one, even after a restart.
pub struct CsvDataSource {
    path: PathBuf,
    sequence_path: PathBuf,
    events: IndexMap<String, EventRecord>,
    pending: VecDeque<DataSourceChange>,
    last_sequence: usize,
}

impl CsvDataSource {
    pub fn open(path: &Path) -> Result<CsvDataSource, String> {
        let mut events = IndexMap::new();
        if path.exists() {
            let mut reader = csv::Reader::from_path(path)
                .map_err(|e| format!("Could not read events file {:?}: {}", path, e))?;
            for row in reader.deserialize::<EventRow>() {
                let row = row.map_err(|e| format!("Could not parse events file {:?}: {}", path, e))?;
                let (key, record) = row.into_parts();
                events.insert(key, record);
            }
            info!("Loaded {} event(s) from {:?}", events.len(), path);
        } else {
            info!("Events file {:?} does not exist yet; starting empty", path);
        }
        let pending = events.iter()
            .map(|(key, record)| DataSourceChange::ChildAdded { key: key.clone(), record: record.clone() })
            .collect();
        let sequence_path = path.with_extension("seq");
        let highest_stored = events.keys().filter_map(|key| sequence_of(key)).max().unwrap_or(0);
        let last_sequence = highest_stored.max(read_sequence(&sequence_path)?);
        debug!("Last key handed out was {}", key_for(last_sequence));
        Ok(CsvDataSource {
            path: path.to_path_buf(),
            sequence_path,
            events,
            pending,
            last_sequence,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), String> {
        let mut writer = csv::Writer::from_path(&self.path)
            .map_err(|e| format!("Could not write events file {:?}: {}", self.path, e))?;
        for (key, record) in self.events.iter() {
            writer.serialize(EventRow::new(key, record))
                .map_err(|e| format!("Could not write event {} to {:?}: {}", key, self.path, e))?;
        }
        writer.flush().map_err(|e| format!("Could not flush events file {:?}: {}", self.path, e))?;
        debug!("Saved {} event(s) to {:?}", self.events.len(), self.path);
        Ok(())
    }
}

fn read_sequence(sequence_path: &Path) -> Result<usize, String> {
    if !sequence_path.exists() {
        return Ok(0);
    }
    let contents = fs::read_to_string(sequence_path)
        .map_err(|e| format!("Could not read key sequence file {:?}: {}", sequence_path, e))?;
    contents.trim().parse::<usize>()
        .map_err(|e| format!("Could not parse key sequence file {:?}: {}", sequence_path, e))
}

fn sequence_of(key: &str) -> Option<usize> {
    key.strip_prefix("event-").and_then(|digits| digits.parse::<usize>().ok())
}

impl DataSource for CsvDataSource {
    fn push_event(&mut self, record: &EventRecord) -> Result<String, String> {
        // The sequence moves on even when the events cannot be saved.
        let sequence = self.last_sequence + 1;
        fs::write(&self.sequence_path, sequence.to_string())
            .map_err(|e| format!("Could not write key sequence file {:?}: {}", self.sequence_path, e))?;
        self.last_sequence = sequence;

        let key = key_for(sequence);
        self.events.insert(key.clone(), record.clone());
        if let Err(e) = self.save() {
            self.events.shift_remove(&key);
            return Err(e);
        }
        self.pending.push_back(DataSourceChange::ChildAdded { key: key.clone(), record: record.clone() });
        Ok(key)
    }

    fn remove_event(&mut self, key: &str) -> Result<(), String> {
        let index = match self.events.get_index_of(key) {
            Some(index) => index,
            None => return Err(format!("No event with key '{}'", key)),
        };
        let removed = self.events.shift_remove(key);
        if let Err(e) = self.save() {
            if let Some(record) = removed {
                let (end, _) = self.events.insert_full(key.to_string(), record);
                self.events.move_index(end, index);
            }
            return Err(e);
        }
        self.pending.push_back(DataSourceChange::ChildRemoved { key: key.to_string() });
        Ok(())
    }

    fn poll_changes(&mut self) -> Vec<DataSourceChange> {
        self.pending.drain(..).collect()
    }
}
