use std::sync::{Arc, Mutex, PoisonError};

use indexmap::IndexMap;
use log::debug;

use crate::libs::event::event::Event;
use crate::libs::observable::observable_map::ObservableMap;
use crate::libs::patterns::observer::SubscriptionId;

type Lines = Arc<Mutex<IndexMap<String, String>>>;

/// Keeps one line of text per event, in the order the events first arrived. The view stays
/// subscribed for as long as it lives.
pub struct EventListView {
    events: Arc<ObservableMap<String, Event>>,
    subscription: SubscriptionId,
    lines: Lines,
}

pub fn format_event_line(event: &Event) -> String {
    format!("{} | {} | {}", event.title, event.time, event.address)
}

impl EventListView {
    pub fn attach(events: Arc<ObservableMap<String, Event>>) -> EventListView {
        let lines: Lines = Arc::new(Mutex::new(IndexMap::new()));
        let added_lines = lines.clone();
        let removed_lines = lines.clone();
        let subscription = events.subscribe_with_removal(
            move |key: &String, event: &Event| {
                let mut lines = added_lines.lock().unwrap_or_else(PoisonError::into_inner);
                lines.insert(key.clone(), format_event_line(event));
            },
            move |key: &String, _: &Event| {
                let mut lines = removed_lines.lock().unwrap_or_else(PoisonError::into_inner);
                lines.shift_remove(key);
            });
        debug!("Event list attached as {}", subscription);
        EventListView { events, subscription, lines }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for EventListView {
    fn drop(&mut self) {
        debug!("Event list {} detached", self.subscription);
        self.events.unsubscribe(self.subscription);
    }
}
