use std::sync::Arc;

use log::{debug, info};

use crate::libs::event::event::EventRecord;
use crate::libs::repository::data_source::DataSource;
use crate::libs::repository::repository::Repository;
use crate::libs::view::event_list_view::EventListView;
use crate::libs::view::status_view::{Alert, StatusView};
use crate::libs::viewmodel::view_model::ViewModel;

// The Application handles the wiring between the layers of the system: the data source feeds
// the Repository, which the ViewModel owns, which the views observe. Each layer is handed the
// one below it; nothing is reached through a global.
pub struct Application {
    view_model: Arc<ViewModel>,
    event_list_view: EventListView,
    status_view: StatusView,
}

impl Application {
    pub fn new(data_source: Box<dyn DataSource>) -> Application {
        info!("Initialising Application...");
        let repository = Repository::new(data_source);
        let view_model = Arc::new(ViewModel::new(repository));
        let event_list_view = EventListView::attach(view_model.events());
        let status_view = StatusView::attach(view_model.add_event_error(), view_model.success());
        debug!("Application wired");
        Application {
            view_model,
            event_list_view,
            status_view,
        }
    }

    pub fn view_model(&self) -> Arc<ViewModel> {
        self.view_model.clone()
    }

    /// Brings the event list up to date with the data source.
    pub fn refresh(&self) -> usize {
        let applied = self.view_model.refresh();
        debug!("Refresh applied {} change(s)", applied);
        applied
    }

    pub fn add_event(&self, record: &EventRecord) -> bool {
        let added = self.view_model.add_event(record);
        self.refresh();
        added
    }

    pub fn remove_event(&self, key: &str) -> bool {
        let removed = self.view_model.remove_event(key);
        self.refresh();
        removed
    }

    pub fn event_lines(&self) -> Vec<String> {
        self.event_list_view.lines()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.status_view.alerts()
    }

    pub fn last_alert(&self) -> Option<Alert> {
        self.status_view.last_alert()
    }
}

#[cfg(test)]
#[path = "./application_spec.rs"]
mod application_spec;
