extern crate hamcrest2;

#[cfg(test)]
mod view_spec {
    use std::env;
    use std::sync::Arc;

    use hamcrest2::prelude::*;
    use rstest::*;

    use crate::libs::event::event::Event;
    use crate::libs::observable::observable::Observable;
    use crate::libs::observable::observable_map::ObservableMap;
    use crate::libs::util::test_util::event_record;
    use crate::libs::view::event_list_view::EventListView;
    use crate::libs::view::status_view::{Alert, AlertKind, StatusView};

    #[ctor::ctor]
    fn before_each() {
        env::set_var("RUST_LOG", "debug");
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[ctor::dtor]
    fn after_each() {}

    fn event(key: &str, title: &str) -> Event {
        Event::from_record(key, &event_record(title)).unwrap()
    }

    fn line(title: &str) -> String {
        format!("{} | 10/05/2018 7:00pm - 9:00pm | Coffman Memorial Union", title)
    }

    #[fixture]
    fn events() -> Arc<ObservableMap<String, Event>> {
        Arc::new(ObservableMap::new())
    }

    #[rstest]
    fn event_list_shows_existing_and_new_events(events: Arc<ObservableMap<String, Event>>) {
        events.add("e1".to_string(), event("e1", "Party"));
        let view = EventListView::attach(events.clone());
        assert_that!(view.lines(), equal_to(vec![line("Party")]));

        events.add("e2".to_string(), event("e2", "Study"));
        assert_that!(view.lines(), equal_to(vec![line("Party"), line("Study")]));
    }

    #[rstest]
    fn event_list_updates_in_place_and_drops_removed_events(events: Arc<ObservableMap<String, Event>>) {
        let view = EventListView::attach(events.clone());
        events.add("e1".to_string(), event("e1", "Party"));
        events.add("e2".to_string(), event("e2", "Study"));
        events.add("e1".to_string(), event("e1", "Bigger Party"));
        assert_that!(view.lines(), equal_to(vec![line("Bigger Party"), line("Study")]));

        events.remove(&"e1".to_string());
        assert_that!(view.lines(), equal_to(vec![line("Study")]));
        assert_that!(view.len(), equal_to(1));
    }

    #[rstest]
    fn dropping_the_event_list_unsubscribes(events: Arc<ObservableMap<String, Event>>) {
        let view = EventListView::attach(events.clone());
        drop(view);

        // A fresh view attached afterwards is the only subscriber left to see this.
        events.add("e1".to_string(), event("e1", "Party"));
        let later = EventListView::attach(events.clone());
        assert_that!(later.lines(), equal_to(vec![line("Party")]));
        assert_that!(events.subscriber_count(), equal_to(1));
    }

    #[test]
    fn messages_are_split_into_title_and_body() {
        assert_that!(Alert::parse(AlertKind::Error, "Invalid address!: Not found: try again"),
                     equal_to(Some(Alert {
                         kind: AlertKind::Error,
                         title: "Invalid address!".to_string(),
                         body: "Not found: try again".to_string(),
                     })));
        assert_that!(Alert::parse(AlertKind::Success, "Done").map(|a| a.body), equal_to(Some("".to_string())));
        assert_that!(Alert::parse(AlertKind::Success, ""), none());
    }

    #[test]
    fn status_view_collects_only_new_messages() {
        let error = Arc::new(Observable::new("Stale: from before".to_string()));
        let success = Arc::new(Observable::new(String::new()));
        let view = StatusView::attach(error.clone(), success.clone());
        assert_that!(view.alerts().is_empty(), equal_to(true));

        error.set("Invalid address!: Not found".to_string());
        success.set("Success: Added event 'Party'".to_string());
        error.set(String::new());

        let alerts = view.alerts();
        assert_that!(alerts.len(), equal_to(2));
        assert_that!(alerts[0].kind, equal_to(AlertKind::Error));
        assert_that!(alerts[0].to_string(), equal_to("Invalid address! Not found".to_string()));
        assert_that!(view.last_alert().map(|a| a.kind), equal_to(Some(AlertKind::Success)));
    }

    #[test]
    fn dropping_the_status_view_unsubscribes() {
        let error = Arc::new(Observable::new(String::new()));
        let success = Arc::new(Observable::new(String::new()));
        let view = StatusView::attach(error.clone(), success.clone());
        assert_that!(error.observer_count(), equal_to(1));
        drop(view);
        assert_that!(error.observer_count(), equal_to(0));
        assert_that!(success.observer_count(), equal_to(0));
    }
}
