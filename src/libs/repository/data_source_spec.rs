extern crate hamcrest2;

#[cfg(test)]
mod data_source_spec {
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    use hamcrest2::prelude::*;
    use temp_testdir::TempDir;

    use crate::libs::repository::csv_data_source::CsvDataSource;
    use crate::libs::repository::data_source::{DataSource, DataSourceChange, InMemoryDataSource};
    use crate::libs::util::test_util::event_record;

    #[ctor::ctor]
    fn before_each() {
        env::set_var("RUST_LOG", "debug");
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[ctor::dtor]
    fn after_each() {}

    fn added(key: &str, title: &str) -> DataSourceChange {
        DataSourceChange::ChildAdded { key: key.to_string(), record: event_record(title) }
    }

    fn removed(key: &str) -> DataSourceChange {
        DataSourceChange::ChildRemoved { key: key.to_string() }
    }

    fn events_file(temp_dir: &TempDir) -> PathBuf {
        let mut path = temp_dir.to_path_buf();
        path.push("events.csv");
        path
    }

    #[test]
    fn in_memory_writes_come_back_as_changes() {
        let mut source = InMemoryDataSource::new();
        assert_that!(source.push_event(&event_record("Party")), equal_to(Ok("event-000001".to_string())));
        assert_that!(source.push_event(&event_record("Study")), equal_to(Ok("event-000002".to_string())));
        assert_that!(source.remove_event("event-000001"), equal_to(Ok(())));

        assert_that!(source.poll_changes(),
                     equal_to(vec![added("event-000001", "Party"), added("event-000002", "Study"), removed("event-000001")]));
        assert_that!(source.poll_changes().is_empty(), equal_to(true));
        assert_that!(source.len(), equal_to(1));
    }

    #[test]
    fn in_memory_removal_of_unknown_key_fails() {
        let mut source = InMemoryDataSource::new();
        assert_that!(&source.remove_event("event-000042"), err());
        assert_that!(source.poll_changes().is_empty(), equal_to(true));
    }

    #[test]
    fn csv_starts_empty_when_file_is_missing() {
        let temp_dir = TempDir::default();
        let path = events_file(&temp_dir);
        let mut source = CsvDataSource::open(&path).unwrap();
        assert_that!(source.poll_changes().is_empty(), equal_to(true));
        assert_that!(source.path(), equal_to(path.as_path()));
    }

    #[test]
    fn csv_events_are_persisted_and_reported_on_reopen() {
        let temp_dir = TempDir::default();
        let path = events_file(&temp_dir);
        {
            let mut source = CsvDataSource::open(&path).unwrap();
            source.push_event(&event_record("Party")).unwrap();
            source.push_event(&event_record("Study")).unwrap();
            source.push_event(&event_record("Karaoke")).unwrap();
            source.remove_event("event-000002").unwrap();
        }
        assert_that!(path.as_path(), file_exists());
        let contents = fs::read_to_string(&path).unwrap();
        assert_that!(contents.as_str(), matches_regex("^key,title,host,address,description,start,end,lat,lng"));

        let mut reopened = CsvDataSource::open(&path).unwrap();
        assert_that!(reopened.poll_changes(),
                     equal_to(vec![added("event-000001", "Party"), added("event-000003", "Karaoke")]));

        // Keys carry on from the last one handed out.
        assert_that!(reopened.push_event(&event_record("Quiz")), equal_to(Ok("event-000004".to_string())));
    }

    #[test]
    fn csv_keys_of_removed_events_are_not_reused_after_reopening() {
        let temp_dir = TempDir::default();
        let path = events_file(&temp_dir);
        {
            let mut source = CsvDataSource::open(&path).unwrap();
            source.push_event(&event_record("Party")).unwrap();
            source.push_event(&event_record("Study")).unwrap();
            source.push_event(&event_record("Karaoke")).unwrap();
            source.remove_event("event-000003").unwrap();
        }

        let mut reopened = CsvDataSource::open(&path).unwrap();
        assert_that!(reopened.poll_changes(),
                     equal_to(vec![added("event-000001", "Party"), added("event-000002", "Study")]));
        assert_that!(reopened.push_event(&event_record("Quiz")), equal_to(Ok("event-000004".to_string())));
    }

    #[test]
    fn csv_failed_writes_are_rolled_back() {
        let temp_dir = TempDir::default();
        let path = events_file(&temp_dir);
        let mut source = CsvDataSource::open(&path).unwrap();
        source.push_event(&event_record("Party")).unwrap();
        source.push_event(&event_record("Study")).unwrap();
        source.push_event(&event_record("Karaoke")).unwrap();
        source.poll_changes();

        // A directory where the events file should be makes every save fail.
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        assert_that!(&source.push_event(&event_record("Quiz")), err());
        assert_that!(&source.remove_event("event-000002"), err());
        assert_that!(source.poll_changes().is_empty(), equal_to(true));

        fs::remove_dir(&path).unwrap();
        source.remove_event("event-000001").unwrap();
        // The failed push used up its key.
        assert_that!(source.push_event(&event_record("Quiz")), equal_to(Ok("event-000005".to_string())));

        let mut reopened = CsvDataSource::open(&path).unwrap();
        assert_that!(reopened.poll_changes(),
                     equal_to(vec![added("event-000002", "Study"), added("event-000003", "Karaoke"),
                                   added("event-000005", "Quiz")]));
    }

    #[test]
    fn csv_rows_without_a_position_are_still_loaded() {
        let temp_dir = TempDir::default();
        let path = events_file(&temp_dir);
        fs::write(&path, "key,title,host,address,description,start,end,lat,lng\n\
                          imported-1,Mystery,,,,10/05/2018 7:00 PM,10/05/2018 9:00 PM,,\n").unwrap();

        let mut source = CsvDataSource::open(&path).unwrap();
        let changes = source.poll_changes();
        assert_that!(changes.len(), equal_to(1));
        match &changes[0] {
            DataSourceChange::ChildAdded { key, record } => {
                assert_that!(key.as_str(), equal_to("imported-1"));
                assert_that!(record.lat, none());
            }
            other => panic!("Unexpected change {:?}", other),
        }
    }

    #[test]
    fn csv_open_fails_on_garbage() {
        let temp_dir = TempDir::default();
        let path = events_file(&temp_dir);
        fs::write(&path, "key,title,host,address,description,start,end,lat,lng\n\
                          e1,Party,,,,s,e,not-a-number,1.0\n").unwrap();
        assert_that!(CsvDataSource::open(&path).is_err(), equal_to(true));
    }
}
