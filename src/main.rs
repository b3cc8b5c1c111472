#[macro_use]
extern crate clap;

use std::error::Error;

use clap::{App, Arg, ArgMatches};
use clap::arg_enum;
use log::{debug, error, info};
use simple_error::bail;

use campusmap::libs::application::application::Application;
use campusmap::libs::config_dir::config_dir;
use campusmap::libs::config_file::config_file::ConfigurationStore;
use campusmap::libs::event::event::EventRecord;
use campusmap::libs::repository::csv_data_source::CsvDataSource;
use campusmap::libs::util::logging::initialise_logging;
use campusmap::libs::view::status_view::{Alert, AlertKind};

const EVENTS_FILE: &'static str = "events-file";
const LOG_LEVEL: &'static str = "log-level";
const TITLE: &'static str = "title";
const HOST: &'static str = "host";
const ADDRESS: &'static str = "address";
const DESCRIPTION: &'static str = "description";
const START: &'static str = "start";
const END: &'static str = "end";
const LAT: &'static str = "lat";
const LNG: &'static str = "lng";
const KEY: &'static str = "key";

arg_enum! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum Mode {
        List,
        Add,
        Remove,
        ConfigFileLocation
    }
}

fn parse_command_line<'a>() -> (ArgMatches<'a>, Mode) {
    let result = App::new("campusmap")
        .version(crate_version!())
        .author("Matt Gumbley <matt.gumbley@gmail.com>")
        .about("Campus Events Map")

        .arg(Arg::from_usage("<mode> 'The mode to use, usually List.'").possible_values(&Mode::variants()).default_value("List"))

        .arg(Arg::with_name(EVENTS_FILE)
            .short("f")
            .long("events-file")
            .value_name("CSV file")
            .help("Sets the file that events are stored in; remembered in the configuration file")
            .takes_value(true))

        .arg(Arg::with_name(LOG_LEVEL)
            .short("l")
            .long(LOG_LEVEL)
            .value_name("level")
            .help("Sets the logging level (off, error, warn, info, debug, trace); remembered in the configuration file")
            .takes_value(true))

        .arg(Arg::with_name(TITLE).long(TITLE).help("Add: the event's title").value_name("title").takes_value(true))
        .arg(Arg::with_name(HOST).long(HOST).help("Add: who is hosting the event").value_name("host").takes_value(true))
        .arg(Arg::with_name(ADDRESS).long(ADDRESS).help("Add: where the event is").value_name("address").takes_value(true))
        .arg(Arg::with_name(DESCRIPTION).long(DESCRIPTION).help("Add: what the event is about").value_name("description").takes_value(true))
        .arg(Arg::with_name(START).long(START).help("Add: when the event starts, e.g. '10/05/2018 7:00 PM'").value_name("date time").takes_value(true))
        .arg(Arg::with_name(END).long(END).help("Add: when the event ends, e.g. '10/05/2018 9:00 PM'").value_name("date time").takes_value(true))
        .arg(Arg::with_name(LAT).long(LAT).help("Add: latitude of the address").value_name("degrees").takes_value(true).allow_hyphen_values(true))
        .arg(Arg::with_name(LNG).long(LNG).help("Add: longitude of the address").value_name("degrees").takes_value(true).allow_hyphen_values(true))

        .arg(Arg::with_name(KEY)
            .short("k")
            .long(KEY)
            .help("Remove: the key of the event to remove, as shown by List")
            .value_name("key")
            .takes_value(true))

        .get_matches();

    let mode = value_t!(result.value_of("mode"), Mode).unwrap_or(Mode::List);

    return (result, mode);
}

fn run(arguments: ArgMatches, mode: Mode) -> Result<i32, Box<dyn Error>> {
    let home_dir = dirs::home_dir();
    let config_path = config_dir::configuration_directory(home_dir)?;
    let config_path_clone = config_path.clone();
    let mut config = ConfigurationStore::new(config_path)?;
    if let Some(level) = arguments.value_of(LOG_LEVEL) {
        config.set_log_level(level.to_string())?;
    }
    initialise_logging(config.get_log_level().as_str());
    debug!("Command line parsed; mode is {}", mode);

    let config_file_path = config.get_config_file_path();
    if mode == Mode::ConfigFileLocation {
        info!("Configuration path is [{:?}]", config_path_clone);
        info!("Configuration file is [{:?}]", config_file_path);
        return Ok(0)
    }

    if let Some(events_file) = arguments.value_of(EVENTS_FILE) {
        info!("Setting events file to '{}'", events_file);
        config.set_events_file(events_file.to_string())?;
    }
    let events_file = config.get_events_file();
    info!("Events file is {:?}", events_file);
    let data_source = CsvDataSource::open(events_file.as_path())?;

    let application = Application::new(Box::new(data_source));
    application.refresh();

    let succeeded = match mode {
        Mode::Add => {
            let record = event_record_from_arguments(&arguments)?;
            application.add_event(&record)
        }
        Mode::Remove => {
            let key = match arguments.value_of(KEY) {
                Some(key) => key,
                None => bail!("Remove needs the key of the event to remove; use the -k or --key option"),
            };
            application.remove_event(key)
        }
        _ => true,
    };

    for alert in application.alerts() {
        show_alert(&alert);
    }
    if mode == Mode::List {
        let events = application.view_model().events();
        for (key, line) in events.keys().iter().zip(application.event_lines()) {
            println!("{}  {}", key, line);
        }
        info!("{} event(s)", events.len());
    }

    Ok(if succeeded { 0 } else { 1 })
}

fn event_record_from_arguments(arguments: &ArgMatches) -> Result<EventRecord, Box<dyn Error>> {
    let text = |name: &str| arguments.value_of(name).unwrap_or("").to_string();
    Ok(EventRecord {
        title: text(TITLE),
        host: text(HOST),
        address: text(ADDRESS),
        description: text(DESCRIPTION),
        start: text(START),
        end: text(END),
        lat: parse_degrees(arguments, LAT)?,
        lng: parse_degrees(arguments, LNG)?,
    })
}

fn parse_degrees(arguments: &ArgMatches, name: &str) -> Result<Option<f64>, Box<dyn Error>> {
    match arguments.value_of(name) {
        None => Ok(None),
        Some(degrees) => match degrees.parse::<f64>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => bail!("Could not use '{}' as the --{} - not a number", degrees, name),
        }
    }
}

fn show_alert(alert: &Alert) {
    match alert.kind {
        AlertKind::Success => println!("{}", alert),
        AlertKind::Error => eprintln!("{}", alert),
    }
}

fn main() {
    let (arguments, mode) = parse_command_line();

    match run(arguments, mode) {
        Err(err) => {
            initialise_logging("info");
            error!("{}", err);
            std::process::exit(1);
        }
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
    }
}
