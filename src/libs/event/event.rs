use lazy_static::lazy_static;
use regex::Regex;
use serde_derive::{Deserialize, Serialize};

lazy_static! {
    // e.g. "10/05/2018 7:00 PM", as produced by the date/time pickers.
    static ref DATE_TIME: Regex = Regex::new(r"^(\S+) (\d{1,2}:\d{2}) ([AaPp][Mm])$").unwrap();
}

pub const INVALID_ADDRESS: &str = "Invalid address!: That address could not be found. Try clicking on one of the suggested addresses while typing.";
pub const MISSING_TITLE: &str = "Missing title!: Every event needs a title.";

/// An event as submitted by a user or as stored by a data source. Nothing about it has been
/// checked yet.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub title: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
    pub start: String,
    pub end: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl EventRecord {
    pub fn validate(&self) -> Result<(), String> {
        self.checked().map(|_| ())
    }

    // Returns the position and display time range.
    fn checked(&self) -> Result<(f64, f64, String), String> {
        if self.title.trim().is_empty() {
            return Err(MISSING_TITLE.to_string());
        }
        let (lat, lng) = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => (lat, lng),
            _ => return Err(INVALID_ADDRESS.to_string()),
        };
        let time = pretty_time_range(&self.start, &self.end)?;
        Ok((lat, lng, time))
    }
}

/// A validated event, keyed by its data source. Fields cannot be changed once built.
#[readonly::make]
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub key: String,
    pub title: String,
    pub host: String,
    pub address: String,
    pub description: String,
    pub start: String,
    pub end: String,
    pub time: String,
    pub lat: f64,
    pub lng: f64,
}

impl Event {
    pub fn from_record(key: &str, record: &EventRecord) -> Result<Event, String> {
        if key.is_empty() {
            return Err("Invalid key!: An event must have a key.".to_string());
        }
        let (lat, lng, time) = record.checked()?;
        Ok(Event {
            key: key.to_string(),
            title: record.title.trim().to_string(),
            host: record.host.clone(),
            address: record.address.clone(),
            description: record.description.clone(),
            start: record.start.clone(),
            end: record.end.clone(),
            time,
            lat,
            lng,
        })
    }

    pub fn to_record(&self) -> EventRecord {
        EventRecord {
            title: self.title.clone(),
            host: self.host.clone(),
            address: self.address.clone(),
            description: self.description.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
            lat: Some(self.lat),
            lng: Some(self.lng),
        }
    }
}

/// Formats a start/end pair as a short, lower-cased range. The end date is only repeated when it
/// differs from the start date.
pub fn pretty_time_range(start: &str, end: &str) -> Result<String, String> {
    let (start_date, start_time, start_ampm) = split_date_time(start)?;
    let (end_date, end_time, end_ampm) = split_date_time(end)?;

    let range = if start_date == end_date {
        format!("{} {}{} - {}{}", start_date, start_time, start_ampm, end_time, end_ampm)
    } else {
        format!("{} {}{} - {} {}{}", start_date, start_time, start_ampm, end_date, end_time, end_ampm)
    };
    Ok(range.to_lowercase())
}

fn split_date_time(date_time: &str) -> Result<(&str, &str, &str), String> {
    match DATE_TIME.captures(date_time.trim()) {
        Some(captures) => {
            match (captures.get(1), captures.get(2), captures.get(3)) {
                (Some(date), Some(time), Some(ampm)) => Ok((date.as_str(), time.as_str(), ampm.as_str())),
                _ => Err(bad_date_time(date_time)),
            }
        }
        None => Err(bad_date_time(date_time)),
    }
}

fn bad_date_time(date_time: &str) -> String {
    format!("Invalid time!: '{}' should look like '10/05/2018 7:00 PM'.", date_time)
}

#[cfg(test)]
#[path = "./event_spec.rs"]
mod event_spec;
