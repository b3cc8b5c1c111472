use log::debug;
use std::path::{Path, PathBuf};

use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Config {
    data: Data,
    logging: Logging,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Data {
    events_file: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Logging {
    level: String,
}

const CONFIG_FILE_NAME: &str = "campusmap.toml";
const DEFAULT_EVENTS_FILE_NAME: &str = "events.csv";
const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// The configuration file, held in memory. Every change is written straight back to disk.
pub struct ConfigurationStore {
    config_file_path: Box<Path>,
    config: Config,
}

impl ConfigurationStore {
    pub fn new(config_path: Box<Path>) -> Result<ConfigurationStore, String> {
        let mut config_file_path = PathBuf::new();
        config_file_path.push(&config_path);
        config_file_path.push(CONFIG_FILE_NAME);
        debug!("Config file is {:?}", config_file_path);
        let config = if !config_file_path.exists() {
            debug!("Creating default config file {:?}", config_file_path);
            let mut events_file = PathBuf::new();
            events_file.push(&config_path);
            events_file.push(DEFAULT_EVENTS_FILE_NAME);
            let config = Config {
                data: Data {
                    events_file: events_file.to_string_lossy().to_string(),
                },
                logging: Logging {
                    level: "info".to_string(),
                },
            };
            save_configuration(&config_file_path, &config)?;
            config
        } else {
            read_configuration(&config_file_path)?
        };
        Ok(ConfigurationStore {
            config_file_path: config_file_path.into_boxed_path(),
            config,
        })
    }

    pub fn get_config_file_path(&self) -> Box<Path> {
        self.config_file_path.clone()
    }

    pub fn get_events_file(&self) -> PathBuf {
        PathBuf::from(&self.config.data.events_file)
    }

    pub fn set_events_file(&mut self, events_file: String) -> Result<(), String> {
        if events_file.trim().is_empty() {
            return Err("The events file cannot be empty".to_string());
        }
        self.config.data.events_file = events_file;
        self.save()
    }

    pub fn get_log_level(&self) -> String {
        self.config.logging.level.clone()
    }

    pub fn set_log_level(&mut self, level: String) -> Result<(), String> {
        let level = level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(format!("Unknown log level '{}'; use one of {}", level, LOG_LEVELS.join(", ")));
        }
        self.config.logging.level = level;
        self.save()
    }

    fn save(&self) -> Result<(), String> {
        save_configuration(&self.config_file_path, &self.config)
    }
}

fn save_configuration(config_file_path: &Path, config: &Config) -> Result<(), String> {
    let toml = toml::to_string(config)
        .map_err(|err| format!("Could not serialise configuration: {}", err))?;
    std::fs::write(config_file_path, toml)
        .map_err(|err| format!("Could not write config file {:?}: {}", config_file_path, err))?;
    debug!("Saved configuration to {:?}", config_file_path);
    Ok(())
}

fn read_configuration(config_file_path: &Path) -> Result<Config, String> {
    let file_contents = std::fs::read_to_string(config_file_path);
    match file_contents {
        Ok(toml) => {
            let x: Result<Config, toml::de::Error> = toml::from_str(&*toml);
            match x {
                Ok(config) => {
                    Ok(config)
                }
                Err(err) => {
                    Err(format!("Could not parse config file {:?}: {}", config_file_path, err))
                }
            }
        }
        Err(e) => { Err(format!("Could not read config file {:?}: {}", config_file_path, e))}
    }
}

#[cfg(test)]
#[path = "./config_file_spec.rs"]
mod config_file_spec;
