pub mod csv_data_source;
pub mod data_source;
pub mod repository;

#[cfg(test)]
#[path = "./data_source_spec.rs"]
mod data_source_spec;
