pub mod application;
pub mod config_dir;
pub mod config_file;
pub mod event;
pub mod observable;
pub mod patterns;
pub mod repository;
pub mod util;
pub mod view;
pub mod viewmodel;
