pub mod config_dir;
