use std::env;

/// Starts env_logger. An explicit RUST_LOG wins over the configured `default_level`.
pub fn initialise_logging(default_level: &str) {
    let log_var_name = "RUST_LOG";
    if env::var(log_var_name).is_err() {
        env::set_var(log_var_name, default_level)
    }
    let _ = env_logger::try_init();
}
