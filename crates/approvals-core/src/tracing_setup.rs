use std::fs::OpenOptions;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable naming the log file; logging is off without it so
/// nothing is written over the terminal UI
pub const LOG_FILE_ENV: &str = "APPROVALS_LOG_FILE";
/// Filter directives, e.g. `approvals_core=debug`
pub const LOG_FILTER_ENV: &str = "APPROVALS_LOG";

pub fn init_tracing() {
    let Ok(log_path) = std::env::var(LOG_FILE_ENV) else {
        return;
    };

    let file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", log_path, e);
            return;
        }
    };

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_filter(filter);

    if tracing_subscriber::registry().with(file_layer).try_init().is_ok() {
        eprintln!("File logging enabled: {}", log_path);
    }
}
