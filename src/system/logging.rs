//! Logging initialization.

use tracing_appender::non_blocking::WorkerGuard;

use crate::config::Config;

/// Set up the tracing subscriber from the logging config.
///
/// Returns a guard that must stay alive for the life of the process so
/// buffered log lines are flushed on exit.
///
/// # Panics
/// * If the log file cannot be opened
/// * If a global subscriber is already installed
pub fn init_logging(config: &Config) -> WorkerGuard {
    let writer: Box<dyn std::io::Write + Send + Sync> = match config.logging.file {
        Some(ref log_file) if !log_file.is_empty() => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .expect("Failed to open log file");
            Box::new(file)
        }
        _ => Box::new(std::io::stdout()),
    };

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::new(config.logging.level.clone());

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(config.logging.file.as_ref().is_none_or(|f| f.is_empty()));

    if config.logging.format == "json" {
        subscriber_builder.json().init();
    } else {
        subscriber_builder.init();
    }

    guard
}
