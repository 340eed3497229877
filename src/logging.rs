use std::env;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FILE_NAME: &str = "farm-lens.log";

/// Logs to stderr and to `farm-lens.log` in `log_dir`. The level comes from
/// `FARMLENS_LOG`, default `info`. Keep the guard alive until exit.
pub fn init_logger(log_dir: &Path) -> Option<WorkerGuard> {
    let filter = env::var("FARMLENS_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_layer = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    if std::fs::create_dir_all(log_dir).is_err() {
        tracing_subscriber::registry()
            .with(stderr_layer)
            .with(filter_layer)
            .init();
        return None;
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(filter_layer)
        .init();

    Some(guard)
}
