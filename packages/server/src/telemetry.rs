use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogConfig;

/// Install the global subscriber: fmt output on stdout, plus a plain-text
/// `app.log` under `log.dir` unless that is blank. `RUST_LOG` takes
/// precedence over the configured stdout level.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_tracing(config: &LogConfig) -> Result<Option<WorkerGuard>, InitError> {
    let stdout_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));
    let stdout = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(stdout_filter);

    let (file, guard) = match file_appender(config)? {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            // Our own events at debug, dependencies at the configured level.
            let filter = EnvFilter::new(format!("{},blog_server=debug", config.level));
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry().with(stdout).with(file).init();
    Ok(guard)
}

fn file_appender(config: &LogConfig) -> Result<Option<RollingFileAppender>, InitError> {
    let dir = config.dir.trim();
    if dir.is_empty() {
        return Ok(None);
    }

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("app")
        .filename_suffix("log")
        .build(dir)
        .map(Some)
}
