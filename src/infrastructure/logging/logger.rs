use super::config::{LogConfig, LogFormat};
use anyhow::{Context, Result};
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Layer, Registry};

use crate::domain::models::LogLevel;

const LOG_FILE_NAME: &str = "inkystock.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;
type FilterHandle = reload::Handle<EnvFilter, Layered<Vec<BoxedLayer>, Registry>>;

/// Logger implementation using tracing
pub struct LoggerImpl {
    filter: FilterHandle,
    _guard: Option<WorkerGuard>,
}

impl LoggerImpl {
    /// Initialize the global logger with the given configuration
    ///
    /// `RUST_LOG` directives still apply on top of the configured level.
    /// Keep the returned value alive so buffered file output gets flushed.
    ///
    /// # Errors
    /// Returns an error if a global subscriber is already installed
    pub fn init(config: &LogConfig) -> Result<Self> {
        let stderr_layer: BoxedLayer = match config.format {
            LogFormat::Json => fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_target(true)
                .with_current_span(true)
                .boxed(),
            LogFormat::Pretty => fmt::layer()
                .pretty()
                .with_writer(io::stderr)
                .with_target(true)
                .boxed(),
        };
        let mut layers = vec![stderr_layer];

        let guard = if let Some(ref log_dir) = config.log_dir {
            let file_appender = rolling::daily(log_dir, LOG_FILE_NAME);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            // File output is always JSON
            layers.push(
                fmt::layer()
                    .json()
                    .with_writer(non_blocking_file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .boxed(),
            );
            Some(guard)
        } else {
            None
        };

        let (filter, handle) = reload::Layer::new(env_filter(config.level));
        tracing_subscriber::registry()
            .with(layers)
            .with(filter)
            .try_init()
            .context("Failed to install global tracing subscriber")?;

        tracing::debug!(
            level = %config.level,
            format = ?config.format,
            file_output = config.log_dir.is_some(),
            "logger initialized"
        );

        Ok(Self {
            filter: handle,
            _guard: guard,
        })
    }

    /// Switch every output to `level`, typically the validated `Main.loglevel`.
    ///
    /// # Errors
    /// Returns an error if the subscriber has been dropped
    pub fn set_level(&self, level: LogLevel) -> Result<()> {
        self.filter
            .reload(env_filter(level))
            .context("Failed to update log level")?;
        tracing::debug!(level = %level, "log level updated");
        Ok(())
    }
}

fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level_filter(level).into())
        .from_env_lossy()
}

/// Map a configured log level onto a tracing filter.
///
/// NOTSET lets everything through; CRITICAL has no tracing counterpart and
/// collapses onto ERROR.
pub const fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::NotSet => LevelFilter::TRACE,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warning => LevelFilter::WARN,
        LogLevel::Error | LogLevel::Critical => LevelFilter::ERROR,
    }
}
