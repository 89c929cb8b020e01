use std::path::PathBuf;

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for stderr output
    pub console_level: LevelFilter,
    /// Log level for file output
    pub file_level: LevelFilter,
    /// Directory where log files should be written
    pub log_dir: Option<PathBuf>,
    /// Whether to enable JSON formatted logs for structured output
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_level: LevelFilter::WARN,
            file_level: LevelFilter::DEBUG,
            log_dir: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    pub fn from_env() -> Self {
        let config = Self::default()
            .with_level_override(std::env::var("GITLAB_TOOLS_LOG_LEVEL").ok().as_deref());

        Self {
            log_dir: std::env::var_os("GITLAB_TOOLS_LOG_DIR").map(PathBuf::from),
            json_format: std::env::var("GITLAB_TOOLS_JSON_LOGS").is_ok(),
            ..config
        }
    }

    /// Apply a level such as "debug" or "off" to both outputs; unparsable
    /// values are ignored
    pub fn with_level_override(mut self, level: Option<&str>) -> Self {
        if let Some(parsed_level) = level.and_then(|l| l.parse::<LevelFilter>().ok()) {
            self.console_level = parsed_level;
            self.file_level = parsed_level;
        }

        self
    }
}

/// Initialize the logging system with the given configuration
pub fn init_logging(
    config: LoggingConfig,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let mut layers = vec![];
    let mut guard = None;

    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)?;

        let file_appender = tracing_appender::rolling::daily(log_dir, "gitlab-tools.log");
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(
                    EnvFilter::builder()
                        .with_default_directive(config.file_level.into())
                        .from_env_lossy(),
                )
                .boxed()
        } else {
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    EnvFilter::builder()
                        .with_default_directive(config.file_level.into())
                        .from_env_lossy(),
                )
                .boxed()
        };

        layers.push(file_layer);
    }

    // stdout carries the fetched records
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(config.console_level.into())
                .from_env_lossy(),
        )
        .boxed();

    layers.push(console_layer);

    tracing_subscriber::registry().with(layers).init();

    Ok(guard)
}
