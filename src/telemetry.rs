//! Tracing subscriber setup
//!
//! The library only emits `tracing` events; binaries decide where they go.
//!
//! ```rust,ignore
//! use siumai_catalog::telemetry::{OutputFormat, SubscriberConfig, init_subscriber};
//!
//! let config = SubscriberConfig::builder()
//!     .log_level(tracing::Level::DEBUG)
//!     .output_format(OutputFormat::Json)
//!     .build();
//! let _guard = init_subscriber(config)?;
//! ```

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::error::CatalogError;

pub const LOG_LEVEL_ENV: &str = "SIUMAI_CATALOG_LOG_LEVEL";
pub const LOG_FORMAT_ENV: &str = "SIUMAI_CATALOG_LOG_FORMAT";
pub const LOG_FILE_ENV: &str = "SIUMAI_CATALOG_LOG_FILE";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON with thread metadata
    Json,
    /// One flat JSON object per event
    JsonCompact,
}

impl std::str::FromStr for OutputFormat {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "json-compact" => Ok(Self::JsonCompact),
            _ => Err(CatalogError::TelemetryInit(format!(
                "Invalid log format: {s}. Valid options: text, json, json-compact"
            ))),
        }
    }
}

/// Subscriber configuration
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub log_level: tracing::Level,
    pub output_format: OutputFormat,
    /// Write to stderr
    pub enable_console: bool,
    /// Also write to this file (never rotated)
    pub log_file: Option<PathBuf>,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            log_level: tracing::Level::INFO,
            output_format: OutputFormat::Text,
            enable_console: true,
            log_file: None,
        }
    }
}

impl SubscriberConfig {
    pub fn builder() -> SubscriberConfigBuilder {
        SubscriberConfigBuilder::default()
    }

    /// Debug level text on stderr; shows diagnostics and transport events.
    pub fn debug() -> Self {
        Self {
            log_level: tracing::Level::DEBUG,
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct SubscriberConfigBuilder {
    log_level: Option<tracing::Level>,
    output_format: Option<OutputFormat>,
    enable_console: Option<bool>,
    log_file: Option<PathBuf>,
}

impl SubscriberConfigBuilder {
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = Some(level);
        self
    }

    pub fn log_level_str(mut self, level: &str) -> Result<Self, CatalogError> {
        let parsed = level.trim().parse::<tracing::Level>().map_err(|_| {
            CatalogError::TelemetryInit(format!(
                "Invalid log level: {level}. Valid options: trace, debug, info, warn, error"
            ))
        })?;
        self.log_level = Some(parsed);
        Ok(self)
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn enable_console(mut self, enable: bool) -> Self {
        self.enable_console = Some(enable);
        self
    }

    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn build(self) -> SubscriberConfig {
        SubscriberConfig {
            log_level: self.log_level.unwrap_or(tracing::Level::INFO),
            output_format: self.output_format.unwrap_or_default(),
            enable_console: self.enable_console.unwrap_or(true),
            log_file: self.log_file,
        }
    }
}

fn env_filter(level: tracing::Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();
    EnvFilter::new(format!("siumai_catalog={level}"))
}

fn format_layer<W>(format: OutputFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(ansi);
    match format {
        OutputFormat::Text => layer.boxed(),
        OutputFormat::Json => layer
            .json()
            .with_thread_ids(true)
            .with_thread_names(true)
            .boxed(),
        OutputFormat::JsonCompact => layer.json().flatten_event(true).boxed(),
    }
}

fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard), CatalogError> {
    let file_name = path.file_name().ok_or_else(|| {
        CatalogError::TelemetryInit(format!(
            "Log file path has no file name: {}",
            path.display()
        ))
    })?;
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(directory).map_err(|e| {
        CatalogError::TelemetryInit(format!(
            "Cannot create log directory {}: {e}",
            directory.display()
        ))
    })?;
    let appender = tracing_appender::rolling::never(directory, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

/// Layers for `config`, plus the file writer guard when a file is configured.
pub fn build_layers(
    config: &SubscriberConfig,
) -> Result<(Vec<BoxedLayer>, Option<WorkerGuard>), CatalogError> {
    let mut layers = Vec::new();
    if config.enable_console {
        layers.push(
            format_layer(config.output_format, std::io::stderr, true)
                .with_filter(env_filter(config.log_level))
                .boxed(),
        );
    }

    let mut guard = None;
    if let Some(path) = &config.log_file {
        let (writer, file_guard) = file_writer(path)?;
        layers.push(
            format_layer(config.output_format, writer, false)
                .with_filter(env_filter(config.log_level))
                .boxed(),
        );
        guard = Some(file_guard);
    }
    Ok((layers, guard))
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for as long as file logging should flush.
/// An already installed subscriber is not an error.
pub fn init_subscriber(config: SubscriberConfig) -> Result<Option<WorkerGuard>, CatalogError> {
    let (layers, guard) = build_layers(&config)?;
    match tracing_subscriber::registry().with(layers).try_init() {
        Ok(()) => Ok(guard),
        Err(e) if e.to_string().contains("already been set") => Ok(guard),
        Err(e) => Err(CatalogError::TelemetryInit(format!(
            "Failed to initialize tracing: {e}"
        ))),
    }
}

/// Install the global subscriber from environment variables:
/// - `SIUMAI_CATALOG_LOG_LEVEL`: trace, debug, info, warn, error
/// - `SIUMAI_CATALOG_LOG_FORMAT`: text, json, json-compact
/// - `SIUMAI_CATALOG_LOG_FILE`: log file path
pub fn init_from_env() -> Result<Option<WorkerGuard>, CatalogError> {
    init_subscriber(config_from_env()?)
}

fn config_from_env() -> Result<SubscriberConfig, CatalogError> {
    let mut builder = SubscriberConfig::builder();
    if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
        builder = builder.log_level_str(&level)?;
    }
    if let Ok(format) = std::env::var(LOG_FORMAT_ENV) {
        builder = builder.output_format(format.parse()?);
    }
    if let Ok(path) = std::env::var(LOG_FILE_ENV) {
        builder = builder.log_file(path);
    }
    Ok(builder.build())
}
