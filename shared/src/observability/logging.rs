//! `tracing-subscriber` setup shared by the service binaries

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use super::{ObservabilityError, ObservabilityResult};
use crate::config::EnvReader;

/// Directive used when neither `RUST_LOG` nor `LOG_LEVEL` is set
pub const DEFAULT_FILTER: &str = "info";

/// Output layout of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human-readable
    Pretty,
    /// One JSON object per event, for log shippers
    Json,
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value; unknown values fall back to `Pretty`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

/// What [`init_logging`] installs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub service_name: String,
    pub format: LogFormat,
    /// `EnvFilter` directive, e.g. `info` or `upload_service=debug,tower_http=info`
    pub filter: String,
}

impl LogSettings {
    /// Settings from `LOG_FORMAT` and `LOG_LEVEL`.
    pub fn from_reader<F>(env: &EnvReader<F>, service_name: &str) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            service_name: service_name.to_string(),
            format: env
                .optional("LOG_FORMAT")
                .map(|value| LogFormat::parse(&value))
                .unwrap_or(LogFormat::Pretty),
            filter: env.or_default("LOG_LEVEL", DEFAULT_FILTER),
        }
    }

    /// `RUST_LOG` wins over the configured directive; a directive that does
    /// not parse falls back to [`DEFAULT_FILTER`].
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.filter))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(settings: &LogSettings) -> ObservabilityResult<()> {
    let layer = match settings.format {
        LogFormat::Pretty => fmt::layer().with_target(true).pretty().boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_thread_ids(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(settings.env_filter())
        .with(layer)
        .try_init()
        .map_err(|e| ObservabilityError::Logging(e.to_string()))?;

    tracing::info!(
        service = %settings.service_name,
        filter = %settings.filter,
        format = ?settings.format,
        "Logging initialized"
    );

    Ok(())
}

/// Set up logging for `service_name` from the process environment.
pub fn init_service_logging(service_name: &str) -> ObservabilityResult<()> {
    init_logging(&LogSettings::from_reader(&EnvReader::process(), service_name))
}
