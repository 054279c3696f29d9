//! Log output setup.
//!
//! Builds a `tracing-subscriber` formatter from a [`LogConfig`]. Output goes
//! to stderr, and additionally to a file when one is configured. Tests
//! should install the subscriber with `tracing::subscriber::with_default`
//! rather than [`try_init`].

use crate::error::{GatewayError, GatewayResult};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::EnvFilter;

/// Line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(GatewayError::config(format!(
                "unknown log format {other:?}; expected text or json"
            ))),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directives, e.g. `info` or `vitrine=debug`
    pub filter: String,
    /// Line format
    pub format: LogFormat,
    /// File to append to
    pub file: Option<PathBuf>,
    /// Also write to stderr when a file is set
    pub console: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Text,
            file: None,
            console: true,
        }
    }
}

impl LogConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set filter directives
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Set line format
    #[must_use]
    pub const fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Append to a file
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Toggle stderr output when a file is set
    #[must_use]
    pub const fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }
}

/// Build a subscriber for `config` without installing it
///
/// # Errors
///
/// Returns [`GatewayError::Config`] for invalid filter directives and
/// [`GatewayError::Io`] if the log file cannot be opened.
pub fn build_subscriber(config: &LogConfig) -> GatewayResult<Box<dyn Subscriber + Send + Sync>> {
    let filter = EnvFilter::try_new(&config.filter).map_err(|e| {
        GatewayError::config(format!("invalid log filter {:?}: {e}", config.filter))
    })?;

    let (writer, ansi) = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let writer = if config.console {
                BoxMakeWriter::new(std::io::stderr.and(Mutex::new(file)))
            } else {
                BoxMakeWriter::new(Mutex::new(file))
            };
            (writer, false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true);

    Ok(match config.format {
        LogFormat::Text => Box::new(builder.with_ansi(ansi).finish()),
        LogFormat::Json => Box::new(builder.json().finish()),
    })
}

/// Install the subscriber for `config` as the global default
///
/// # Errors
///
/// Fails if the subscriber cannot be built or a global default is already
/// set.
pub fn try_init(config: &LogConfig) -> GatewayResult<()> {
    let subscriber = build_subscriber(config)?;
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| GatewayError::config(format!("logging already initialised: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_invalid_filter_is_config_error() {
        let config = LogConfig::new().with_filter("vitrine=[[[");
        assert!(matches!(
            build_subscriber(&config),
            Err(GatewayError::Config { .. })
        ));
    }

    #[test]
    fn test_file_output_keeps_stderr_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("both.log");
        let config = LogConfig::new().with_file(&path);
        assert!(config.console);
        assert!(!config.clone().with_console(false).console);

        let subscriber = build_subscriber(&config).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("written to stderr and file");
        });
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("written to stderr and file"));
    }

    #[test]
    fn test_text_output_goes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let config = LogConfig::new()
            .with_filter("debug")
            .with_file(&path)
            .with_console(false);
        let subscriber = build_subscriber(&config).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(locator = "id=\"Email\"", "typed into field");
            tracing::trace!("filtered out");
        });
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("INFO"));
        assert!(contents.contains("typed into field"));
        assert!(!contents.contains("filtered out"));
        assert!(!contents.contains("\u{1b}["));
    }

    #[test]
    fn test_json_output_is_one_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let config = LogConfig::new()
            .with_format(LogFormat::Json)
            .with_file(&path)
            .with_console(false);
        let subscriber = build_subscriber(&config).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(action = "click", "interaction failed");
        });
        let contents = std::fs::read_to_string(&path).unwrap();
        let line = contents.lines().next().unwrap();
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["fields"]["message"], "interaction failed");
        assert_eq!(value["fields"]["action"], "click");
    }
}
