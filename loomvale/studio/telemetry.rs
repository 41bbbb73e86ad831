use std::{fmt, path::PathBuf, sync::Arc};

use anyhow::Result;
use serde_json::Value;
use shared_logging::{JsonLogger, LogLevel, LogRecord};

use crate::config::LoggingSettings;

/// Builder configuring studio telemetry sinks.
pub struct StudioTelemetryBuilder {
    module: String,
    log_path: Option<PathBuf>,
    stderr: bool,
    min_level: LogLevel,
}

impl StudioTelemetryBuilder {
    /// Creates a new builder for the given module label.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            log_path: None,
            stderr: false,
            min_level: LogLevel::Debug,
        }
    }

    /// Sets the JSON log path.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Writes to stderr when no log path is set.
    #[must_use]
    pub fn stderr(mut self) -> Self {
        self.stderr = true;
        self
    }

    /// Drops records below `level`.
    #[must_use]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Finalizes the builder.
    pub fn build(self) -> Result<StudioTelemetry> {
        let logger = match (self.log_path, self.stderr) {
            (Some(path), _) => Some(JsonLogger::new(path)?.with_min_level(self.min_level)),
            (None, true) => Some(JsonLogger::stderr().with_min_level(self.min_level)),
            (None, false) => None,
        };
        Ok(StudioTelemetry {
            inner: Arc::new(TelemetryInner {
                module: self.module,
                logger,
            }),
        })
    }
}

/// Telemetry handle shared by the gateway, generators and exporter.
#[derive(Clone)]
pub struct StudioTelemetry {
    inner: Arc<TelemetryInner>,
}

impl fmt::Debug for StudioTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudioTelemetry")
            .field("module", &self.inner.module)
            .field("enabled", &self.inner.logger.is_some())
            .finish()
    }
}

struct TelemetryInner {
    module: String,
    logger: Option<JsonLogger>,
}

impl StudioTelemetry {
    /// Returns a builder for this telemetry helper.
    #[must_use]
    pub fn builder(module: impl Into<String>) -> StudioTelemetryBuilder {
        StudioTelemetryBuilder::new(module)
    }

    /// Builds telemetry from configured logging settings: a file sink when a
    /// path is set, stderr otherwise.
    pub fn from_settings(module: impl Into<String>, settings: &LoggingSettings) -> Result<Self> {
        let builder = Self::builder(module).min_level(settings.min_level()?);
        match &settings.path {
            Some(path) => builder.log_path(path).build(),
            None => builder.stderr().build(),
        }
    }

    /// Telemetry that records nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            inner: Arc::new(TelemetryInner {
                module: "studio".into(),
                logger: None,
            }),
        }
    }

    /// Logs a structured record.
    pub fn log(&self, level: LogLevel, message: &str, metadata: Value) -> Result<()> {
        if let Some(logger) = &self.inner.logger {
            let record = LogRecord::new(&self.inner.module, level, message).with_metadata(metadata);
            logger.log(&record)?;
        }
        Ok(())
    }

    /// Logs and discards sink failures; logging must not fail a generation.
    pub fn note(&self, level: LogLevel, message: &str, metadata: Value) {
        if let Err(err) = self.log(level, message, metadata) {
            eprintln!("studio telemetry write failed: {err:#}");
        }
    }
}

impl Default for StudioTelemetry {
    fn default() -> Self {
        Self::disabled()
    }
}
