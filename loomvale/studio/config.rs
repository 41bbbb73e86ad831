use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use shared_logging::LogLevel;

/// Top-level studio configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Remote inference settings.
    pub inference: InferenceSettings,
    /// Pro unlock settings.
    pub pro: ProSettings,
    /// Export settings.
    pub export: ExportSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Remote text-completion endpoint settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct InferenceSettings {
    /// Base URL; the model id is appended as a path segment.
    pub endpoint: String,
    /// Model identifier.
    pub model: String,
    /// Bearer credential. Remote generation is disabled without it.
    pub token: Option<String>,
    /// Optional request timeout; the client default applies when unset.
    pub timeout_ms: Option<u64>,
    /// Repetition penalty forwarded with every request.
    pub repetition_penalty: f32,
}

impl std::fmt::Debug for InferenceSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceSettings")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .field("repetition_penalty", &self.repetition_penalty)
            .finish()
    }
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            token: None,
            timeout_ms: None,
            repetition_penalty: 1.1,
        }
    }
}

impl InferenceSettings {
    /// Returns true when a credential is present.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Full URL for the configured model.
    #[must_use]
    pub fn model_url(&self) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.model.trim_start_matches('/')
        )
    }
}

/// Pro gate settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ProSettings {
    /// Shared unlock secret, compared case-insensitively.
    pub unlock_code: String,
}

impl std::fmt::Debug for ProSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProSettings")
            .field("unlock_code", &"<redacted>")
            .finish()
    }
}

impl Default for ProSettings {
    fn default() -> Self {
        Self {
            unlock_code: default_unlock_code(),
        }
    }
}

/// Export destination settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Directory receiving CSV/JSON exports.
    pub dir: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir(),
        }
    }
}

/// Log sink settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// JSON-lines log file; stderr when unset.
    pub path: Option<PathBuf>,
    /// Minimum level name (`debug`, `info`, `warn`, `error`).
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            path: None,
            level: "warn".into(),
        }
    }
}

impl LoggingSettings {
    /// Parsed minimum level.
    pub fn min_level(&self) -> Result<LogLevel> {
        self.level
            .parse()
            .with_context(|| format!("invalid logging.level '{}'", self.level))
    }
}

impl StudioConfig {
    /// Loads the optional TOML file, then applies process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parses a TOML configuration file. Missing fields take defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading studio config {}", path.display()))?;
        let mut config: Self =
            toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        let source_dir = path.parent().unwrap_or_else(|| Path::new("."));
        if config.export.dir.is_relative() {
            config.export.dir = source_dir.join(&config.export.dir);
        }
        if let Some(log_path) = config.logging.path.as_mut() {
            if log_path.is_relative() {
                *log_path = source_dir.join(&*log_path);
            }
        }
        config.logging.min_level()?;
        Ok(config)
    }

    /// Applies overrides from an environment lookup. Blank values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        if let Some(model) = get("HF_MODEL") {
            self.inference.model = model;
        }
        if let Some(token) = get("HF_TOKEN") {
            self.inference.token = Some(token);
        }
        if let Some(endpoint) = get("HF_ENDPOINT") {
            self.inference.endpoint = endpoint;
        }
        if let Some(timeout) = get("HF_TIMEOUT_MS") {
            let timeout = timeout
                .parse()
                .with_context(|| format!("HF_TIMEOUT_MS must be an integer, got '{timeout}'"))?;
            self.inference.timeout_ms = Some(timeout);
        }
        if let Some(code) = get("PRO_UNLOCK_CODE") {
            self.pro.unlock_code = code;
        }
        if let Some(dir) = get("LOOMVALE_EXPORT_DIR") {
            self.export.dir = PathBuf::from(dir);
        }
        if let Some(path) = get("LOOMVALE_LOG_PATH") {
            self.logging.path = Some(PathBuf::from(path));
        }
        if let Some(level) = get("LOOMVALE_LOG_LEVEL") {
            self.logging.level = level;
            self.logging.min_level()?;
        }
        Ok(())
    }
}

fn default_endpoint() -> String {
    "https://api-inference.huggingface.co/models".into()
}

fn default_model() -> String {
    "mistralai/Mistral-7B-Instruct-v0.3".into()
}

fn default_unlock_code() -> String {
    "loomvale-pro".into()
}
