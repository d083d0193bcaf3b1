//! Configuration types for the leafcheck service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::DEFAULT_CLASS_NAMES;
use crate::error::{Error, Result};

/// Top-level service configuration.
///
/// Every field has a default so a partial TOML file (or none at all) is a
/// valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub metadata: MetadataConfig,

    /// Output classes in the exact order the model emits them
    #[serde(default = "default_class_labels")]
    pub class_labels: Vec<String>,

    /// Maximum number of predictions in flight at once
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Upper bound on an upload body, in bytes
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            backend: BackendConfig::default(),
            metadata: MetadataConfig::default(),
            class_labels: default_class_labels(),
            max_concurrent: default_max_concurrent(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

impl ServiceConfig {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| Error::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.class_labels.is_empty() {
            return Err(Error::ConfigError(
                "class_labels must list at least one class".to_string(),
            ));
        }
        if self.max_concurrent == 0 {
            return Err(Error::ConfigError(
                "max_concurrent must be greater than zero".to_string(),
            ));
        }
        if self.metadata.default_language.trim().is_empty() {
            return Err(Error::ConfigError(
                "metadata.default_language must not be empty".to_string(),
            ));
        }

        match &self.backend {
            BackendConfig::Local { input_size, .. } if *input_size == 0 => Err(
                Error::ConfigError("backend.input_size must be greater than zero".to_string()),
            ),
            BackendConfig::Remote { endpoint, .. } if endpoint.trim().is_empty() => Err(
                Error::ConfigError("backend.endpoint must not be empty".to_string()),
            ),
            BackendConfig::Remote {
                timeout_secs: 0, ..
            } => Err(Error::ConfigError(
                "backend.timeout_secs must be greater than zero".to_string(),
            )),
            BackendConfig::Remote {
                input_size: Some(0),
                ..
            } => Err(Error::ConfigError(
                "backend.input_size must be greater than zero".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which inference backend the service talks to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// ONNX model evaluated in-process
    Local {
        model_path: PathBuf,
        #[serde(default = "default_input_size")]
        input_size: u32,
    },
    /// TensorFlow-Serving compatible REST endpoint
    Remote {
        #[serde(default = "default_endpoint")]
        endpoint: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
        /// Resize uploads to a square of this size before sending. `None`
        /// forwards the image at its native resolution.
        #[serde(default)]
        input_size: Option<u32>,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Remote {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            input_size: None,
        }
    }
}

/// Where disease metadata comes from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MetadataSource {
    /// One `<lang>.json` file per language in `languages_dir`
    #[default]
    Directory,
    /// The English table compiled into the binary
    Builtin,
    /// No enrichment; responses carry only class and confidence
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    #[serde(default)]
    pub source: MetadataSource,

    #[serde(default = "default_languages_dir")]
    pub languages_dir: PathBuf,

    #[serde(default = "default_language")]
    pub default_language: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            source: MetadataSource::default(),
            languages_dir: default_languages_dir(),
            default_language: default_language(),
        }
    }
}

fn default_class_labels() -> Vec<String> {
    DEFAULT_CLASS_NAMES.iter().map(|s| s.to_string()).collect()
}

fn default_max_concurrent() -> usize {
    64
}

fn default_body_limit_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

pub fn default_input_size() -> u32 {
    256
}

pub fn default_endpoint() -> String {
    "http://localhost:8502/v1/models/my_model:predict".to_string()
}

pub fn default_timeout_secs() -> u64 {
    30
}

fn default_languages_dir() -> PathBuf {
    if let Ok(from_env) = std::env::var("LEAFCHECK_LANG_DIR") {
        let trimmed = from_env.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    PathBuf::from("languages")
}

pub fn default_language() -> String {
    "en".to_string()
}
