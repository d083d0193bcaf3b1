//! Command-line and environment overrides on top of the TOML configuration

use anyhow::Context;
use clap::{Parser, ValueEnum};
use leafcheck_core::config::{default_endpoint, default_input_size, default_timeout_secs};
use leafcheck_core::{BackendConfig, MetadataSource, ServiceConfig};
use std::path::PathBuf;

/// leafcheck server - plant-leaf disease prediction over HTTP
#[derive(Parser, Debug)]
#[command(name = "leafcheck-server", version, about)]
pub struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "PATH", env = "LEAFCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(short = 'H', long, env = "LEAFCHECK_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "LEAFCHECK_PORT")]
    pub port: Option<u16>,

    /// Inference backend
    #[arg(long, value_enum, env = "LEAFCHECK_BACKEND")]
    pub backend: Option<BackendArg>,

    /// ONNX model evaluated by the local backend
    #[arg(long, value_name = "PATH", env = "LEAFCHECK_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Prediction URL of the remote model server
    #[arg(long, value_name = "URL", env = "LEAFCHECK_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Square side length images are resized to before inference
    #[arg(long, env = "LEAFCHECK_INPUT_SIZE")]
    pub input_size: Option<u32>,

    /// Remote request timeout in seconds
    #[arg(long, value_name = "SECONDS", env = "LEAFCHECK_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Where disease metadata comes from
    #[arg(long, value_enum, env = "LEAFCHECK_METADATA")]
    pub metadata: Option<MetadataArg>,

    /// Directory holding one `<lang>.json` file per language
    #[arg(long, value_name = "DIR", env = "LEAFCHECK_LANG_DIR")]
    pub lang_dir: Option<PathBuf>,

    /// Language used when a request names none or an unknown one
    #[arg(long, env = "LEAFCHECK_DEFAULT_LANG")]
    pub default_lang: Option<String>,

    /// Maximum concurrent predictions
    #[arg(long, env = "LEAFCHECK_MAX_CONCURRENT")]
    pub max_concurrent: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Local,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetadataArg {
    Directory,
    Builtin,
    None,
}

impl From<MetadataArg> for MetadataSource {
    fn from(arg: MetadataArg) -> Self {
        match arg {
            MetadataArg::Directory => MetadataSource::Directory,
            MetadataArg::Builtin => MetadataSource::Builtin,
            MetadataArg::None => MetadataSource::None,
        }
    }
}

impl Args {
    /// Resolve the effective configuration: file (or defaults), then flags.
    pub fn into_config(self) -> anyhow::Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)?,
            None => ServiceConfig::default(),
        };

        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(source) = self.metadata {
            config.metadata.source = source.into();
        }
        if let Some(dir) = self.lang_dir {
            config.metadata.languages_dir = dir;
        }
        if let Some(lang) = self.default_lang {
            config.metadata.default_language = lang;
        }
        if let Some(max) = self.max_concurrent {
            config.max_concurrent = max;
        }

        let kind = self.backend.unwrap_or(match config.backend {
            BackendConfig::Local { .. } => BackendArg::Local,
            BackendConfig::Remote { .. } => BackendArg::Remote,
        });

        config.backend = match kind {
            BackendArg::Local => {
                let (model_path, input_size) = match &config.backend {
                    BackendConfig::Local {
                        model_path,
                        input_size,
                    } => (Some(model_path.clone()), *input_size),
                    BackendConfig::Remote { .. } => (None, default_input_size()),
                };
                BackendConfig::Local {
                    model_path: self
                        .model_path
                        .or(model_path)
                        .context("the local backend needs --model-path")?,
                    input_size: self.input_size.unwrap_or(input_size),
                }
            }
            BackendArg::Remote => {
                let (endpoint, timeout_secs, input_size) = match &config.backend {
                    BackendConfig::Remote {
                        endpoint,
                        timeout_secs,
                        input_size,
                    } => (endpoint.clone(), *timeout_secs, *input_size),
                    BackendConfig::Local { .. } => (default_endpoint(), default_timeout_secs(), None),
                };
                BackendConfig::Remote {
                    endpoint: self.endpoint.unwrap_or(endpoint),
                    timeout_secs: self.timeout.unwrap_or(timeout_secs),
                    input_size: self.input_size.or(input_size),
                }
            }
        };

        config.validate()?;
        Ok(config)
    }
}
