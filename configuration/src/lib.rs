use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Prefix for environment overrides, e.g. `RECITATION_SERVICE_SERVER_PORT`.
pub const ENV_PREFIX: &str = "RECITATION_SERVICE";

pub type AppConfig = RecitationConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file `{path}`: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("invalid value for `{key}`: {message}")]
    Invalid { key: String, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecitationConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub transcription: TranscriptionEndpointConfig,
    #[serde(default = "default_max_audio_bytes")]
    pub max_audio_bytes: usize,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionEndpointConfig {
    #[serde(default = "default_transcription_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_pipeline_name")]
    pub selected: String,
    #[serde(default = "default_pipeline_definitions")]
    pub definitions: HashMap<String, PipelineDefinitionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDefinitionConfig {
    #[serde(default)]
    pub pre: Vec<PipelineStepRef>,
    #[serde(default = "default_pipeline_transcription_step")]
    pub transcription: PipelineStepRef,
    #[serde(default = "default_pipeline_post_steps")]
    pub post: Vec<PipelineStepRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PipelineStepRef {
    Name(String),
    WithName { name: String },
}

impl PipelineStepRef {
    pub fn name(&self) -> &str {
        match self {
            PipelineStepRef::Name(name) => name,
            PipelineStepRef::WithName { name } => name,
        }
    }
}

impl Default for RecitationConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            service: ServiceConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            transcription: TranscriptionEndpointConfig::default(),
            max_audio_bytes: default_max_audio_bytes(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Default for TranscriptionEndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_transcription_base_url(),
            api_key: None,
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            selected: default_pipeline_name(),
            definitions: default_pipeline_definitions(),
        }
    }
}

impl Default for PipelineDefinitionConfig {
    fn default() -> Self {
        Self {
            pre: Vec::new(),
            transcription: default_pipeline_transcription_step(),
            post: default_pipeline_post_steps(),
        }
    }
}

/// Loads defaults, then an optional TOML file named by
/// `RECITATION_SERVICE_CONFIG`, then `RECITATION_SERVICE_*` env overrides.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let mut config = match std::env::var(format!("{ENV_PREFIX}_CONFIG")) {
        Ok(path) => load_config_file(Path::new(&path))?,
        Err(_) => AppConfig::default(),
    };
    apply_overrides(&mut config, |key| {
        std::env::var(format!("{ENV_PREFIX}_{key}")).ok()
    })?;
    Ok(config)
}

pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn apply_overrides<F>(config: &mut AppConfig, get: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = get("SERVER_HOST") {
        config.server.host = host;
    }
    if let Some(port) = get("SERVER_PORT") {
        config.server.port = parse(&port, "SERVER_PORT")?;
    }
    if let Some(level) = get("LOGGING_LEVEL") {
        config.logging.level = level;
    }
    if let Some(base_url) = get("TRANSCRIPTION_BASE_URL") {
        config.service.transcription.base_url = base_url;
    }
    if let Some(api_key) = get("TRANSCRIPTION_API_KEY") {
        config.service.transcription.api_key = Some(api_key);
    }
    if let Some(timeout) = get("TRANSCRIPTION_REQUEST_TIMEOUT_MS") {
        config.service.transcription.request_timeout_ms =
            parse(&timeout, "TRANSCRIPTION_REQUEST_TIMEOUT_MS")?;
    }
    if let Some(max_bytes) = get("MAX_AUDIO_BYTES") {
        config.service.max_audio_bytes = parse(&max_bytes, "MAX_AUDIO_BYTES")?;
    }
    Ok(())
}

fn parse<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|err| ConfigError::Invalid {
        key: key.to_string(),
        message: format!("{err}"),
    })
}

/// Installs the global tracing subscriber. `RUST_LOG`, when set, wins
/// over the configured level.
pub fn setup_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_audio_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_transcription_base_url() -> String {
    "http://127.0.0.1:8090".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    3_000
}

fn default_request_timeout_ms() -> u64 {
    60_000
}

fn default_pipeline_name() -> String {
    "default".to_string()
}

fn default_pipeline_definitions() -> HashMap<String, PipelineDefinitionConfig> {
    let mut definitions = HashMap::new();
    definitions.insert(default_pipeline_name(), PipelineDefinitionConfig::default());
    definitions
}

fn default_pipeline_transcription_step() -> PipelineStepRef {
    PipelineStepRef::Name("transcribe".to_string())
}

fn default_pipeline_post_steps() -> Vec<PipelineStepRef> {
    vec![PipelineStepRef::Name("recitation_analysis".to_string())]
}
