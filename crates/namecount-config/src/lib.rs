// namecount-config - Unified configuration for all runtimes
//
// Supports configuration from multiple sources:
// 1. Environment variables (highest priority)
// 2. Config file path from NAMECOUNT_CONFIG env var
// 3. Config file contents from NAMECOUNT_CONFIG_CONTENT env var
// 4. Default config file locations (./config.toml, ./.namecount.toml)
// 5. Platform-specific defaults (lowest priority)

use anyhow::Result;
use serde::{Deserialize, Serialize};

mod env;
mod platform;
mod sources;
mod validation;

pub use env::{apply_env_overrides, EnvSource, ENV_PREFIX};
pub use platform::Platform;

/// Main runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub store: StoreConfig,

    #[serde(default)]
    pub queue: QueueConfig,

    #[serde(default)]
    pub drain: DrainConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,
}

/// Counter store configuration: which backend holds the counter document
/// and the key it lives under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    #[serde(default = "default_store_key")]
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs: Option<FsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Config>,
}

fn default_store_key() -> String {
    "names.json".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Fs,
    S3,
    Memory,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Fs => write!(f, "fs"),
            StoreBackend::S3 => write!(f, "s3"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fs" | "filesystem" => Ok(StoreBackend::Fs),
            "s3" | "aws" => Ok(StoreBackend::S3),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            _ => anyhow::bail!("Unsupported store backend: {}. Supported: fs, s3, memory", s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsConfig {
    pub path: String,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            path: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Queue configuration: where greeted names wait for the drain consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    pub backend: QueueBackend,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqs: Option<SqsConfig>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            backend: QueueBackend::Memory,
            sqs: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueBackend {
    Sqs,
    Memory,
}

impl std::fmt::Display for QueueBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueBackend::Sqs => write!(f, "sqs"),
            QueueBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqsConfig {
    pub queue_url: String,
}

/// Drain consumer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrainConfig {
    /// Names applied per store round trip. Matches the SQS event source
    /// default batch size.
    pub max_batch_size: usize,
}

impl Default for DrainConfig {
    fn default() -> Self {
        Self { max_batch_size: 10 }
    }
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl RuntimeConfig {
    /// Load configuration from all sources with priority
    pub fn load() -> Result<Self> {
        let platform = Platform::detect();
        sources::load_config(platform)
    }

    /// Load configuration for a specific platform (useful for testing)
    pub fn load_for_platform(platform: Platform) -> Result<Self> {
        sources::load_config(platform)
    }

    /// Load from an explicit file path (CLI --config flag)
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        sources::load_from_file_path(path)
    }

    /// Load from standard locations, falling back to platform defaults
    pub fn load_or_default() -> Result<Self> {
        sources::load_or_default(Platform::detect())
    }

    /// Platform defaults without file or environment input
    pub fn from_platform_defaults(platform: Platform) -> Self {
        let defaults = platform.defaults();
        Self {
            store: StoreConfig {
                backend: defaults.store_backend.parse().expect("platform default backend"),
                key: default_store_key(),
                fs: match defaults.store_backend {
                    "fs" => Some(FsConfig::default()),
                    _ => None,
                },
                s3: None,
            },
            queue: QueueConfig {
                backend: match defaults.queue_backend {
                    "sqs" => QueueBackend::Sqs,
                    _ => QueueBackend::Memory,
                },
                sqs: None,
            },
            drain: DrainConfig::default(),
            server: match platform {
                Platform::Server => Some(ServerConfig::default()),
                Platform::Lambda => None,
            },
        }
    }

    /// Overlay another config on top of this one. Sections present in
    /// `other` win wholesale; absent optional sections are kept.
    pub fn merge(&mut self, other: RuntimeConfig) {
        self.store = other.store;
        self.queue = other.queue;
        self.drain = other.drain;
        if other.server.is_some() {
            self.server = other.server;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_from_str() {
        assert_eq!("fs".parse::<StoreBackend>().unwrap(), StoreBackend::Fs);
        assert_eq!("s3".parse::<StoreBackend>().unwrap(), StoreBackend::S3);
        assert_eq!(
            "memory".parse::<StoreBackend>().unwrap(),
            StoreBackend::Memory
        );
        assert_eq!(
            "filesystem".parse::<StoreBackend>().unwrap(),
            StoreBackend::Fs
        );
        assert!("dynamo".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_default_configs() {
        let server = ServerConfig::default();
        assert_eq!(server.listen_addr, "0.0.0.0:8080");
        assert_eq!(server.log_format, LogFormat::Text);

        let drain = DrainConfig::default();
        assert_eq!(drain.max_batch_size, 10);
    }

    #[test]
    fn test_parse_toml_config() {
        let toml_str = r#"
            [store]
            backend = "s3"
            key = "counts/names.json"

            [store.s3]
            bucket = "greetings"
            region = "us-east-1"

            [queue]
            backend = "sqs"

            [queue.sqs]
            queue_url = "https://sqs.us-east-1.amazonaws.com/123456789012/names"
        "#;

        let config: RuntimeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.store.backend, StoreBackend::S3);
        assert_eq!(config.store.key, "counts/names.json");
        assert_eq!(config.store.s3.as_ref().unwrap().bucket, "greetings");
        assert_eq!(config.queue.backend, QueueBackend::Sqs);
        assert_eq!(config.drain.max_batch_size, 10);
    }

    #[test]
    fn test_merge_keeps_existing_server_section() {
        let mut base = RuntimeConfig::from_platform_defaults(Platform::Server);
        let overlay: RuntimeConfig = toml::from_str(
            r#"
            [store]
            backend = "memory"
        "#,
        )
        .unwrap();

        base.merge(overlay);
        assert_eq!(base.store.backend, StoreBackend::Memory);
        assert!(base.server.is_some());
    }
}
