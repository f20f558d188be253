// Environment variable overrides
//
// NAMECOUNT_* variables override individual fields after file/default
// loading. The NAME_BUCKET and NAME_QUEUE_URL variables exported by the
// deployment stack are honored unprefixed.

use crate::{QueueBackend, RuntimeConfig, S3Config, ServerConfig, SqsConfig, StoreBackend};
use anyhow::{Context, Result};

pub const ENV_PREFIX: &str = "NAMECOUNT_";

/// Source of environment values. Abstracted so overrides can be tested
/// against a plain map instead of mutating process state.
pub trait EnvSource {
    /// Value for a NAMECOUNT_-prefixed key (key passed without the prefix)
    fn get(&self, key: &str) -> Option<String>;

    /// Value for an unprefixed key
    fn get_raw(&self, key: &str) -> Option<String>;
}

pub fn apply_env_overrides(config: &mut RuntimeConfig, env: &dyn EnvSource) -> Result<()> {
    if let Some(backend) = env.get("STORE_BACKEND") {
        config.store.backend = backend
            .parse::<StoreBackend>()
            .context("Invalid NAMECOUNT_STORE_BACKEND")?;
    }

    if let Some(key) = env.get("STORE_KEY") {
        config.store.key = key;
    }

    if let Some(path) = env.get("STORE_FS_PATH") {
        config.store.fs.get_or_insert_with(Default::default).path = path;
    }

    // NAME_BUCKET is what the deployment stack exports for the counter bucket
    if let Some(bucket) = env.get("STORE_S3_BUCKET").or_else(|| env.get_raw("NAME_BUCKET")) {
        let s3 = config.store.s3.get_or_insert_with(|| S3Config {
            bucket: String::new(),
            region: default_region(env),
            endpoint: None,
        });
        s3.bucket = bucket;
    }

    if let Some(region) = env.get("STORE_S3_REGION") {
        if let Some(s3) = config.store.s3.as_mut() {
            s3.region = region;
        }
    }

    if let Some(endpoint) = env.get("STORE_S3_ENDPOINT") {
        if let Some(s3) = config.store.s3.as_mut() {
            s3.endpoint = Some(endpoint);
        }
    }

    // NAME_QUEUE_URL is what the deployment stack exports for the name queue
    if let Some(url) = env.get("QUEUE_URL").or_else(|| env.get_raw("NAME_QUEUE_URL")) {
        config.queue.backend = QueueBackend::Sqs;
        config.queue.sqs = Some(SqsConfig { queue_url: url });
    }

    if let Some(size) = env.get("DRAIN_MAX_BATCH_SIZE") {
        config.drain.max_batch_size = size
            .parse()
            .context("Invalid NAMECOUNT_DRAIN_MAX_BATCH_SIZE")?;
    }

    if let Some(addr) = env.get("LISTEN_ADDR") {
        config
            .server
            .get_or_insert_with(ServerConfig::default)
            .listen_addr = addr;
    }

    if let Some(level) = env.get("LOG_LEVEL") {
        config
            .server
            .get_or_insert_with(ServerConfig::default)
            .log_level = level;
    }

    Ok(())
}

fn default_region(env: &dyn EnvSource) -> String {
    env.get_raw("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string())
}
