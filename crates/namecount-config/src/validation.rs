// Configuration validation
//
// Validates that required fields are present and values are sensible

use crate::{QueueBackend, RuntimeConfig, ServerConfig, StoreBackend, StoreConfig};
use anyhow::{bail, Result};
use tracing::warn;

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    validate_store_config(&config.store)?;

    if config.queue.backend == QueueBackend::Sqs {
        let sqs = config
            .queue
            .sqs
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("queue.sqs section required for sqs backend"))?;
        if sqs.queue_url.is_empty() {
            bail!("queue.sqs.queue_url must not be empty");
        }
    }

    if config.drain.max_batch_size == 0 {
        bail!("drain.max_batch_size must be greater than 0");
    }

    if config.drain.max_batch_size > 10_000 {
        warn!(
            max_batch_size = config.drain.max_batch_size,
            "drain.max_batch_size is very large; one store failure fails the whole batch"
        );
    }

    if let Some(ref server) = config.server {
        validate_server_config(server)?;
    }

    Ok(())
}

fn validate_store_config(config: &StoreConfig) -> Result<()> {
    if config.key.is_empty() {
        bail!("store.key must not be empty");
    }

    match config.backend {
        StoreBackend::Fs => {
            if config.fs.is_none() {
                bail!("store.fs section required for fs backend");
            }
        }
        StoreBackend::S3 => {
            let s3 = config
                .s3
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("store.s3 section required for s3 backend"))?;
            if s3.bucket.is_empty() {
                bail!("store.s3.bucket must not be empty");
            }
            if s3.region.is_empty() {
                bail!("store.s3.region must not be empty");
            }
        }
        StoreBackend::Memory => {}
    }

    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<()> {
    if config.listen_addr.parse::<std::net::SocketAddr>().is_err() {
        bail!(
            "server.listen_addr '{}' is not a valid socket address",
            config.listen_addr
        );
    }
    Ok(())
}
