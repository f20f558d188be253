//! Storage operator construction
//!
//! Builds the OpenDAL operator backing the counter document from the
//! configured backend.

use namecount_config::{StoreBackend, StoreConfig};
use opendal::Operator;

use crate::error::{Result, StoreError};

/// Create an OpenDAL operator for the configured store backend.
///
/// S3 credentials are discovered the usual way: IAM role (preferred on
/// Lambda), AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY, or the credentials
/// file.
pub fn operator_from_config(config: &StoreConfig) -> Result<Operator> {
    let operator = match config.backend {
        StoreBackend::Fs => {
            let fs = config.fs.as_ref().ok_or_else(|| {
                StoreError::invalid_config("fs config required for filesystem backend")
            })?;

            let fs_builder = opendal::services::Fs::default().root(&fs.path);
            Operator::new(fs_builder)
                .map_err(|e| {
                    StoreError::invalid_config(format!(
                        "Failed to create filesystem operator: {}",
                        e
                    ))
                })?
                .finish()
        }
        StoreBackend::S3 => {
            let s3 = config.s3.as_ref().ok_or_else(|| {
                StoreError::invalid_config("s3 config required for S3 backend")
            })?;

            let mut s3_builder = opendal::services::S3::default()
                .bucket(&s3.bucket)
                .region(&s3.region);

            if let Some(endpoint) = &s3.endpoint {
                s3_builder = s3_builder.endpoint(endpoint);
            }

            Operator::new(s3_builder)
                .map_err(|e| {
                    StoreError::invalid_config(format!("Failed to create S3 operator: {}", e))
                })?
                .finish()
        }
        StoreBackend::Memory => Operator::new(opendal::services::Memory::default())
            .map_err(|e| {
                StoreError::invalid_config(format!("Failed to create memory operator: {}", e))
            })?
            .finish(),
    };

    tracing::debug!(backend = %config.backend, key = %config.key, "store operator initialized");
    Ok(operator)
}
