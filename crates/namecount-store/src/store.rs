//! The read-modify-write cycle over the counter document.

use namecount_config::StoreConfig;
use namecount_core::CounterDocument;
use opendal::{ErrorKind, Operator};

use crate::error::{Result, StoreError};
use crate::operator::operator_from_config;

/// Maintains the counter document under batches of name occurrences.
///
/// One instance per document key. Within one `apply_occurrences` call the
/// read completes before any increment is applied and the write starts only
/// after the whole batch is folded in; across calls there is no coordination
/// at all (last writer wins).
#[derive(Clone)]
pub struct CounterStore {
    operator: Operator,
    key: String,
}

impl CounterStore {
    pub fn new(operator: Operator, key: impl Into<String>) -> Self {
        Self {
            operator,
            key: key.into(),
        }
    }

    /// Build the store from configuration, constructing the backend operator.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let operator = operator_from_config(config)?;
        Ok(Self::new(operator, config.key.clone()))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    /// Read the current document.
    ///
    /// An absent key is the empty document, not an error: the blob is
    /// created lazily by the first successful write.
    pub async fn load(&self) -> Result<CounterDocument> {
        match self.operator.read(&self.key).await {
            Ok(buffer) => CounterDocument::from_slice(&buffer.to_vec())
                .map_err(|e| StoreError::corrupt(&self.key, e)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(CounterDocument::new()),
            Err(e) => Err(StoreError::unavailable("read", e)),
        }
    }

    /// Fold a batch of name occurrences into the stored document.
    ///
    /// Each occurrence contributes exactly one increment; a name appearing
    /// twice in the batch is counted twice. The write unconditionally
    /// overwrites whatever is currently stored. On any error the whole batch
    /// is failed and nothing is written, so redelivery re-applies (and
    /// re-counts) all of it.
    pub async fn apply_occurrences<I>(&self, batch: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut document = self.load().await?;

        let mut applied = 0usize;
        for name in batch {
            document.record(name.as_ref());
            applied += 1;
        }

        self.operator
            .write(&self.key, document.to_vec())
            .await
            .map_err(|e| StoreError::unavailable("write", e))?;

        tracing::debug!(
            key = %self.key,
            applied,
            distinct = document.len(),
            "applied occurrence batch"
        );
        Ok(())
    }

    /// Storage connectivity probe for readiness checks. An absent document
    /// still counts as healthy.
    pub async fn probe(&self) -> Result<()> {
        match self.operator.stat(&self.key).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::unavailable("read", e)),
        }
    }
}
