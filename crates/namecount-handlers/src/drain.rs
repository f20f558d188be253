//! Drain handling: fold one delivered batch into the counter document.

use namecount_store::CounterStore;

use crate::HandlerError;

/// Outcome of a successfully applied batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainReport {
    /// Number of occurrences folded into the document
    pub applied: usize,
}

/// Apply one delivered batch of names to the counter store.
///
/// Exactly one `apply_occurrences` call per received batch, all-or-nothing:
/// on success every message in the batch is acknowledged; on failure the
/// whole batch is failed so the delivery mechanism redelivers it (which
/// re-counts it - at-least-once aggregation).
pub async fn handle_drain(
    names: &[String],
    store: &CounterStore,
) -> Result<DrainReport, HandlerError> {
    store.apply_occurrences(names).await.map_err(|e| {
        tracing::error!(batch_size = names.len(), error = %e, "failed to apply name batch");
        HandlerError::from(e)
    })?;

    tracing::info!(applied = names.len(), "applied name batch");
    Ok(DrainReport {
        applied: names.len(),
    })
}
