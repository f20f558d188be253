// The single drain consumer: the one writer of the counter document.

use metrics::counter;
use namecount_handlers::handle_drain;
use namecount_queue::NameQueueConsumer;
use namecount_store::CounterStore;
use std::time::Duration;
use tracing::{debug, warn};

const INITIAL_BACKOFF: Duration = Duration::from_millis(200);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Pull batches from the queue and fold them into the store until every
/// producer is gone and the queue is drained.
pub(crate) async fn run_drain_loop(
    mut consumer: NameQueueConsumer,
    store: CounterStore,
    max_batch_size: usize,
) {
    while let Some(batch) = consumer.next_batch(max_batch_size).await {
        apply_with_retry(&batch, &store).await;
    }
    debug!("drain loop finished; queue closed");
}

/// Re-apply the same batch until it lands (at-least-once).
///
/// Storage outages clear on their own; a corrupt document keeps the loop
/// parked at the backoff cap until an operator repairs the blob. The batch
/// is never dropped and the document is never reset.
async fn apply_with_retry(batch: &[String], store: &CounterStore) {
    let mut delay = INITIAL_BACKOFF;
    loop {
        match handle_drain(batch, store).await {
            Ok(report) => {
                counter!("namecount.drain.applied", report.applied as u64);
                return;
            }
            Err(err) => {
                counter!("namecount.drain.retries", 1);
                warn!(
                    error_type = err.error_type(),
                    batch_size = batch.len(),
                    retry_in_ms = delay.as_millis() as u64,
                    "batch failed; retrying same batch"
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(MAX_BACKOFF);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use namecount_core::CounterDocument;
    use namecount_queue::{in_memory, NameQueue};
    use opendal::{services, Operator};

    #[tokio::test]
    async fn drains_queued_names_into_the_store() {
        let op = Operator::new(services::Memory::default()).unwrap().finish();
        let store = CounterStore::new(op.clone(), "names.json");
        let (queue, consumer) = in_memory();

        let drain = tokio::spawn(run_drain_loop(consumer, store, 10));

        queue.send("alice").await.unwrap();
        queue.send("bob").await.unwrap();
        queue.send("alice").await.unwrap();
        drop(queue);

        // Loop exits once producers are gone and the queue is empty
        drain.await.unwrap();

        let bytes = op.read("names.json").await.unwrap().to_vec();
        let doc = CounterDocument::from_slice(&bytes).unwrap();
        assert_eq!(doc.count_of("alice"), 2);
        assert_eq!(doc.count_of("bob"), 1);
    }

    #[tokio::test]
    async fn small_batches_accumulate_across_rounds() {
        let op = Operator::new(services::Memory::default()).unwrap().finish();
        let store = CounterStore::new(op.clone(), "names.json");
        let (queue, consumer) = in_memory();

        // Batch size 1 forces one store round trip per name
        let drain = tokio::spawn(run_drain_loop(consumer, store, 1));

        for _ in 0..4 {
            queue.send("alice").await.unwrap();
        }
        drop(queue);
        drain.await.unwrap();

        let bytes = op.read("names.json").await.unwrap().to_vec();
        let doc = CounterDocument::from_slice(&bytes).unwrap();
        assert_eq!(doc.count_of("alice"), 4);
    }
}
