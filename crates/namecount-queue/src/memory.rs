//! In-process queue for the self-hosted server.
//!
//! An unbounded channel: the ingress side never blocks, and the single
//! consumer task pulls names in batches. Dropping the consumer fails
//! subsequent sends, so a dead drain loop is visible at the ingress.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{NameQueue, QueueError};

/// Create a connected queue/consumer pair.
pub fn in_memory() -> (InMemoryNameQueue, NameQueueConsumer) {
    let (tx, rx) = mpsc::unbounded_channel();
    (InMemoryNameQueue { tx }, NameQueueConsumer { rx })
}

/// Producer half: cloneable, shared across request handlers.
#[derive(Clone)]
pub struct InMemoryNameQueue {
    tx: mpsc::UnboundedSender<String>,
}

#[async_trait]
impl NameQueue for InMemoryNameQueue {
    async fn send(&self, name: &str) -> Result<(), QueueError> {
        self.tx
            .send(name.to_string())
            .map_err(|_| QueueError::send("drain consumer is gone"))
    }
}

/// Consumer half: owned by exactly one drain task, which serializes all
/// counter-document writes.
pub struct NameQueueConsumer {
    rx: mpsc::UnboundedReceiver<String>,
}

impl NameQueueConsumer {
    /// Wait for the next batch of names: at least one, at most `max`.
    ///
    /// Blocks until something is queued, then greedily drains whatever else
    /// is already waiting. Returns `None` once every producer is dropped and
    /// the channel is empty.
    pub async fn next_batch(&mut self, max: usize) -> Option<Vec<String>> {
        let first = self.rx.recv().await?;

        let mut batch = Vec::with_capacity(max.min(16));
        batch.push(first);
        while batch.len() < max {
            match self.rx.try_recv() {
                Ok(name) => batch.push(name),
                Err(_) => break,
            }
        }
        Some(batch)
    }
}
