//! Queue seam between the greeting ingress and the drain consumer
//!
//! The ingress handler pushes one text message per greeted name;
//! delivery to the drain side is at-least-once with no ordering
//! guarantee across messages. Two implementations:
//!
//! - [`SqsNameQueue`]: the Lambda deployment, one SQS SendMessage per name
//! - [`InMemoryNameQueue`]: the self-hosted server, an in-process channel
//!   drained by a single consumer task

mod memory;
mod sqs;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::{in_memory, InMemoryNameQueue, NameQueueConsumer};
pub use sqs::SqsNameQueue;

/// Errors surfaced by queue sends. Never swallowed: an un-queued name must
/// not be acknowledged to the caller.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue send failed: {message}")]
    Send { message: String },
}

impl QueueError {
    pub(crate) fn send(message: impl Into<String>) -> Self {
        Self::Send {
            message: message.into(),
        }
    }
}

/// A destination for greeted names.
#[async_trait]
pub trait NameQueue: Send + Sync {
    /// Enqueue one name. Returns only after the queue has durably accepted
    /// the message (for whatever durability the backend offers).
    async fn send(&self, name: &str) -> Result<(), QueueError>;
}
