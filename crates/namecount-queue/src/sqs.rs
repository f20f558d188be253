//! SQS-backed queue for the Lambda deployment.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sqs::Client;

use crate::{NameQueue, QueueError};

/// One SendMessage per name, body = the name, no attributes.
#[derive(Clone)]
pub struct SqsNameQueue {
    client: Client,
    queue_url: String,
}

impl SqsNameQueue {
    pub fn new(client: Client, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
        }
    }

    /// Build a client from the ambient AWS environment (IAM role on
    /// Lambda, env credentials or the credentials file elsewhere).
    pub async fn connect(queue_url: impl Into<String>) -> Self {
        let conf = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self::new(Client::new(&conf), queue_url)
    }

    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }
}

#[async_trait]
impl NameQueue for SqsNameQueue {
    async fn send(&self, name: &str) -> Result<(), QueueError> {
        self.client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(name)
            .send()
            .await
            .map_err(|e| QueueError::send(e.to_string()))?;

        tracing::debug!(queue_url = %self.queue_url, "queued name");
        Ok(())
    }
}
