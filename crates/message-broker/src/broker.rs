use std::time::Duration;

use async_trait::async_trait;
use domain::DomainEvent;

use crate::{MessageDocument, MessageId, MessageStore, Result};

/// Simulated transport latency of [`FakeServiceBus`].
pub const DEFAULT_PUBLISH_DELAY: Duration = Duration::from_millis(10);

/// A topic-based message broker.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Publishes a serialized event to a topic.
    async fn publish_message(
        &self,
        event_type: &str,
        topic: &str,
        body: serde_json::Value,
    ) -> Result<MessageId>;
}

/// Extension trait for publishing typed domain events.
#[async_trait]
pub trait MessageBrokerExt: MessageBroker {
    /// Publishes an event to an explicit topic.
    async fn publish<E: DomainEvent>(&self, event: &E, topic: &str) -> Result<MessageId> {
        let body = serde_json::to_value(event)?;
        self.publish_message(event.event_type(), topic, body).await
    }

    /// Publishes an event to its default topic.
    async fn publish_event<E: DomainEvent>(&self, event: &E) -> Result<MessageId> {
        let topic = event.topic();
        self.publish(event, &topic).await
    }
}

impl<T: MessageBroker + ?Sized> MessageBrokerExt for T {}

/// Simulated service bus.
///
/// Nothing leaves the process: each publish is recorded in a
/// [`MessageStore`] and then waits for the configured delay.
#[derive(Clone)]
pub struct FakeServiceBus<M: MessageStore> {
    store: M,
    delay: Duration,
}

impl<M: MessageStore> FakeServiceBus<M> {
    /// Creates a bus over a message store with the default delay.
    pub fn new(store: M) -> Self {
        Self {
            store,
            delay: DEFAULT_PUBLISH_DELAY,
        }
    }

    /// Sets the simulated publish latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the message log.
    pub fn store(&self) -> &M {
        &self.store
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl<M: MessageStore> MessageBroker for FakeServiceBus<M> {
    #[tracing::instrument(skip(self, body))]
    async fn publish_message(
        &self,
        event_type: &str,
        topic: &str,
        body: serde_json::Value,
    ) -> Result<MessageId> {
        let message = MessageDocument::new(event_type, topic, body);
        let message_id = message.message_id;

        if let Err(error) = self.store.insert(message).await {
            metrics::counter!("broker_publish_failures_total").increment(1);
            tracing::error!(%error, topic, event_type, "failed to publish message");
            return Err(error);
        }

        tracing::info!(%message_id, topic, event_type, "publishing message");

        tokio::time::sleep(self.delay).await;

        metrics::counter!("broker_messages_published_total", "topic" => topic.to_string())
            .increment(1);
        tracing::info!(%message_id, topic, "message published");

        Ok(message_id)
    }
}
