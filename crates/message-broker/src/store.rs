use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{MessageDocument, MessageId, Result};

/// Log of published messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Records a message and returns its id.
    async fn insert(&self, message: MessageDocument) -> Result<MessageId>;

    /// Lists recorded messages in publication order, optionally only those
    /// of one event type.
    async fn messages(&self, event_type: Option<&str>) -> Result<Vec<MessageDocument>>;

    /// Retrieves a message by id.
    async fn get(&self, id: MessageId) -> Result<Option<MessageDocument>>;

    /// Flags a message as processed.
    ///
    /// Returns false if the message is unknown or was already processed.
    async fn mark_processed(&self, id: MessageId) -> Result<bool>;
}

/// In-memory message log. Clones share the same storage.
#[derive(Clone, Default)]
pub struct InMemoryMessageStore {
    messages: Arc<RwLock<Vec<MessageDocument>>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of recorded messages.
    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn insert(&self, message: MessageDocument) -> Result<MessageId> {
        let id = message.message_id;
        self.messages.write().await.push(message);
        Ok(id)
    }

    async fn messages(&self, event_type: Option<&str>) -> Result<Vec<MessageDocument>> {
        let messages = self.messages.read().await;
        Ok(messages
            .iter()
            .filter(|m| event_type.is_none_or(|t| m.event_type == t))
            .cloned()
            .collect())
    }

    async fn get(&self, id: MessageId) -> Result<Option<MessageDocument>> {
        let messages = self.messages.read().await;
        Ok(messages.iter().find(|m| m.message_id == id).cloned())
    }

    async fn mark_processed(&self, id: MessageId) -> Result<bool> {
        let mut messages = self.messages.write().await;
        match messages.iter_mut().find(|m| m.message_id == id) {
            Some(message) if !message.processed => {
                message.processed = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_and_get() {
        let store = InMemoryMessageStore::new();
        let message = MessageDocument::new("SaleCreated", "sales-salecreated", json!({"a": 1}));
        let id = store.insert(message.clone()).await.unwrap();

        assert_eq!(id, message.message_id);
        assert_eq!(store.get(id).await.unwrap(), Some(message));
        assert!(store.get(MessageId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn messages_filter_by_event_type() {
        let store = InMemoryMessageStore::new();
        store
            .insert(MessageDocument::new("SaleCreated", "t", json!({})))
            .await
            .unwrap();
        store
            .insert(MessageDocument::new("SaleDeleted", "t", json!({})))
            .await
            .unwrap();
        store
            .insert(MessageDocument::new("SaleCreated", "t", json!({})))
            .await
            .unwrap();

        assert_eq!(store.messages(None).await.unwrap().len(), 3);
        assert_eq!(store.messages(Some("SaleCreated")).await.unwrap().len(), 2);
        assert!(store.messages(Some("Unknown")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mark_processed_only_once() {
        let store = InMemoryMessageStore::new();
        let id = store
            .insert(MessageDocument::new("SaleCreated", "t", json!({})))
            .await
            .unwrap();

        assert!(store.mark_processed(id).await.unwrap());
        assert!(!store.mark_processed(id).await.unwrap());
        assert!(!store.mark_processed(MessageId::new()).await.unwrap());
        assert!(store.get(id).await.unwrap().unwrap().processed);
    }
}
