use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

common::uuid_id!(
    /// Unique identifier of a published message.
    MessageId
);

/// A message as recorded in the message log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDocument {
    pub message_id: MessageId,

    /// Event type name, e.g. `"SaleCreated"`.
    pub event_type: String,

    pub topic_name: String,

    /// The serialized event.
    pub message_body: serde_json::Value,

    pub timestamp: DateTime<Utc>,

    /// Set once a consumer has handled the message.
    pub processed: bool,
}

impl MessageDocument {
    /// Creates an unprocessed message stamped with the current time.
    pub fn new(
        event_type: impl Into<String>,
        topic_name: impl Into<String>,
        message_body: serde_json::Value,
    ) -> Self {
        Self {
            message_id: MessageId::new(),
            event_type: event_type.into(),
            topic_name: topic_name.into(),
            message_body,
            timestamp: Utc::now(),
            processed: false,
        }
    }
}
