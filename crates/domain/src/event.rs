//! Domain event trait.

use serde::{Serialize, de::DeserializeOwned};

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and should be named in past tense.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Returns the event type name, e.g. `"SaleCreated"`.
    fn event_type(&self) -> &'static str;

    /// Returns the broker topic this event is published to by default.
    ///
    /// Topics are named `sales-<event type in lowercase>`.
    fn topic(&self) -> String {
        format!("sales-{}", self.event_type().to_lowercase())
    }
}
