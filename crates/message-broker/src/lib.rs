//! Event publication for sale notifications.
//!
//! This crate provides:
//! - [`MessageBroker`] trait for topic-based publication, with
//!   [`MessageBrokerExt`] for publishing typed [`DomainEvent`](domain::DomainEvent)s
//! - [`FakeServiceBus`], a simulated broker that records every message
//! - [`MessageStore`] trait and [`InMemoryMessageStore`] for the message log

pub mod broker;
pub mod error;
pub mod message;
pub mod store;

pub use broker::{DEFAULT_PUBLISH_DELAY, FakeServiceBus, MessageBroker, MessageBrokerExt};
pub use error::{BrokerError, Result};
pub use message::{MessageDocument, MessageId};
pub use store::{InMemoryMessageStore, MessageStore};
