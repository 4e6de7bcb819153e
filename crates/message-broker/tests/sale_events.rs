//! Publishing sale events through the simulated bus.

use std::time::Duration;

use chrono::Utc;
use domain::{Money, Sale, SaleEvent, SaleItem};
use message_broker::{FakeServiceBus, InMemoryMessageStore, MessageBrokerExt, MessageStore};

fn bus() -> FakeServiceBus<InMemoryMessageStore> {
    FakeServiceBus::new(InMemoryMessageStore::new()).with_delay(Duration::ZERO)
}

fn sale() -> Sale {
    let mut sale = Sale::new("S-1", "C1", "Jane", "B1", "Main", Utc::now());
    sale.add_item(SaleItem::new("P1", "Widget", 12, Money::from_cents(1000)))
        .unwrap();
    sale
}

#[tokio::test]
async fn each_event_kind_lands_on_its_topic() {
    let bus = bus();
    let mut sale = sale();
    let item_id = sale.items()[0].id();

    bus.publish_event(&SaleEvent::sale_created(&sale))
        .await
        .unwrap();
    sale.cancel_item(item_id);
    let item = sale.get_item(item_id).unwrap();
    bus.publish_event(&SaleEvent::item_cancelled(&sale, item, Some("damaged".into())))
        .await
        .unwrap();
    bus.publish_event(&SaleEvent::sale_deleted(&sale))
        .await
        .unwrap();

    let topics: Vec<_> = bus
        .store()
        .messages(None)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.topic_name)
        .collect();
    assert_eq!(
        topics,
        vec!["sales-salecreated", "sales-itemcancelled", "sales-saledeleted"]
    );
}

#[tokio::test]
async fn message_body_round_trips_to_the_event() {
    let bus = bus();
    let event = SaleEvent::sale_created(&sale());

    let id = bus.publish_event(&event).await.unwrap();
    let message = bus.store().get(id).await.unwrap().unwrap();

    assert_eq!(message.event_type, "SaleCreated");
    let decoded: SaleEvent = serde_json::from_value(message.message_body).unwrap();
    assert_eq!(decoded, event);
}

#[tokio::test]
async fn consumers_can_mark_messages_processed() {
    let bus = bus();
    let id = bus
        .publish_event(&SaleEvent::sale_cancelled(&sale()))
        .await
        .unwrap();

    assert!(bus.store().mark_processed(id).await.unwrap());
    let pending: Vec<_> = bus
        .store()
        .messages(Some("SaleCancelled"))
        .await
        .unwrap()
        .into_iter()
        .filter(|m| !m.processed)
        .collect();
    assert!(pending.is_empty());
}
