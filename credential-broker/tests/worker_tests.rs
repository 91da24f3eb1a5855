//! Broker Worker Tests over the in-process message bus

use credbroker_types::{
    CredentialIssued, CredentialName, CredentialProvided, CredentialRequested, Event, EventType,
};
use credential_broker::worker::EVENT_SOURCE;
use credential_broker::{BrokerError, BrokerWorker, CredentialBroker};
use futures::StreamExt;
use message_bus_client::memory::InMemoryBus;
use message_bus_client::traits::MessageBusClient;
use std::sync::Arc;
use std::time::Duration;

fn name(s: &str) -> CredentialName {
    CredentialName::new(s).unwrap()
}

fn issued(n: &str, v: &str) -> Event {
    Event::new(EventType::CredentialIssued, "producer", CredentialIssued::new(name(n), v)).unwrap()
}

fn requested(n: &str) -> Event {
    Event::new(EventType::CredentialRequested, "consumer", CredentialRequested::new(name(n))).unwrap()
}

fn worker_on(bus: &InMemoryBus) -> (BrokerWorker, Arc<CredentialBroker>) {
    let broker = Arc::new(CredentialBroker::new());
    let worker = BrokerWorker::new(Arc::new(bus.clone()), Arc::clone(&broker));
    (worker, broker)
}

async fn wait_for_subscribers(bus: &InMemoryBus, count: usize) {
    tokio::time::timeout(Duration::from_secs(1), async {
        while bus.subscriber_count() < count {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("worker did not subscribe");
}

#[tokio::test]
async fn test_handle_issued_publishes_nothing() {
    let bus = InMemoryBus::new();
    let (worker, broker) = worker_on(&bus);

    let response = tokio_test::assert_ok!(worker.handle_event(&issued("db-password", "s3cr3t")).await);

    assert!(response.is_none());
    assert!(broker.store().contains(&name("db-password")));
}

#[tokio::test]
async fn test_handle_requested_publishes_correlated_answer() {
    let bus = InMemoryBus::new();
    let mut provided_stream = bus.subscribe(EventType::CredentialProvided);
    let (worker, _broker) = worker_on(&bus);

    worker.handle_event(&issued("db-password", "s3cr3t")).await.unwrap();
    let request = requested("db-password");
    let response = worker.handle_event(&request).await.unwrap().unwrap();

    assert_eq!(response.event_type, EventType::CredentialProvided);
    assert_eq!(response.source, EVENT_SOURCE);
    assert_eq!(response.correlation_id, Some(request.event_id));

    let published = provided_stream.next().await.unwrap().unwrap();
    assert_eq!(published.event_id, response.event_id);
    let payload: CredentialProvided = published.payload_as().unwrap();
    assert_eq!(payload.name, name("db-password"));
    assert_eq!(payload.value.expose(), "s3cr3t");
}

#[tokio::test]
async fn test_handle_requested_unknown_is_silent() {
    let bus = InMemoryBus::new();
    let (worker, broker) = worker_on(&bus);

    let response = worker.handle_event(&requested("api-key")).await.unwrap();

    assert!(response.is_none());
    assert!(broker.store().is_empty());
}

#[tokio::test]
async fn test_handle_rejects_outbound_and_malformed_events() {
    let bus = InMemoryBus::new();
    let (worker, broker) = worker_on(&bus);

    let provided = Event::new(
        EventType::CredentialProvided,
        "someone",
        serde_json::json!({ "name": "api-key", "value": "forged" }),
    )
    .unwrap();
    assert!(matches!(
        worker.handle_event(&provided).await,
        Err(BrokerError::Event(_))
    ));

    let malformed = Event::new(
        EventType::CredentialIssued,
        "producer",
        serde_json::json!({ "name": "api-key" }),
    )
    .unwrap();
    assert!(matches!(
        worker.handle_event(&malformed).await,
        Err(BrokerError::Event(_))
    ));

    assert!(broker.store().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_run_answers_requests_end_to_end() {
    credbroker_logging::init_test_logging();

    let bus = InMemoryBus::new();
    let mut provided_stream = bus.subscribe(EventType::CredentialProvided);
    let (worker, _broker) = worker_on(&bus);

    let handle = tokio::spawn(async move { worker.run().await });
    wait_for_subscribers(&bus, 2).await;

    // A bad envelope in between must not stop the worker
    bus.publish(
        &Event::new(EventType::CredentialIssued, "producer", serde_json::json!({})).unwrap(),
    )
    .await
    .unwrap();
    bus.publish(&issued("db-password", "s3cr3t")).await.unwrap();
    bus.publish(&requested("api-key")).await.unwrap();
    let request = requested("db-password");
    bus.publish(&request).await.unwrap();

    let answer = tokio::time::timeout(Duration::from_secs(2), provided_stream.next())
        .await
        .expect("no credential.provided received")
        .unwrap()
        .unwrap();

    assert_eq!(answer.correlation_id, Some(request.event_id));
    let payload: CredentialProvided = answer.payload_as().unwrap();
    assert_eq!(payload.value.expose(), "s3cr3t");

    handle.abort();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_run_answers_requests_published_right_after_issuance() {
    let bus = InMemoryBus::with_capacity(1024);
    let mut provided_stream = bus.subscribe(EventType::CredentialProvided);
    let (worker, broker) = worker_on(&bus);

    let handle = tokio::spawn(async move { worker.run().await });
    wait_for_subscribers(&bus, 2).await;

    let mut request_ids = Vec::new();
    for i in 0..300 {
        let n = format!("cred-{}", i);
        bus.publish(&issued(&n, &format!("value-{}", i))).await.unwrap();
        let request = requested(&n);
        bus.publish(&request).await.unwrap();
        request_ids.push(request.event_id);
    }

    for (i, request_id) in request_ids.into_iter().enumerate() {
        let answer = tokio::time::timeout(Duration::from_secs(2), provided_stream.next())
            .await
            .unwrap_or_else(|_| panic!("request {} was not answered", i))
            .unwrap()
            .unwrap();

        assert_eq!(answer.correlation_id, Some(request_id));
        let payload: CredentialProvided = answer.payload_as().unwrap();
        assert_eq!(payload.name.as_str(), format!("cred-{}", i));
        assert_eq!(payload.value.expose(), format!("value-{}", i));
    }

    assert_eq!(broker.store().len(), 300);
    handle.abort();
}
