// End-to-end pipeline tests: greet -> queue -> drain -> stored document
//
// Exercises the whole flow through the shared handlers with the in-memory
// queue and storage backends.

use namecount_core::CounterDocument;
use namecount_handlers::{handle_drain, handle_greet};
use namecount_queue::in_memory;
use namecount_store::CounterStore;
use opendal::{services, Operator};

fn memory_store() -> CounterStore {
    let op = Operator::new(services::Memory::default())
        .expect("Failed to create memory operator")
        .finish();
    CounterStore::new(op, "names.json")
}

#[tokio::test]
async fn greeted_names_end_up_counted() {
    let store = memory_store();
    let (queue, mut consumer) = in_memory();

    for name in ["alice", "bob", "alice"] {
        let page = handle_greet(name, &queue).await.expect("greet");
        assert!(page.contains(&format!("Hello {}", name)));
    }

    let batch = consumer.next_batch(10).await.expect("queued batch");
    let report = handle_drain(&batch, &store).await.expect("drain");
    assert_eq!(report.applied, 3);

    let bytes = store
        .operator()
        .read(store.key())
        .await
        .expect("stored document")
        .to_vec();
    let doc = CounterDocument::from_slice(&bytes).expect("decode");
    assert_eq!(doc.count_of("alice"), 2);
    assert_eq!(doc.count_of("bob"), 1);
}

#[tokio::test]
async fn counts_accumulate_across_drain_rounds() {
    let store = memory_store();

    // First session greets alice twice, second greets bob and alice again.
    let (queue, mut consumer) = in_memory();
    handle_greet("alice", &queue).await.unwrap();
    handle_greet("alice", &queue).await.unwrap();
    let batch = consumer.next_batch(10).await.unwrap();
    handle_drain(&batch, &store).await.unwrap();

    handle_greet("bob", &queue).await.unwrap();
    handle_greet("alice", &queue).await.unwrap();
    let batch = consumer.next_batch(10).await.unwrap();
    handle_drain(&batch, &store).await.unwrap();

    let bytes = store.operator().read(store.key()).await.unwrap().to_vec();
    let doc = CounterDocument::from_slice(&bytes).unwrap();
    assert_eq!(doc.count_of("alice"), 3);
    assert_eq!(doc.count_of("bob"), 1);
}

#[tokio::test]
async fn rejected_names_never_reach_the_queue() {
    let (queue, mut consumer) = in_memory();

    assert!(handle_greet("  ", &queue).await.is_err());
    handle_greet("alice", &queue).await.unwrap();
    drop(queue);

    // Only the accepted name is queued
    assert_eq!(consumer.next_batch(10).await.unwrap(), vec!["alice"]);
    assert!(consumer.next_batch(10).await.is_none());
}
