// Integration tests for the counter store read-modify-write cycle
//
// These run against the in-memory backend and pin down the store's
// behavioral contract: not-found bootstrap, batch accumulation,
// at-least-once double counting, and the lost-update race of the
// unconditional write.

use namecount_core::CounterDocument;
use namecount_store::{CounterStore, StoreError};
use opendal::{services, Operator};

const KEY: &str = "names.json";

fn memory_operator() -> Operator {
    Operator::new(services::Memory::default())
        .expect("memory operator")
        .finish()
}

async fn stored_document(op: &Operator) -> CounterDocument {
    let bytes = op.read(KEY).await.expect("read counter document").to_vec();
    CounterDocument::from_slice(&bytes).expect("decode counter document")
}

#[tokio::test]
async fn batch_counts_every_occurrence_from_empty() {
    let op = memory_operator();
    let store = CounterStore::new(op.clone(), KEY);

    store
        .apply_occurrences(["alice", "bob", "alice"])
        .await
        .unwrap();

    let doc = stored_document(&op).await;
    assert_eq!(doc.count_of("alice"), 2);
    assert_eq!(doc.count_of("bob"), 1);
    assert_eq!(doc.len(), 2);
}

#[tokio::test]
async fn batch_adds_to_existing_counts_and_leaves_others_alone() {
    let op = memory_operator();
    op.write(KEY, br#"{"alice":2,"bob":1}"#.to_vec()).await.unwrap();

    let store = CounterStore::new(op.clone(), KEY);
    store.apply_occurrences(["carol"]).await.unwrap();

    let doc = stored_document(&op).await;
    assert_eq!(doc.count_of("alice"), 2);
    assert_eq!(doc.count_of("bob"), 1);
    assert_eq!(doc.count_of("carol"), 1);
}

#[tokio::test]
async fn empty_batch_round_trips_without_changing_contents() {
    let op = memory_operator();
    op.write(KEY, br#"{"alice":3}"#.to_vec()).await.unwrap();

    let store = CounterStore::new(op.clone(), KEY);
    store.apply_occurrences(Vec::<String>::new()).await.unwrap();

    let doc = stored_document(&op).await;
    assert_eq!(doc.count_of("alice"), 3);
    assert_eq!(doc.len(), 1);
}

#[tokio::test]
async fn empty_batch_still_performs_the_write() {
    let op = memory_operator();
    let store = CounterStore::new(op.clone(), KEY);

    // No document yet; an empty batch still runs the full read+write
    // cycle, so the empty document materializes.
    store.apply_occurrences(Vec::<String>::new()).await.unwrap();
    let bytes = op.read(KEY).await.unwrap().to_vec();
    assert_eq!(bytes, b"{}");
}

#[tokio::test]
async fn redelivered_batch_double_counts() {
    // At-least-once delivery is NOT idempotent here: re-applying the same
    // batch re-increments it. Expected, not a bug.
    let op = memory_operator();
    let store = CounterStore::new(op.clone(), KEY);

    let batch = ["alice", "bob", "alice"];
    store.apply_occurrences(batch).await.unwrap();
    store.apply_occurrences(batch).await.unwrap();

    let doc = stored_document(&op).await;
    assert_eq!(doc.count_of("alice"), 4);
    assert_eq!(doc.count_of("bob"), 2);
}

#[tokio::test]
async fn corrupt_document_surfaces_and_is_never_reset() {
    let op = memory_operator();
    op.write(KEY, br#"["alice","bob"]"#.to_vec()).await.unwrap();

    let store = CounterStore::new(op.clone(), KEY);
    let err = store.apply_occurrences(["alice"]).await.unwrap_err();
    assert!(matches!(err, StoreError::CorruptDocument { .. }));

    let bytes = op.read(KEY).await.unwrap().to_vec();
    assert_eq!(bytes, br#"["alice","bob"]"#);
}

#[tokio::test]
async fn concurrent_writers_lose_updates() {
    // Two invocations race on the same key: both read {"alice":1}, A writes
    // its merge, then B overwrites it. B's document never saw bob, so bob's
    // increment is gone. This is the documented last-writer-wins behavior of
    // the unconditional read-modify-write; serializing callers (the server's
    // single drain consumer) is what prevents it in practice.
    let op = memory_operator();
    op.write(KEY, br#"{"alice":1}"#.to_vec()).await.unwrap();

    let store_a = CounterStore::new(op.clone(), KEY);
    let store_b = CounterStore::new(op.clone(), KEY);

    // Both read the same base document before either writes.
    let mut doc_a = store_a.load().await.unwrap();
    let mut doc_b = store_b.load().await.unwrap();

    doc_a.record("bob");
    op.write(KEY, doc_a.to_vec()).await.unwrap();

    doc_b.record("carol");
    op.write(KEY, doc_b.to_vec()).await.unwrap();

    let doc = stored_document(&op).await;
    assert_eq!(doc.count_of("alice"), 1);
    assert_eq!(doc.count_of("carol"), 1);
    assert_eq!(doc.count_of("bob"), 0, "bob's increment is lost by design");
}

#[tokio::test]
async fn serialized_invocations_do_not_lose_updates() {
    // The same two batches applied through the store one after the other
    // keep every increment - the single-consumer strategy in practice.
    let op = memory_operator();
    op.write(KEY, br#"{"alice":1}"#.to_vec()).await.unwrap();

    let store = CounterStore::new(op.clone(), KEY);
    store.apply_occurrences(["bob"]).await.unwrap();
    store.apply_occurrences(["carol"]).await.unwrap();

    let doc = stored_document(&op).await;
    assert_eq!(doc.count_of("alice"), 1);
    assert_eq!(doc.count_of("bob"), 1);
    assert_eq!(doc.count_of("carol"), 1);
}
