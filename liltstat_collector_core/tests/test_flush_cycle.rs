use std::sync::Arc;
use std::time::Duration;

use common::{create_warehouse, default_flush_interval, sample_row, test_dataset, test_table};
use liltstat_collector_core::{BatchFlusher, Destination, InsertQueue, run_background_flusher};
use liltstat_warehouse_core::{DatasetName, FieldType, InMemoryWarehouse, event_table_schema};
use tokio_util::sync::CancellationToken;

mod common;

fn test_destination() -> Destination {
    Destination {
        dataset: test_dataset(),
        table: test_table(),
    }
}

fn new_flusher(queue: Arc<InsertQueue>, warehouse: Arc<InMemoryWarehouse>) -> BatchFlusher {
    BatchFlusher::new(queue, warehouse).with_interval(default_flush_interval())
}

#[tokio::test]
async fn test_flush_creates_table_then_inserts_batch() {
    let warehouse = create_warehouse(&[test_dataset()]).await;
    let queue = Arc::new(InsertQueue::new());
    let flusher = new_flusher(queue.clone(), warehouse.clone());

    queue.enqueue(test_destination(), sample_row("1"));
    queue.enqueue(test_destination(), sample_row("2"));

    flusher.flush_once().await;

    assert_eq!(warehouse.list_calls(), 1);
    assert_eq!(warehouse.create_calls(), 1);
    assert_eq!(warehouse.insert_calls(), 1);

    let rows = warehouse
        .table_rows(&test_dataset(), &test_table())
        .await
        .expect("table created by flush");
    assert_eq!(rows, vec![sample_row("1"), sample_row("2")]);

    let schema = warehouse
        .table_schema(&test_dataset(), &test_table())
        .await
        .expect("table created by flush");
    assert_eq!(schema, event_table_schema());
    assert_eq!(
        schema.fields_iter().find(|f| f.name == "dataVersion").map(|f| f.field_type),
        Some(FieldType::Integer)
    );

    assert!(queue.drain(&test_destination()).is_empty());
    assert!(queue.pending_destinations().is_empty());
}

#[tokio::test]
async fn test_flush_reuses_cached_table() {
    let warehouse = create_warehouse(&[test_dataset()]).await;
    let queue = Arc::new(InsertQueue::new());
    let flusher = new_flusher(queue.clone(), warehouse.clone());

    queue.enqueue(test_destination(), sample_row("1"));
    flusher.flush_once().await;

    queue.enqueue(test_destination(), sample_row("2"));
    queue.enqueue(test_destination(), sample_row("3"));
    flusher.flush_once().await;

    assert_eq!(warehouse.list_calls(), 1);
    assert_eq!(warehouse.create_calls(), 1);
    assert_eq!(warehouse.insert_calls(), 2);

    let rows = warehouse
        .table_rows(&test_dataset(), &test_table())
        .await
        .expect("table created by flush");
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn test_flush_with_empty_queue_touches_nothing() {
    let warehouse = create_warehouse(&[test_dataset()]).await;
    let queue = Arc::new(InsertQueue::new());
    let flusher = new_flusher(queue.clone(), warehouse.clone());

    flusher.flush_once().await;

    assert_eq!(warehouse.list_calls(), 0);
    assert_eq!(warehouse.create_calls(), 0);
    assert_eq!(warehouse.insert_calls(), 0);
}

#[tokio::test]
async fn test_failing_destination_does_not_block_others() {
    // Only one of the two datasets is provisioned; flushing the other
    // fails at the listing step and its rows are dropped.
    let warehouse = create_warehouse(&[test_dataset()]).await;
    let queue = Arc::new(InsertQueue::new());
    let flusher = new_flusher(queue.clone(), warehouse.clone());

    let missing = Destination {
        dataset: DatasetName::new_unchecked("liltstat_hlgi"),
        table: test_table(),
    };

    queue.enqueue(test_destination(), sample_row("1"));
    queue.enqueue(missing.clone(), sample_row("2"));

    flusher.flush_once().await;

    let rows = warehouse
        .table_rows(&test_dataset(), &test_table())
        .await
        .expect("healthy destination flushed");
    assert_eq!(rows, vec![sample_row("1")]);

    // The failed destination's batch is gone, not requeued.
    assert!(queue.drain(&missing).is_empty());
    assert_eq!(warehouse.insert_calls(), 1);
}

#[tokio::test]
async fn test_background_flusher_flushes_on_period() {
    tokio::time::pause();

    let warehouse = create_warehouse(&[test_dataset()]).await;
    let queue = Arc::new(InsertQueue::new());
    let flusher = new_flusher(queue.clone(), warehouse.clone());

    let ct = CancellationToken::new();
    let handle = tokio::spawn(run_background_flusher(flusher, ct.clone()));

    // Let the flusher register its timer before moving the clock.
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    queue.enqueue(test_destination(), sample_row("1"));

    tokio::time::advance(default_flush_interval() + Duration::from_millis(100)).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    let rows = warehouse
        .table_rows(&test_dataset(), &test_table())
        .await
        .expect("background tick flushed");
    assert_eq!(rows, vec![sample_row("1")]);

    // Rows queued after a tick wait for the next one.
    queue.enqueue(test_destination(), sample_row("2"));
    tokio::time::advance(default_flush_interval()).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    let rows = warehouse
        .table_rows(&test_dataset(), &test_table())
        .await
        .expect("second tick flushed");
    assert_eq!(rows.len(), 2);

    ct.cancel();
    handle.await.expect("flusher terminated");
}

#[tokio::test]
async fn test_cancelled_flusher_stops_without_flushing() {
    tokio::time::pause();

    let warehouse = create_warehouse(&[test_dataset()]).await;
    let queue = Arc::new(InsertQueue::new());
    let flusher = new_flusher(queue.clone(), warehouse.clone());

    let ct = CancellationToken::new();
    let handle = tokio::spawn(run_background_flusher(flusher, ct.clone()));

    queue.enqueue(test_destination(), sample_row("1"));

    ct.cancel();
    handle.await.expect("flusher terminated");

    // The queue still holds the unflushed row; process exit would lose it.
    assert_eq!(queue.drain(&test_destination()), vec![sample_row("1")]);
    assert_eq!(warehouse.insert_calls(), 0);
}
