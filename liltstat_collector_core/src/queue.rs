//! In-memory insert queue keyed by destination.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use liltstat_warehouse_core::{DatasetName, Row, TableName};

/// A (dataset, dated table) pair rows are queued against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    pub dataset: DatasetName,
    pub table: TableName,
}

/// Pending rows for every destination.
///
/// Rows are appended by the ingestion handler and removed only by the
/// flusher, as a single atomic drain per destination: a row racing a
/// drain lands wholly in the detached batch or in the queue left behind,
/// never both and never neither. The queue is unbounded and applies no
/// backpressure. The inner mutex is never held across an await point.
#[derive(Debug, Default)]
pub struct InsertQueue {
    inner: Mutex<HashMap<Destination, Vec<Row>>>,
}

impl InsertQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row to the destination's queue, creating it on first use.
    pub fn enqueue(&self, destination: Destination, row: Row) {
        let mut queues = self.lock();
        queues.entry(destination).or_default().push(row);
    }

    /// Atomically detach and return every row queued for the destination,
    /// leaving an empty queue behind.
    pub fn drain(&self, destination: &Destination) -> Vec<Row> {
        let mut queues = self.lock();
        match queues.get_mut(destination) {
            Some(rows) => std::mem::take(rows),
            None => Vec::new(),
        }
    }

    /// Destinations with at least one queued row.
    pub fn pending_destinations(&self) -> Vec<Destination> {
        let queues = self.lock();
        queues
            .iter()
            .filter(|(_, rows)| !rows.is_empty())
            .map(|(destination, _)| destination.clone())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Destination, Vec<Row>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
