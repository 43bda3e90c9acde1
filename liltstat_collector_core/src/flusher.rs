//! Periodic batch flushing into the warehouse.

use std::sync::Arc;
use std::time::Duration;

use snafu::ResultExt;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use liltstat_warehouse_core::{Row, Warehouse};

use crate::{
    error::{Result, WarehouseSnafu},
    queue::{Destination, InsertQueue},
    table_cache::TableExistenceCache,
};

/// Default flush period, matching the reference deployment.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(5500);

/// Drains the insert queue on a fixed period and batch-inserts each
/// destination's rows into the warehouse.
pub struct BatchFlusher {
    queue: Arc<InsertQueue>,
    tables: TableExistenceCache,
    warehouse: Arc<dyn Warehouse>,
    interval: Duration,
}

/// Runs the flusher until the token is cancelled.
pub async fn run_background_flusher(flusher: BatchFlusher, ct: CancellationToken) {
    flusher.run(ct).await;
}

impl BatchFlusher {
    pub fn new(queue: Arc<InsertQueue>, warehouse: Arc<dyn Warehouse>) -> Self {
        Self {
            queue,
            tables: TableExistenceCache::new(warehouse.clone()),
            warehouse,
            interval: DEFAULT_FLUSH_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    async fn run(self, ct: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await; // consume the initial immediate tick

        loop {
            tokio::select! {
                _ = ct.cancelled() => break,
                _ = ticker.tick() => self.flush_once().await,
            }
        }
    }

    /// One flush tick: drain and insert every destination with pending
    /// rows.
    ///
    /// Destinations are processed sequentially; a slow or failing
    /// destination delays the others within the tick but never corrupts
    /// them. Rows of a failed batch are dropped.
    pub async fn flush_once(&self) {
        for destination in self.queue.pending_destinations() {
            let rows = self.queue.drain(&destination);
            if rows.is_empty() {
                continue;
            }

            let num_rows = rows.len();
            match self.flush_destination(&destination, rows).await {
                Ok(()) => {
                    debug!(
                        dataset = %destination.dataset,
                        table = %destination.table,
                        rows = num_rows,
                        "batch inserted",
                    );
                }
                Err(err) => {
                    error!(
                        dataset = %destination.dataset,
                        table = %destination.table,
                        rows_dropped = num_rows,
                        error = ?err,
                        "batch insert failed",
                    );
                }
            }
        }
    }

    async fn flush_destination(&self, destination: &Destination, rows: Vec<Row>) -> Result<()> {
        self.tables
            .ensure_exists(&destination.dataset, &destination.table)
            .await
            .context(WarehouseSnafu {
                operation: "ensure table",
            })?;

        self.warehouse
            .insert_rows(&destination.dataset, &destination.table, rows)
            .await
            .context(WarehouseSnafu {
                operation: "insert rows",
            })
    }
}
