//! Cached destination table existence checks.

use std::collections::{HashMap, HashSet, hash_map::Entry};
use std::sync::Arc;

use tokio::sync::Mutex;

use liltstat_warehouse_core::{
    DatasetName, TableName, Warehouse, WarehouseResult, event_table_schema,
};

/// Lazily-populated, per-dataset set of known destination tables.
///
/// The first reference to a dataset lists its tables once; afterwards
/// the cached set alone decides whether a create call is issued. The
/// cached entry doubles as the in-process guard against duplicate
/// creates: a table name is added to the set before the create call goes
/// out, so a concurrent `ensure_exists` for the same table skips it.
///
/// A failed create leaves the name cached; the following insert fails
/// and is logged by the flusher.
pub struct TableExistenceCache {
    warehouse: Arc<dyn Warehouse>,
    known: Mutex<HashMap<DatasetName, HashSet<TableName>>>,
}

impl TableExistenceCache {
    pub fn new(warehouse: Arc<dyn Warehouse>) -> Self {
        Self {
            warehouse,
            known: Mutex::new(HashMap::new()),
        }
    }

    /// Ensure the destination table exists, creating it on first use.
    ///
    /// Listing and creation failures propagate to the caller; the cache
    /// never retries on its own.
    pub async fn ensure_exists(
        &self,
        dataset: &DatasetName,
        table: &TableName,
    ) -> WarehouseResult<()> {
        let mut known = self.known.lock().await;
        let tables = match known.entry(dataset.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let listed = self.warehouse.list_tables(dataset).await?;
                entry.insert(listed.into_iter().collect())
            }
        };

        if tables.contains(table) {
            return Ok(());
        }
        tables.insert(table.clone());
        drop(known);

        self.warehouse
            .create_table(dataset, table, &event_table_schema())
            .await
    }
}
