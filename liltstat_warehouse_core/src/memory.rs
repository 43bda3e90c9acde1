//! In-memory implementation of the Warehouse trait.
//!
//! This implementation stores all data in memory and is suitable for
//! testing and development purposes. It uses a RwLock for thread-safe
//! access and counts remote-call-shaped operations so tests can assert
//! how often the collector actually reaches for the store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::{WarehouseError, WarehouseResult},
    resources::{DatasetName, Row, TableName},
    schema::TableSchema,
    warehouse::Warehouse,
};

/// In-memory storage for warehouse data.
#[derive(Debug, Default)]
struct WarehouseStore {
    /// Map of dataset id to its tables.
    datasets: HashMap<String, DatasetState>,
}

#[derive(Debug, Default)]
struct DatasetState {
    /// Map of table id to table contents.
    tables: HashMap<String, TableState>,
}

#[derive(Debug)]
struct TableState {
    schema: TableSchema,
    rows: Vec<Row>,
}

/// In-memory implementation of the [`Warehouse`] trait.
///
/// All data is lost when the process stops.
#[derive(Debug, Default)]
pub struct InMemoryWarehouse {
    store: RwLock<WarehouseStore>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    insert_calls: AtomicUsize,
}

impl InMemoryWarehouse {
    /// Create a new in-memory warehouse with no datasets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a dataset.
    ///
    /// Datasets are deployment configuration, not something the
    /// collector manages, so this lives outside the [`Warehouse`] trait.
    /// Provisioning an existing dataset is a no-op.
    pub async fn create_dataset(&self, dataset: DatasetName) {
        let mut store = self.store.write().await;
        store.datasets.entry(dataset.id().to_string()).or_default();
    }

    /// The rows inserted into a table, or `None` if it does not exist.
    pub async fn table_rows(
        &self,
        dataset: &DatasetName,
        table: &TableName,
    ) -> Option<Vec<Row>> {
        let store = self.store.read().await;
        let rows = store
            .datasets
            .get(dataset.id())?
            .tables
            .get(table.id())?
            .rows
            .clone();
        Some(rows)
    }

    /// The schema a table was created with, or `None` if it does not exist.
    pub async fn table_schema(
        &self,
        dataset: &DatasetName,
        table: &TableName,
    ) -> Option<TableSchema> {
        let store = self.store.read().await;
        let schema = store
            .datasets
            .get(dataset.id())?
            .tables
            .get(table.id())?
            .schema
            .clone();
        Some(schema)
    }

    /// How many times `list_tables` has been called.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// How many times `create_table` has been called.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// How many times `insert_rows` has been called.
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Warehouse for InMemoryWarehouse {
    async fn list_tables(&self, dataset: &DatasetName) -> WarehouseResult<Vec<TableName>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let store = self.store.read().await;
        let dataset_state =
            store
                .datasets
                .get(dataset.id())
                .ok_or_else(|| WarehouseError::DatasetNotFound {
                    dataset: dataset.id().to_string(),
                })?;

        let tables = dataset_state
            .tables
            .keys()
            .map(|id| TableName::new(id.as_str()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| WarehouseError::Client {
                message: err.to_string(),
            })?;

        Ok(tables)
    }

    async fn create_table(
        &self,
        dataset: &DatasetName,
        table: &TableName,
        schema: &TableSchema,
    ) -> WarehouseResult<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        let mut store = self.store.write().await;
        let dataset_state =
            store
                .datasets
                .get_mut(dataset.id())
                .ok_or_else(|| WarehouseError::DatasetNotFound {
                    dataset: dataset.id().to_string(),
                })?;

        if dataset_state.tables.contains_key(table.id()) {
            return Err(WarehouseError::TableAlreadyExists {
                dataset: dataset.id().to_string(),
                table: table.id().to_string(),
            });
        }

        dataset_state.tables.insert(
            table.id().to_string(),
            TableState {
                schema: schema.clone(),
                rows: Vec::new(),
            },
        );

        Ok(())
    }

    async fn insert_rows(
        &self,
        dataset: &DatasetName,
        table: &TableName,
        rows: Vec<Row>,
    ) -> WarehouseResult<()> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);

        let mut store = self.store.write().await;
        let dataset_state =
            store
                .datasets
                .get_mut(dataset.id())
                .ok_or_else(|| WarehouseError::DatasetNotFound {
                    dataset: dataset.id().to_string(),
                })?;

        let table_state = dataset_state.tables.get_mut(table.id()).ok_or_else(|| {
            WarehouseError::TableNotFound {
                dataset: dataset.id().to_string(),
                table: table.id().to_string(),
            }
        })?;

        table_state.rows.extend(rows);

        Ok(())
    }
}
