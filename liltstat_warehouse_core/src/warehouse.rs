//! The warehouse trait.

use async_trait::async_trait;

use crate::{
    error::WarehouseResult,
    resources::{DatasetName, Row, TableName},
    schema::TableSchema,
};

/// A columnar analytics store holding datasets of dated tables.
///
/// This trait models the remote store operations the collector needs and
/// will be implemented by:
/// - [`InMemoryWarehouse`](crate::InMemoryWarehouse): stores everything
///   in memory for testing and development
/// - remote warehouse clients living outside this repository
///
/// Every method is a network call in a remote implementation; callers on
/// the request path must not depend on any of them.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// List the names of all tables in a dataset.
    async fn list_tables(&self, dataset: &DatasetName) -> WarehouseResult<Vec<TableName>>;

    /// Create a table with the given schema.
    ///
    /// Fails if the table already exists, including when another creator
    /// won a race for the same dated table.
    async fn create_table(
        &self,
        dataset: &DatasetName,
        table: &TableName,
        schema: &TableSchema,
    ) -> WarehouseResult<()>;

    /// Append a batch of rows to a table.
    async fn insert_rows(
        &self,
        dataset: &DatasetName,
        table: &TableName,
        rows: Vec<Row>,
    ) -> WarehouseResult<()>;
}
