use snafu::Snafu;

/// Warehouse error types.
///
/// Errors surface at the flush boundary, where they are logged and
/// swallowed; the message should carry enough detail to diagnose a
/// failed batch from the log line alone.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum WarehouseError {
    /// The dataset is not provisioned in the warehouse.
    ///
    /// Datasets are static deployment configuration; the collector never
    /// creates them.
    #[snafu(display("dataset not found: {dataset}"))]
    DatasetNotFound { dataset: String },
    /// The destination table does not exist.
    #[snafu(display("table not found: {dataset}.{table}"))]
    TableNotFound { dataset: String, table: String },
    /// A create raced another creator of the same table.
    #[snafu(display("table already exists: {dataset}.{table}"))]
    TableAlreadyExists { dataset: String, table: String },
    /// The remote store client failed.
    #[snafu(display("warehouse client error: {message}"))]
    Client { message: String },
}

pub type WarehouseResult<T, E = WarehouseError> = std::result::Result<T, E>;
