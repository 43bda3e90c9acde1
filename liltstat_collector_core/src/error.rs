use liltstat_warehouse_core::WarehouseError;
use snafu::Snafu;

/// Collector error types.
///
/// These surface only on the flush path, where the flusher catches and
/// logs them per destination; nothing here ever reaches an HTTP caller.
#[derive(Debug, Clone, Snafu)]
#[snafu(visibility(pub))]
pub enum CollectorError {
    /// A warehouse call made on behalf of a flush failed.
    #[snafu(display("failed warehouse operation {operation}"))]
    Warehouse {
        operation: &'static str,
        source: WarehouseError,
    },
}

pub type Result<T, E = CollectorError> = std::result::Result<T, E>;
