use std::sync::Arc;
use std::time::Duration;

use liltstat_warehouse_core::{DatasetName, InMemoryWarehouse, Row, TableName};

pub fn test_dataset() -> DatasetName {
    DatasetName::new_unchecked("liltstat_ungi")
}

pub fn test_table() -> TableName {
    TableName::new_unchecked("20201125")
}

pub async fn create_warehouse(datasets: &[DatasetName]) -> Arc<InMemoryWarehouse> {
    let warehouse = InMemoryWarehouse::new();
    for dataset in datasets {
        warehouse.create_dataset(dataset.clone()).await;
    }
    Arc::new(warehouse)
}

pub fn sample_row(insert_id: &str) -> Row {
    let mut row = Row::new();
    row.insert("insertId".to_string(), insert_id.into());
    row.insert("eventType".to_string(), "pageview".into());
    row.insert("serverTime".to_string(), 1606262400000_i64.into());
    row.insert("ip".to_string(), "".into());
    row.insert("data".to_string(), "{}".into());
    row
}

pub fn default_flush_interval() -> Duration {
    Duration::from_secs(1)
}
