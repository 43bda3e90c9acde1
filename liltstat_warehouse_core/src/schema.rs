//! The fixed schema shared by every destination table.

use serde::{Deserialize, Serialize};

/// A field's warehouse type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
}

/// A named, typed field in a table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// The schema a table is created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub fields: Vec<Field>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

impl TableSchema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields_iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }
}

/// The schema used for every destination table the collector creates.
///
/// `insertId` through `clientTime` come from the client beacon;
/// `serverTime`, `ip`, and `data` are assigned by the ingestion handler.
pub fn event_table_schema() -> TableSchema {
    TableSchema::new(vec![
        Field::new("insertId", FieldType::String),
        Field::new("eventType", FieldType::String),
        Field::new("dataVersion", FieldType::Integer),
        Field::new("userId", FieldType::String),
        Field::new("sessionId", FieldType::String),
        Field::new("clientTime", FieldType::Integer),
        Field::new("serverTime", FieldType::Integer),
        Field::new("ip", FieldType::String),
        Field::new("data", FieldType::String),
    ])
}
