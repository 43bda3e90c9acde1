//! Type-safe destination identifiers.
//!
//! Datasets and tables are addressed by plain ids in the warehouse;
//! these newtypes keep the two from being mixed up and reject ids the
//! store would refuse.

use chrono::NaiveDate;
use snafu::Snafu;

/// A single beacon row: a mapping of named event fields.
///
/// Clients supply a subset of the schema fields; the ingestion handler
/// fills in `serverTime`, `ip`, and `data` before the row is queued.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Errors that can occur when parsing destination names.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum NameError {
    #[snafu(display(
        "invalid dataset id: '{id}' - must start with a lowercase letter and contain only lowercase letters, numbers, and underscores"
    ))]
    InvalidDatasetId { id: String },
    #[snafu(display(
        "invalid table id: '{id}' - must contain only lowercase letters, numbers, and underscores"
    ))]
    InvalidTableId { id: String },
}

pub type NameResult<T, E = NameError> = std::result::Result<T, E>;

/// Type-safe identifier for a dataset.
///
/// One dataset per originating site, holding that site's dated tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetName {
    id: String,
}

/// Type-safe identifier for a table within a dataset.
///
/// The collector derives table names from the flush date, so ids made
/// entirely of digits are valid here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    id: String,
}

fn validate_dataset_id(id: &str) -> NameResult<()> {
    let mut chars = id.chars();

    let valid_first = chars.next().is_some_and(|ch| ch.is_ascii_lowercase());
    if !valid_first {
        return Err(NameError::InvalidDatasetId { id: id.to_string() });
    }

    for ch in chars {
        if !ch.is_ascii_lowercase() && !ch.is_ascii_digit() && ch != '_' {
            return Err(NameError::InvalidDatasetId { id: id.to_string() });
        }
    }

    Ok(())
}

fn validate_table_id(id: &str) -> NameResult<()> {
    if id.is_empty() {
        return Err(NameError::InvalidTableId { id: id.to_string() });
    }

    for ch in id.chars() {
        if !ch.is_ascii_lowercase() && !ch.is_ascii_digit() && ch != '_' {
            return Err(NameError::InvalidTableId { id: id.to_string() });
        }
    }

    Ok(())
}

impl DatasetName {
    /// Create a new dataset identifier.
    pub fn new(id: impl Into<String>) -> NameResult<Self> {
        let id = id.into();
        validate_dataset_id(&id)?;
        Ok(Self { id })
    }

    /// Create a new dataset identifier without validation.
    ///
    /// # Panics
    ///
    /// Panics if the dataset id is invalid.
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        let id = id.into();
        validate_dataset_id(&id).expect("dataset id must be valid");
        Self { id }
    }

    /// Get the dataset id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl TableName {
    /// Create a new table identifier.
    pub fn new(id: impl Into<String>) -> NameResult<Self> {
        let id = id.into();
        validate_table_id(&id)?;
        Ok(Self { id })
    }

    /// Create a new table identifier without validation.
    ///
    /// # Panics
    ///
    /// Panics if the table id is invalid.
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        let id = id.into();
        validate_table_id(&id).expect("table id must be valid");
        Self { id }
    }

    /// The dated table receiving the given day's rows, named `YYYYMMDD`.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            id: date.format("%Y%m%d").to_string(),
        }
    }

    /// Get the table id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for DatasetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl std::str::FromStr for DatasetName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::str::FromStr for TableName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
