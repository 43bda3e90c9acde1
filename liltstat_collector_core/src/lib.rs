//! Core batching subsystem for the liltstat beacon collector.
//!
//! Beacons accepted by the HTTP layer are resolved to a destination
//! dataset, buffered in the [`InsertQueue`], and periodically drained by
//! the [`BatchFlusher`], which ensures the dated destination table
//! exists before batch-inserting into the warehouse.

pub mod error;
pub mod flusher;
pub mod queue;
pub mod resolver;
pub mod table_cache;

pub use error::{CollectorError, Result};
pub use flusher::{BatchFlusher, DEFAULT_FLUSH_INTERVAL, run_background_flusher};
pub use queue::{Destination, InsertQueue};
pub use resolver::SiteResolver;
pub use table_cache::TableExistenceCache;
