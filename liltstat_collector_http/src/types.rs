//! Request types for the addlog endpoint.

use serde::Deserialize;

/// Query parameters of a beacon request.
///
/// All three are required; the handler answers `invalid` when any is
/// missing. `rows` carries a percent-encoded JSON object of event
/// fields, `data` a percent-encoded opaque payload attached to the row
/// verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct AddLogParams {
    /// JSONP callback name the response body is wrapped in.
    pub callback: Option<String>,
    /// Percent-encoded JSON object with a `site` field plus event fields.
    pub rows: Option<String>,
    /// Percent-encoded opaque payload.
    pub data: Option<String>,
}

/// What the handler does with an accepted beacon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestMode {
    /// Queue the row for batch insertion.
    Queue,
    /// Log the destination and row instead of queueing.
    ///
    /// Used in environments without a real warehouse behind the flusher.
    DryRun,
}
