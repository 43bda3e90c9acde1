//! Handler for the /addlog endpoint.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use percent_encoding::percent_decode_str;
use serde_json::Value;
use tracing::info;

use liltstat_collector_core::Destination;
use liltstat_warehouse_core::TableName;

use crate::{
    HttpCollectorState,
    types::{AddLogParams, IngestMode},
};

/// Sent when a required query parameter is missing or `rows` is not a
/// JSON object.
const INVALID_BODY: &str = "invalid";

/// Handler for the `GET /addlog` endpoint.
///
/// The caller loads the response as a script tag, so every outcome
/// other than a malformed request answers 200 with the JSONP success
/// body. An unresolvable `site` drops the beacon without telling the
/// caller. The handler only touches the in-memory queue; warehouse
/// traffic happens on the flush path.
pub async fn addlog_handler(
    State(state): State<HttpCollectorState>,
    headers: HeaderMap,
    Query(params): Query<AddLogParams>,
) -> Response {
    let (Some(callback), Some(rows), Some(data)) = (params.callback, params.rows, params.data)
    else {
        return INVALID_BODY.into_response();
    };

    let rows = decode_component(&rows);
    let data = decode_component(&data);

    let Ok(Value::Object(mut row)) = serde_json::from_str(&rows) else {
        return INVALID_BODY.into_response();
    };

    let site = row.remove("site");
    let Some(dataset) = site
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|site| state.resolver.resolve(site))
    else {
        return jsonp_success(&callback);
    };

    let ip = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    let now = Utc::now();
    row.insert("data".to_string(), Value::String(data));
    row.insert("ip".to_string(), Value::String(ip.to_string()));
    row.insert("serverTime".to_string(), now.timestamp_millis().into());

    let destination = Destination {
        dataset: dataset.clone(),
        table: TableName::for_date(now.date_naive()),
    };

    match state.mode {
        IngestMode::Queue => state.queue.enqueue(destination, row),
        IngestMode::DryRun => {
            let row = Value::Object(row);
            info!(
                dataset = %destination.dataset,
                table = %destination.table,
                row = %row,
                "dry-run beacon",
            );
        }
    }

    jsonp_success(&callback)
}

/// Query parsing already percent-decoded the value once; beacons encode
/// the payload on top of the query encoding, so decode again.
fn decode_component(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

fn jsonp_success(callback: &str) -> Response {
    let body = format!(r#"{callback}({{"success":true}})"#);
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        body,
    )
        .into_response()
}
