//! The send subcommand: push a test beacon to a running collector.

use clap::Args;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Map, Value};
use snafu::ResultExt;
use tokio_util::sync::CancellationToken;

use crate::error::{BeaconRequestSnafu, Result};

#[derive(Debug, Args)]
pub struct SendArgs {
    /// Base URL of the collector.
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    url: String,
    /// The originating site the beacon claims.
    #[arg(long)]
    site: String,
    /// JSONP callback name.
    #[arg(long, default_value = "cb")]
    callback: String,
    /// Client-assigned insert id.
    #[arg(long)]
    insert_id: Option<String>,
    #[arg(long)]
    event_type: Option<String>,
    #[arg(long)]
    data_version: Option<i64>,
    #[arg(long)]
    user_id: Option<String>,
    #[arg(long)]
    session_id: Option<String>,
    /// Client-observed event time, in milliseconds since the Unix epoch.
    #[arg(long)]
    client_time: Option<i64>,
    /// Opaque payload attached to the beacon.
    #[arg(long, default_value = "")]
    data: String,
}

impl SendArgs {
    pub async fn run(self, _ct: CancellationToken) -> Result<()> {
        let rows = self.build_rows();

        // The collector percent-decodes rows and data a second time
        // after query parsing; encode once here and let the query
        // serializer add the outer layer.
        let rows = utf8_percent_encode(&rows, NON_ALPHANUMERIC).to_string();
        let data = utf8_percent_encode(&self.data, NON_ALPHANUMERIC).to_string();

        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/addlog", self.url.trim_end_matches('/')))
            .query(&[
                ("callback", self.callback.as_str()),
                ("rows", rows.as_str()),
                ("data", data.as_str()),
            ])
            .send()
            .await
            .context(BeaconRequestSnafu {})?;

        let status = response.status();
        let body = response.text().await.context(BeaconRequestSnafu {})?;
        println!("{status} {body}");

        Ok(())
    }

    fn build_rows(&self) -> String {
        let mut rows = Map::new();
        rows.insert("site".to_string(), Value::String(self.site.clone()));

        if let Some(insert_id) = &self.insert_id {
            rows.insert("insertId".to_string(), Value::String(insert_id.clone()));
        }
        if let Some(event_type) = &self.event_type {
            rows.insert("eventType".to_string(), Value::String(event_type.clone()));
        }
        if let Some(data_version) = self.data_version {
            rows.insert("dataVersion".to_string(), data_version.into());
        }
        if let Some(user_id) = &self.user_id {
            rows.insert("userId".to_string(), Value::String(user_id.clone()));
        }
        if let Some(session_id) = &self.session_id {
            rows.insert("sessionId".to_string(), Value::String(session_id.clone()));
        }
        if let Some(client_time) = self.client_time {
            rows.insert("clientTime".to_string(), client_time.into());
        }

        Value::Object(rows).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_args() -> SendArgs {
        SendArgs {
            url: "http://127.0.0.1:3000".to_string(),
            site: "unetbootin.github.io".to_string(),
            callback: "cb".to_string(),
            insert_id: Some("1".to_string()),
            event_type: None,
            data_version: Some(2),
            user_id: None,
            session_id: None,
            client_time: None,
            data: String::new(),
        }
    }

    #[test]
    fn test_build_rows_includes_only_set_fields() {
        let rows: Value = serde_json::from_str(&test_args().build_rows()).unwrap();

        assert_eq!(rows["site"], "unetbootin.github.io");
        assert_eq!(rows["insertId"], "1");
        assert_eq!(rows["dataVersion"], 2);
        assert!(rows.get("eventType").is_none());
        assert!(rows.get("clientTime").is_none());
    }
}
